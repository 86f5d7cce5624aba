//! Lead access decisions.
//!
//! Every lead operation asks [`authorize`] before touching storage, and list
//! queries are narrowed with [`LeadScope`].

use thiserror::Error;

use crate::{auth::IdentityContext, domain::users::records::UserUuid};

/// An operation on leads, carrying the owner of the target record where
/// there is one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadAction {
    List,
    Create,
    Read(UserUuid),
    Update(UserUuid),
    Delete(UserUuid),
    ViewStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not permitted")]
pub struct AccessDenied;

/// Decide whether `identity` may perform `action`.
///
/// # Errors
///
/// Returns [`AccessDenied`] when the caller lacks the role or ownership the
/// action needs.
pub fn authorize(identity: &IdentityContext, action: LeadAction) -> Result<(), AccessDenied> {
    let permitted = match action {
        LeadAction::List | LeadAction::Create => true,
        LeadAction::Read(owner) | LeadAction::Update(owner) | LeadAction::Delete(owner) => {
            identity.is_admin() || identity.owns(owner)
        }
        LeadAction::ViewStats => identity.is_admin(),
    };

    if permitted { Ok(()) } else { Err(AccessDenied) }
}

/// Which rows a list query may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadScope {
    All,
    OwnedBy(UserUuid),
}

impl LeadScope {
    #[must_use]
    pub fn for_identity(identity: &IdentityContext) -> Self {
        if identity.is_admin() {
            Self::All
        } else {
            Self::OwnedBy(identity.user)
        }
    }

    /// Owner filter to bind, if any.
    #[must_use]
    pub const fn owner(self) -> Option<UserUuid> {
        match self {
            Self::All => None,
            Self::OwnedBy(owner) => Some(owner),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::users::records::Role;

    use super::*;

    fn salesperson() -> IdentityContext {
        IdentityContext::new(UserUuid::new(), Role::Salesperson)
    }

    fn admin() -> IdentityContext {
        IdentityContext::new(UserUuid::new(), Role::Admin)
    }

    #[test]
    fn anyone_may_list_and_create() {
        for identity in [salesperson(), admin()] {
            assert_eq!(authorize(&identity, LeadAction::List), Ok(()));
            assert_eq!(authorize(&identity, LeadAction::Create), Ok(()));
        }
    }

    #[test]
    fn owner_may_touch_own_lead() {
        let identity = salesperson();

        for action in [
            LeadAction::Read(identity.user),
            LeadAction::Update(identity.user),
            LeadAction::Delete(identity.user),
        ] {
            assert_eq!(authorize(&identity, action), Ok(()), "{action:?}");
        }
    }

    #[test]
    fn salesperson_may_not_touch_someone_elses_lead() {
        let identity = salesperson();
        let other = UserUuid::new();

        for action in [
            LeadAction::Read(other),
            LeadAction::Update(other),
            LeadAction::Delete(other),
        ] {
            assert_eq!(authorize(&identity, action), Err(AccessDenied), "{action:?}");
        }
    }

    #[test]
    fn admin_may_touch_any_lead() {
        let other = UserUuid::new();

        assert_eq!(authorize(&admin(), LeadAction::Update(other)), Ok(()));
        assert_eq!(authorize(&admin(), LeadAction::Delete(other)), Ok(()));
    }

    #[test]
    fn only_admin_sees_stats() {
        assert_eq!(authorize(&admin(), LeadAction::ViewStats), Ok(()));
        assert_eq!(
            authorize(&salesperson(), LeadAction::ViewStats),
            Err(AccessDenied)
        );
    }

    #[test]
    fn scope_follows_role() {
        let identity = salesperson();

        assert_eq!(
            LeadScope::for_identity(&identity),
            LeadScope::OwnedBy(identity.user)
        );
        assert_eq!(LeadScope::for_identity(&admin()).owner(), None);
    }
}
