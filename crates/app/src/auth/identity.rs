//! Identity context resolved for one request.

use crate::domain::users::records::{Role, UserUuid};

/// The authenticated caller. Derived fresh from the session credential on
/// every request and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityContext {
    pub user: UserUuid,
    pub role: Role,
}

impl IdentityContext {
    #[must_use]
    pub const fn new(user: UserUuid, role: Role) -> Self {
        Self { user, role }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether this caller created, or may act as the creator of, a record
    /// owned by `owner`.
    #[must_use]
    pub fn owns(&self, owner: UserUuid) -> bool {
        self.user == owner
    }
}
