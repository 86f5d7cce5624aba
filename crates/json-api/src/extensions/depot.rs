//! Depot helper extensions.

use std::any::Any;

use leadbook_app::auth::IdentityContext;
use salvo::prelude::{Depot, StatusError};

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Record the caller resolved by the auth middleware.
    fn insert_identity(&mut self, identity: IdentityContext);

    /// The caller for this request, or 401 when none was resolved.
    fn identity_or_401(&self) -> Result<IdentityContext, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_identity(&mut self, identity: IdentityContext) {
        self.inject(identity);
    }

    fn identity_or_401(&self) -> Result<IdentityContext, StatusError> {
        self.obtain::<IdentityContext>()
            .copied()
            .map_err(|_ignored| StatusError::unauthorized().brief("Authentication required"))
    }
}
