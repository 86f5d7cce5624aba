//! App Router

use salvo::Router;

use crate::{auth, dashboard, leads, sessions};

/// Routes anyone may call.
pub(crate) fn public_router() -> Router {
    Router::with_path("sessions").post(sessions::create::handler)
}

/// Routes that require a resolved identity.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("leads")
                .get(leads::index::handler)
                .post(leads::create::handler)
                .push(
                    Router::with_path("{lead}")
                        .get(leads::get::handler)
                        .put(leads::update::handler)
                        .delete(leads::delete::handler),
                ),
        )
        .push(Router::with_path("dashboard/stats").get(dashboard::stats::handler))
}
