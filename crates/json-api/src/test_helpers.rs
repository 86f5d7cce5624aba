//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use leadbook_app::{
    auth::{IdentityContext, MockAuthService},
    context::AppContext,
    database::MockHealthCheck,
    domain::{
        leads::{
            MockLeadsService,
            records::{LeadOwner, LeadRecord, LeadStatus, LeadUuid},
        },
        users::records::{Role, UserUuid},
    },
};
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_SALESPERSON: IdentityContext =
    IdentityContext::new(UserUuid::from_uuid(Uuid::from_u128(1)), Role::Salesperson);

pub(crate) const TEST_ADMIN: IdentityContext =
    IdentityContext::new(UserUuid::from_uuid(Uuid::from_u128(2)), Role::Admin);

/// Stands in for the auth middleware with a fixed caller.
#[derive(Debug, Clone, Copy)]
pub(crate) struct InjectIdentity(pub(crate) IdentityContext);

#[handler]
impl InjectIdentity {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        depot.insert_identity(self.0);
        ctrl.call_next(req, depot, res).await;
    }
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_resolve_identity().never();
    auth.expect_login().never();

    auth
}

fn strict_leads_mock() -> MockLeadsService {
    let mut leads = MockLeadsService::new();

    leads.expect_list_leads().never();
    leads.expect_get_lead().never();
    leads.expect_create_lead().never();
    leads.expect_update_lead().never();
    leads.expect_delete_lead().never();
    leads.expect_lead_stats().never();

    leads
}

fn strict_health_mock() -> MockHealthCheck {
    let mut health = MockHealthCheck::new();

    health.expect_check().never();

    health
}

fn build_state(
    health: MockHealthCheck,
    leads: MockLeadsService,
    auth: MockAuthService,
) -> Arc<State> {
    State::from_app_context(AppContext {
        health: Arc::new(health),
        leads: Arc::new(leads),
        auth: Arc::new(auth),
    })
}

fn state(leads: MockLeadsService, auth: MockAuthService) -> Arc<State> {
    build_state(strict_health_mock(), leads, auth)
}

pub(crate) fn health_service(health: MockHealthCheck, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(build_state(
                health,
                strict_leads_mock(),
                strict_auth_mock(),
            )))
            .push(route),
    )
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    state(strict_leads_mock(), auth)
}

/// Serve `route` to requests made as `identity`.
pub(crate) fn leads_service_as(
    identity: IdentityContext,
    leads: MockLeadsService,
    route: Router,
) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(leads, strict_auth_mock())))
            .hoop(InjectIdentity(identity))
            .push(route),
    )
}

/// Serve `route` with no caller resolved, as if the middleware were bypassed.
pub(crate) fn leads_service_anonymous(leads: MockLeadsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(leads, strict_auth_mock())))
            .push(route),
    )
}

pub(crate) fn auth_service(auth: MockAuthService, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(state_with_auth(auth))).push(route))
}

pub(crate) fn make_lead(uuid: LeadUuid, owner: IdentityContext) -> LeadRecord {
    LeadRecord {
        uuid,
        full_name: "Jane Doe".to_owned(),
        email: "jane@example.com".to_owned(),
        phone: "555-0100".to_owned(),
        company: Some("Acme".to_owned()),
        source: None,
        status: LeadStatus::New,
        notes: None,
        created_by: LeadOwner {
            uuid: owner.user,
            full_name: "Sam Seller".to_owned(),
        },
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
