//! Leads service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    auth::IdentityContext,
    database::Db,
    domain::leads::{
        access::{LeadAction, LeadScope, authorize},
        data::{LeadFilters, LeadPage, LeadUpdate, NewLead},
        errors::LeadsServiceError,
        records::{LeadRecord, LeadStats, LeadUuid},
        repository::PgLeadsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgLeadsService {
    db: Db,
    repository: PgLeadsRepository,
}

impl PgLeadsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgLeadsRepository::new(),
        }
    }
}

#[async_trait]
impl LeadsService for PgLeadsService {
    async fn list_leads(
        &self,
        identity: IdentityContext,
        filters: LeadFilters,
    ) -> Result<LeadPage, LeadsServiceError> {
        authorize(&identity, LeadAction::List)?;

        let lead_query = filters.validate()?;
        let scope = LeadScope::for_identity(&identity);

        // One snapshot, so the total always agrees with the page.
        let mut tx = self.db.begin_snapshot().await?;

        let total = self.repository.count_leads(&mut tx, scope, &lead_query).await?;
        let leads = self.repository.list_leads(&mut tx, scope, &lead_query).await?;

        tx.commit().await?;

        Ok(LeadPage::new(leads, total, &lead_query))
    }

    async fn get_lead(
        &self,
        identity: IdentityContext,
        lead: LeadUuid,
    ) -> Result<LeadRecord, LeadsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.repository.get_lead(&mut tx, lead).await?;

        tx.commit().await?;

        authorize(&identity, LeadAction::Read(record.created_by.uuid))?;

        Ok(record)
    }

    async fn create_lead(
        &self,
        identity: IdentityContext,
        lead: NewLead,
    ) -> Result<LeadRecord, LeadsServiceError> {
        authorize(&identity, LeadAction::Create)?;

        let insert = lead.validate()?;

        let mut tx = self.db.begin_transaction().await?;

        let created = self
            .repository
            .create_lead(&mut tx, identity.user, insert)
            .await?;

        tx.commit().await?;

        info!(lead = %created.uuid, owner = %identity.user, "lead created");

        Ok(created)
    }

    async fn update_lead(
        &self,
        identity: IdentityContext,
        lead: LeadUuid,
        update: LeadUpdate,
    ) -> Result<LeadRecord, LeadsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let owner = self.repository.lock_lead_owner(&mut tx, lead).await?;

        authorize(&identity, LeadAction::Update(owner))?;

        let changes = update.validate()?;

        let updated = self.repository.update_lead(&mut tx, lead, changes).await?;

        tx.commit().await?;

        info!(lead = %lead, user = %identity.user, "lead updated");

        Ok(updated)
    }

    async fn delete_lead(
        &self,
        identity: IdentityContext,
        lead: LeadUuid,
    ) -> Result<(), LeadsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let owner = self.repository.lock_lead_owner(&mut tx, lead).await?;

        authorize(&identity, LeadAction::Delete(owner))?;

        let rows_affected = self.repository.delete_lead(&mut tx, lead).await?;

        if rows_affected == 0 {
            return Err(LeadsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(lead = %lead, user = %identity.user, "lead deleted");

        Ok(())
    }

    async fn lead_stats(&self, identity: IdentityContext) -> Result<LeadStats, LeadsServiceError> {
        authorize(&identity, LeadAction::ViewStats)?;

        let mut tx = self.db.begin_transaction().await?;

        let counts = self.repository.count_leads_by_status(&mut tx).await?;

        tx.commit().await?;

        Ok(LeadStats::from_counts(counts))
    }
}

#[automock]
#[async_trait]
pub trait LeadsService: Send + Sync {
    /// One page of the leads visible to `identity`, newest first.
    async fn list_leads(
        &self,
        identity: IdentityContext,
        filters: LeadFilters,
    ) -> Result<LeadPage, LeadsServiceError>;

    async fn get_lead(
        &self,
        identity: IdentityContext,
        lead: LeadUuid,
    ) -> Result<LeadRecord, LeadsServiceError>;

    /// Create a lead owned by `identity`.
    async fn create_lead(
        &self,
        identity: IdentityContext,
        lead: NewLead,
    ) -> Result<LeadRecord, LeadsServiceError>;

    /// Apply the fields present in `update`. The owner never changes.
    async fn update_lead(
        &self,
        identity: IdentityContext,
        lead: LeadUuid,
        update: LeadUpdate,
    ) -> Result<LeadRecord, LeadsServiceError>;

    async fn delete_lead(
        &self,
        identity: IdentityContext,
        lead: LeadUuid,
    ) -> Result<(), LeadsServiceError>;

    /// Lead counts by status across every owner. Admin only.
    async fn lead_stats(&self, identity: IdentityContext) -> Result<LeadStats, LeadsServiceError>;
}
