//! Leads Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    leads::{
        access::LeadScope,
        data::{LeadChanges, LeadInsert, LeadQuery},
        records::{LeadOwner, LeadRecord, LeadStatus, LeadUuid},
    },
    users::records::UserUuid,
};

const LIST_LEADS_SQL: &str = include_str!("sql/list_leads.sql");
const COUNT_LEADS_SQL: &str = include_str!("sql/count_leads.sql");
const GET_LEAD_SQL: &str = include_str!("sql/get_lead.sql");
const LOCK_LEAD_OWNER_SQL: &str = include_str!("sql/lock_lead_owner.sql");
const CREATE_LEAD_SQL: &str = include_str!("sql/create_lead.sql");
const UPDATE_LEAD_SQL: &str = include_str!("sql/update_lead.sql");
const DELETE_LEAD_SQL: &str = include_str!("sql/delete_lead.sql");
const COUNT_LEADS_BY_STATUS_SQL: &str = include_str!("sql/count_leads_by_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgLeadsRepository;

impl PgLeadsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_leads(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        scope: LeadScope,
        lead_query: &LeadQuery,
    ) -> Result<Vec<LeadRecord>, sqlx::Error> {
        let limit = i64::from(lead_query.limit);
        // Anything beyond i64 is past every possible row.
        let offset = i64::try_from(lead_query.offset()).unwrap_or(i64::MAX);

        query_as::<Postgres, LeadRecord>(LIST_LEADS_SQL)
            .bind(scope.owner().map(UserUuid::into_uuid))
            .bind(lead_query.status.map(LeadStatus::as_str))
            .bind(lead_query.search_pattern())
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_leads(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        scope: LeadScope,
        lead_query: &LeadQuery,
    ) -> Result<u64, sqlx::Error> {
        let total: i64 = query_scalar(COUNT_LEADS_SQL)
            .bind(scope.owner().map(UserUuid::into_uuid))
            .bind(lead_query.status.map(LeadStatus::as_str))
            .bind(lead_query.search_pattern())
            .fetch_one(&mut **tx)
            .await?;

        decode_count("total", total)
    }

    pub(crate) async fn get_lead(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        lead: LeadUuid,
    ) -> Result<LeadRecord, sqlx::Error> {
        query_as::<Postgres, LeadRecord>(GET_LEAD_SQL)
            .bind(lead.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Lock the lead row for the rest of the transaction and return its owner.
    pub(crate) async fn lock_lead_owner(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        lead: LeadUuid,
    ) -> Result<UserUuid, sqlx::Error> {
        let owner: Uuid = query_scalar(LOCK_LEAD_OWNER_SQL)
            .bind(lead.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(UserUuid::from_uuid(owner))
    }

    pub(crate) async fn create_lead(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
        lead: LeadInsert,
    ) -> Result<LeadRecord, sqlx::Error> {
        query_as::<Postgres, LeadRecord>(CREATE_LEAD_SQL)
            .bind(lead.uuid.into_uuid())
            .bind(lead.full_name)
            .bind(lead.email)
            .bind(lead.phone)
            .bind(lead.company)
            .bind(lead.source)
            .bind(lead.status.as_str())
            .bind(lead.notes)
            .bind(owner.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_lead(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        lead: LeadUuid,
        changes: LeadChanges,
    ) -> Result<LeadRecord, sqlx::Error> {
        let (set_company, company) = split_optional(changes.company);
        let (set_source, source) = split_optional(changes.source);
        let (set_notes, notes) = split_optional(changes.notes);

        query_as::<Postgres, LeadRecord>(UPDATE_LEAD_SQL)
            .bind(lead.into_uuid())
            .bind(changes.full_name)
            .bind(changes.email)
            .bind(changes.phone)
            .bind(set_company)
            .bind(company)
            .bind(set_source)
            .bind(source)
            .bind(changes.status.map(LeadStatus::as_str))
            .bind(set_notes)
            .bind(notes)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_lead(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        lead: LeadUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_LEAD_SQL)
            .bind(lead.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn count_leads_by_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<(LeadStatus, u64)>, sqlx::Error> {
        let rows = query(COUNT_LEADS_BY_STATUS_SQL).fetch_all(&mut **tx).await?;

        rows.iter()
            .map(|row| {
                Ok((
                    decode_status(row, "status")?,
                    decode_count("total", row.try_get("total")?)?,
                ))
            })
            .collect()
    }
}

/// `(whether to write, value to write)` for a nullable column.
fn split_optional(change: Option<Option<String>>) -> (bool, Option<String>) {
    match change {
        Some(value) => (true, value),
        None => (false, None),
    }
}

fn decode_count(column: &str, count: i64) -> sqlx::Result<u64> {
    u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn decode_status(row: &PgRow, column: &str) -> sqlx::Result<LeadStatus> {
    let status: String = row.try_get(column)?;

    status
        .parse::<LeadStatus>()
        .map_err(|error| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(error),
        })
}

impl<'r> FromRow<'r, PgRow> for LeadRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: LeadUuid::from_uuid(row.try_get("uuid")?),
            full_name: row.try_get("full_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            company: row.try_get("company")?,
            source: row.try_get("source")?,
            status: decode_status(row, "status")?,
            notes: row.try_get("notes")?,
            created_by: LeadOwner {
                uuid: UserUuid::from_uuid(row.try_get("created_by")?),
                full_name: row.try_get("created_by_name")?,
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
