//! Lead Data

use crate::domain::{
    leads::records::{LeadRecord, LeadStatus, LeadUuid},
    validation::{ValidationErrors, normalize_optional},
};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Lead payload as submitted for creation. The owner is never part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewLead {
    pub uuid: LeadUuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub source: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// A checked [`NewLead`], ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadInsert {
    pub uuid: LeadUuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub source: Option<String>,
    pub status: LeadStatus,
    pub notes: Option<String>,
}

impl NewLead {
    /// Trim and check the payload.
    ///
    /// # Errors
    ///
    /// Returns every rejected field when required values are blank or the
    /// status is unknown.
    pub fn validate(self) -> Result<LeadInsert, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let full_name = errors.require("full_name", &self.full_name);
        let email = errors.require("email", &self.email);
        let phone = errors.require("phone", &self.phone);
        let status = parse_status(&mut errors, blank_as_absent(self.status)).unwrap_or_default();

        errors.into_result(LeadInsert {
            uuid: self.uuid,
            full_name,
            email,
            phone,
            company: normalize_optional(self.company),
            source: normalize_optional(self.source),
            status,
            notes: normalize_optional(self.notes),
        })
    }
}

/// Partial changes to a lead. `None` leaves a field untouched; for optional
/// fields a blank string clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub source: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// A checked [`LeadUpdate`]. The outer `Option` says whether to write the
/// field at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadChanges {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<Option<String>>,
    pub source: Option<Option<String>>,
    pub status: Option<LeadStatus>,
    pub notes: Option<Option<String>>,
}

impl LeadUpdate {
    /// Trim and check the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns every rejected field when a present required value is blank
    /// or the status is unknown.
    pub fn validate(self) -> Result<LeadChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let full_name = self
            .full_name
            .map(|value| errors.require("full_name", &value));
        let email = self.email.map(|value| errors.require("email", &value));
        let phone = self.phone.map(|value| errors.require("phone", &value));
        let status = self
            .status
            .and_then(|value| parse_status(&mut errors, Some(value)));

        errors.into_result(LeadChanges {
            full_name,
            email,
            phone,
            company: self.company.map(|value| normalize_optional(Some(value))),
            source: self.source.map(|value| normalize_optional(Some(value))),
            status,
            notes: self.notes.map(|value| normalize_optional(Some(value))),
        })
    }
}

/// List parameters as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFilters {
    pub status: Option<String>,
    pub query: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Checked list parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadQuery {
    pub status: Option<LeadStatus>,
    pub search: Option<String>,
    pub page: u64,
    pub limit: u32,
}

impl LeadFilters {
    /// Apply defaults and check ranges. Blank `status` and `query` count as
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns every rejected parameter.
    pub fn validate(self) -> Result<LeadQuery, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let status = parse_status(&mut errors, blank_as_absent(self.status));

        let page = match self.page {
            None => DEFAULT_PAGE,
            Some(page) => u64::try_from(page)
                .ok()
                .filter(|page| *page >= 1)
                .unwrap_or_else(|| {
                    errors.push("page", "must be at least 1");
                    DEFAULT_PAGE
                }),
        };

        let limit = match self.limit {
            None => DEFAULT_LIMIT,
            Some(limit) => u32::try_from(limit)
                .ok()
                .filter(|limit| (1..=MAX_LIMIT).contains(limit))
                .unwrap_or_else(|| {
                    errors.push("limit", format!("must be between 1 and {MAX_LIMIT}"));
                    DEFAULT_LIMIT
                }),
        };

        errors.into_result(LeadQuery {
            status,
            search: normalize_optional(self.query),
            page,
            limit,
        })
    }
}

impl LeadQuery {
    /// Rows skipped before this page starts. Saturates, so a page far past
    /// the end still yields an empty result.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(u64::from(self.limit))
    }

    /// Case-insensitive substring pattern for `ILIKE`, with wildcards in the
    /// search text matched literally.
    #[must_use]
    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(|search| format!("%{}%", escape_like(search)))
    }
}

/// One page of leads plus the totals needed to page through the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadPage {
    pub leads: Vec<LeadRecord>,
    pub total: u64,
    pub total_pages: u64,
    pub page: u64,
    pub limit: u32,
}

impl LeadPage {
    #[must_use]
    pub fn new(leads: Vec<LeadRecord>, total: u64, query: &LeadQuery) -> Self {
        Self {
            leads,
            total,
            total_pages: total_pages(total, query.limit),
            page: query.page,
            limit: query.limit,
        }
    }
}

/// `ceil(total / limit)`; zero when there is nothing to show.
#[must_use]
pub fn total_pages(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }

    total.div_ceil(u64::from(limit))
}

/// Escape `LIKE` metacharacters using the default backslash escape.
#[must_use]
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }

        escaped.push(ch);
    }

    escaped
}

/// Blank means "not given". Anything else is kept verbatim.
fn blank_as_absent(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Statuses match exactly, so surrounding whitespace is an error.
fn parse_status(errors: &mut ValidationErrors, value: Option<String>) -> Option<LeadStatus> {
    let value = value?;

    match value.parse::<LeadStatus>() {
        Ok(status) => Some(status),
        Err(_) => {
            errors.push(
                "status",
                format!(
                    "must be one of {}",
                    LeadStatus::ALL.map(LeadStatus::as_str).join(", ")
                ),
            );

            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_lead() -> NewLead {
        NewLead {
            full_name: " Jane Doe ".to_owned(),
            email: "jane@example.com".to_owned(),
            phone: "555-0100".to_owned(),
            ..NewLead::default()
        }
    }

    #[test]
    fn new_lead_defaults_status_and_trims() {
        let insert = new_lead().validate().expect("payload should be valid");

        assert_eq!(insert.full_name, "Jane Doe");
        assert_eq!(insert.status, LeadStatus::New);
        assert_eq!(insert.company, None);
    }

    #[test]
    fn new_lead_reports_every_missing_field() {
        let errors = NewLead {
            status: Some("Archived".to_owned()),
            ..NewLead::default()
        }
        .validate()
        .expect_err("payload should be rejected");

        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["full_name", "email", "phone", "status"]
        );
    }

    #[test]
    fn new_lead_blank_optionals_are_dropped() {
        let insert = NewLead {
            company: Some("   ".to_owned()),
            notes: Some(" call back ".to_owned()),
            status: Some(String::new()),
            ..new_lead()
        }
        .validate()
        .expect("payload should be valid");

        assert_eq!(insert.company, None);
        assert_eq!(insert.notes.as_deref(), Some("call back"));
        assert_eq!(insert.status, LeadStatus::New);
    }

    #[test]
    fn update_leaves_absent_fields_untouched() {
        let changes = LeadUpdate {
            status: Some("Won".to_owned()),
            ..LeadUpdate::default()
        }
        .validate()
        .expect("update should be valid");

        assert_eq!(
            changes,
            LeadChanges {
                status: Some(LeadStatus::Won),
                ..LeadChanges::default()
            }
        );
    }

    #[test]
    fn update_blank_optional_clears_and_blank_required_fails() {
        let changes = LeadUpdate {
            company: Some(String::new()),
            ..LeadUpdate::default()
        }
        .validate()
        .expect("clearing company should be valid");

        assert_eq!(changes.company, Some(None));

        let errors = LeadUpdate {
            email: Some("  ".to_owned()),
            status: Some("Closed".to_owned()),
            ..LeadUpdate::default()
        }
        .validate()
        .expect_err("blank email should be rejected");

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["email", "status"]);
    }

    #[test]
    fn filters_apply_defaults() {
        let query = LeadFilters {
            status: Some(" ".to_owned()),
            query: Some(String::new()),
            ..LeadFilters::default()
        }
        .validate()
        .expect("defaults should be valid");

        assert_eq!(
            query,
            LeadQuery {
                status: None,
                search: None,
                page: DEFAULT_PAGE,
                limit: DEFAULT_LIMIT,
            }
        );
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn filters_reject_out_of_range_paging() {
        let errors = LeadFilters {
            page: Some(0),
            limit: Some(i64::from(MAX_LIMIT) + 1),
            ..LeadFilters::default()
        }
        .validate()
        .expect_err("paging should be rejected");

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["page", "limit"]);
    }

    #[test]
    fn filters_compute_offset() {
        let query = LeadFilters {
            status: Some("In Progress".to_owned()),
            page: Some(3),
            limit: Some(20),
            ..LeadFilters::default()
        }
        .validate()
        .expect("filters should be valid");

        assert_eq!(query.status, Some(LeadStatus::InProgress));
        assert_eq!(query.offset(), 40);
    }

    #[test]
    fn huge_page_is_accepted_and_offset_saturates() {
        let query = LeadFilters {
            page: Some(5_000_000_000),
            ..LeadFilters::default()
        }
        .validate()
        .expect("a page past the end is not an error");

        assert_eq!(query.page, 5_000_000_000);
        assert_eq!(query.offset(), 49_999_999_990);

        let query = LeadFilters {
            page: Some(i64::MAX),
            limit: Some(i64::from(MAX_LIMIT)),
            ..LeadFilters::default()
        }
        .validate()
        .expect("the largest page is not an error");

        assert_eq!(query.offset(), u64::MAX);
    }

    #[test]
    fn padded_status_is_rejected_everywhere() {
        let padded = || Some(" Lost ".to_owned());

        let filters = LeadFilters {
            status: padded(),
            ..LeadFilters::default()
        }
        .validate();

        let create = NewLead {
            status: padded(),
            ..new_lead()
        }
        .validate();

        let update = LeadUpdate {
            status: padded(),
            ..LeadUpdate::default()
        }
        .validate();

        assert!(filters.is_err_and(|errors| errors.contains("status")));
        assert!(create.is_err_and(|errors| errors.contains("status")));
        assert!(update.is_err_and(|errors| errors.contains("status")));
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn search_text_is_matched_literally() {
        assert_eq!(escape_like(r"50%_off\"), r"50\%\_off\\");

        let query = LeadQuery {
            status: None,
            search: Some("doe".to_owned()),
            page: 1,
            limit: 10,
        };

        assert_eq!(query.search_pattern().as_deref(), Some("%doe%"));
    }
}
