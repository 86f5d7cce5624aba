//! Lead Records

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::Timestamp;
use thiserror::Error;

use crate::{domain::users::records::UserUuid, uuids::TypedUuid};

/// Lead UUID
pub type LeadUuid = TypedUuid<LeadRecord>;

/// Where a lead sits in the sales pipeline. Any status may follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    InProgress,
    Won,
    Lost,
}

impl LeadStatus {
    pub const ALL: [Self; 5] = [
        Self::New,
        Self::Contacted,
        Self::InProgress,
        Self::Won,
        Self::Lost,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Contacted => "Contacted",
            Self::InProgress => "In Progress",
            Self::Won => "Won",
            Self::Lost => "Lost",
        }
    }
}

impl Display for LeadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown lead status `{0}`")]
pub struct UnknownLeadStatus(pub String);

impl FromStr for LeadStatus {
    type Err = UnknownLeadStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownLeadStatus(value.to_owned()))
    }
}

/// The user who created a lead, with their display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadOwner {
    pub uuid: UserUuid,
    pub full_name: String,
}

/// Lead Record
#[derive(Debug, Clone, PartialEq)]
pub struct LeadRecord {
    pub uuid: LeadUuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub source: Option<String>,
    pub status: LeadStatus,
    pub notes: Option<String>,
    pub created_by: LeadOwner,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Lead counts across the whole book, by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeadStats {
    pub total: u64,
    pub new: u64,
    pub contacted: u64,
    pub in_progress: u64,
    pub won: u64,
    pub lost: u64,
}

impl LeadStats {
    /// Fold per-status counts into totals. Statuses may repeat or be missing.
    #[must_use]
    pub fn from_counts(counts: impl IntoIterator<Item = (LeadStatus, u64)>) -> Self {
        counts
            .into_iter()
            .fold(Self::default(), |mut stats, (status, count)| {
                *stats.slot(status) += count;
                stats.total += count;
                stats
            })
    }

    #[must_use]
    pub const fn count(&self, status: LeadStatus) -> u64 {
        match status {
            LeadStatus::New => self.new,
            LeadStatus::Contacted => self.contacted,
            LeadStatus::InProgress => self.in_progress,
            LeadStatus::Won => self.won,
            LeadStatus::Lost => self.lost,
        }
    }

    fn slot(&mut self, status: LeadStatus) -> &mut u64 {
        match status {
            LeadStatus::New => &mut self.new,
            LeadStatus::Contacted => &mut self.contacted,
            LeadStatus::InProgress => &mut self.in_progress,
            LeadStatus::Won => &mut self.won,
            LeadStatus::Lost => &mut self.lost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_its_display_form() {
        for status in LeadStatus::ALL {
            assert_eq!(status.to_string().parse::<LeadStatus>(), Ok(status));
        }
    }

    #[test]
    fn status_parsing_is_exact() {
        assert_eq!(
            "in progress".parse::<LeadStatus>(),
            Err(UnknownLeadStatus("in progress".to_owned()))
        );
        assert!("InProgress".parse::<LeadStatus>().is_err());
    }

    #[test]
    fn default_status_is_new() {
        assert_eq!(LeadStatus::default(), LeadStatus::New);
    }

    #[test]
    fn stats_sum_counts_per_status() {
        let stats = LeadStats::from_counts([
            (LeadStatus::New, 3),
            (LeadStatus::Won, 2),
            (LeadStatus::InProgress, 1),
        ]);

        assert_eq!(stats.total, 6);
        assert_eq!(stats.count(LeadStatus::New), 3);
        assert_eq!(stats.count(LeadStatus::InProgress), 1);
        assert_eq!(stats.count(LeadStatus::Lost), 0);
    }
}
