//! Installation and maintenance jobs.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::{Record, cell};
use crate::{Error, Result};

/// What a job is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobKind {
    /// First-time setup at a customer site.
    Installation,
    /// Service visit on existing equipment.
    Maintenance,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JobKind::Installation => "Installation",
            JobKind::Maintenance => "Maintenance",
        })
    }
}

/// Progress of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JobStatus {
    /// Booked, not started.
    #[default]
    Scheduled,
    /// Technician on site.
    InProgress,
    /// Done.
    Completed,
    /// Called off.
    Cancelled,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JobStatus::Scheduled => "Scheduled",
            JobStatus::InProgress => "InProgress",
            JobStatus::Completed => "Completed",
            JobStatus::Cancelled => "Cancelled",
        })
    }
}

/// An installation or maintenance job as served by `installations/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallationRecord {
    /// Service-assigned identifier.
    pub id: i64,
    /// Customer the job is for.
    pub client: String,
    /// Assigned technician's username.
    pub technician: String,
    /// Site address.
    pub address: String,
    /// Installation or maintenance.
    pub kind: JobKind,
    /// Progress.
    #[serde(default)]
    pub status: JobStatus,
    /// Planned day, absent until booked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<NaiveDate>,
    /// Technician notes.
    #[serde(default)]
    pub notes: String,
}

/// Sortable job attributes.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallationSortKey {
    Id,
    Client,
    Technician,
    Kind,
    Status,
    ScheduledFor,
}

/// Filterable job attributes.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallationFilter {
    Kind,
    Status,
    Technician,
}

/// Body of a create request.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewInstallation {
    pub client: String,
    pub technician: String,
    pub address: String,
    pub kind: JobKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<NaiveDate>,
}

/// Partial update. Absent fields are left unchanged by the service.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InstallationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Record for InstallationRecord {
    type Id = i64;
    type SortKey = InstallationSortKey;
    type FilterKey = InstallationFilter;
    type Draft = NewInstallation;
    type Patch = InstallationPatch;

    const RESOURCE: &'static str = "installations";
    const ENDPOINT: &'static str = "installations/";
    const TITLE: &'static str = "Installation and Maintenance";

    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.client.clone(),
            self.technician.clone(),
            self.address.clone(),
            self.kind.to_string(),
            self.status.to_string(),
            cell(self.scheduled_for.as_ref()),
            self.notes.clone(),
        ]
    }

    fn compare(&self, other: &Self, key: InstallationSortKey) -> Ordering {
        match key {
            InstallationSortKey::Id => self.id.cmp(&other.id),
            InstallationSortKey::Client => self.client.cmp(&other.client),
            InstallationSortKey::Technician => self.technician.cmp(&other.technician),
            InstallationSortKey::Kind => self.kind.to_string().cmp(&other.kind.to_string()),
            InstallationSortKey::Status => self.status.to_string().cmp(&other.status.to_string()),
            InstallationSortKey::ScheduledFor => self.scheduled_for.cmp(&other.scheduled_for),
        }
    }

    fn default_sort_key() -> InstallationSortKey {
        InstallationSortKey::Id
    }

    fn filter_value(&self, key: InstallationFilter) -> Option<String> {
        match key {
            InstallationFilter::Kind => Some(self.kind.to_string()),
            InstallationFilter::Status => Some(self.status.to_string()),
            InstallationFilter::Technician => Some(self.technician.clone()),
        }
    }

    fn export_columns() -> &'static [&'static str] {
        &["ID", "Client", "Technician", "Address", "Kind", "Status", "Scheduled for"]
    }

    fn export_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.client.clone(),
            self.technician.clone(),
            self.address.clone(),
            self.kind.to_string(),
            self.status.to_string(),
            cell(self.scheduled_for.as_ref()),
        ]
    }

    fn validate_draft(draft: &NewInstallation) -> Result<()> {
        if draft.client.trim().is_empty() {
            return Err(Error::invalid_argument("installation client cannot be empty"));
        }
        Ok(())
    }
}
