//! Known mutation kinds that can be queued while offline.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Bound for anything the offline queue can carry.
pub trait MutationPayload: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Short human-readable description used in notifications and logs.
    fn label(&self) -> String;
}

/// A permit-to-work creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermitDraft {
    pub project_id: String,
    pub permit_type: String,
    pub work_description: String,
    #[serde(default)]
    pub location: Option<String>,
    /// ISO-8601 planned start, as entered in the form.
    #[serde(default)]
    pub planned_start: Option<String>,
    #[serde(default)]
    pub planned_end: Option<String>,
    /// Remaining form fields, passed through untouched.
    #[serde(default)]
    pub extra: Map<String, Value>,
}

/// An incident report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentDraft {
    pub site_id: String,
    pub title: String,
    pub severity: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Epoch milliseconds the incident occurred.
    #[serde(default)]
    pub occurred_at: Option<i64>,
    #[serde(default)]
    pub extra: Map<String, Value>,
}

/// Tagged union of every write the application queues offline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HsseMutation {
    CreatePermit(PermitDraft),
    ReportIncident(IncidentDraft),
}

impl HsseMutation {
    pub fn kind(&self) -> &'static str {
        match self {
            HsseMutation::CreatePermit(_) => "create_permit",
            HsseMutation::ReportIncident(_) => "report_incident",
        }
    }
}

impl MutationPayload for HsseMutation {
    fn label(&self) -> String {
        match self {
            HsseMutation::CreatePermit(p) => format!("Permit for project {}", p.project_id),
            HsseMutation::ReportIncident(i) => format!("Incident \"{}\"", i.title),
        }
    }
}
