//! Maintenance job definitions
//!
//! Only definitions are produced here; running them is someone else's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity, state and history shared by every job kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct JobBase {
    /// Job name
    pub name: String,
    /// Owning package
    pub package_id: String,
    /// Dataset the job maintains
    pub dataset: String,
    /// Creation time
    pub created: DateTime<Utc>,
    /// Creating actor
    pub created_by: String,
    /// Last update time
    pub updated: DateTime<Utc>,
    /// Last updating actor
    pub updated_by: String,

    /// When the running execution started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_execution: Option<DateTime<Utc>>,
    /// Last progress report of the running execution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_update: Option<DateTime<Utc>>,
    /// Worker running the job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executing_on: Option<String>,
    /// Disabled jobs are not scheduled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_disabled: Option<bool>,

    /// Id of the last execution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_execution_id: Option<String>,
    /// When the job last ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_executed: Option<DateTime<Utc>>,
    /// Message of the last run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_execute_message: Option<String>,
    /// Duration of the last run in milliseconds
    #[serde(default)]
    pub last_execute_duration: u64,

    /// When the job last succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_success: Option<DateTime<Utc>>,
    /// Id of the last successful execution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_success_id: Option<String>,
    /// Message of the last success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_success_message: Option<String>,
    /// Duration of the last success in milliseconds
    #[serde(default)]
    pub last_success_duration: u64,
}

impl JobBase {
    /// New job created and last updated by `actor` at `now`
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        package_id: impl Into<String>,
        dataset: impl Into<String>,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            package_id: package_id.into(),
            dataset: dataset.into(),
            created: now,
            created_by: actor.to_string(),
            updated: now,
            updated_by: actor.to_string(),
            started_execution: None,
            progress_update: None,
            executing_on: None,
            is_disabled: None,
            last_execution_id: None,
            last_executed: None,
            last_execute_message: None,
            last_execute_duration: 0,
            last_success: None,
            last_success_id: None,
            last_success_message: None,
            last_success_duration: 0,
        }
    }
}

/// Job acting on a dataset setting at a scheduled time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScheduledJob {
    /// Common job fields
    #[serde(flatten)]
    pub base: JobBase,
    /// Setting the job enforces
    pub setting_name: String,
    /// Full name of the variable the setting resolved to
    pub variable_name: String,
    /// When the job should next run
    pub next_execution: DateTime<Utc>,
}
