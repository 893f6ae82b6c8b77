use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ApiError, Document, Reference};

/// An asynchronous server-side operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    #[serde(rename = "@href", skip_serializing_if = "String::is_empty")]
    pub href: String,

    #[serde(rename = "@type", skip_serializing_if = "String::is_empty")]
    pub kind: String,

    #[serde(rename = "@id", skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(rename = "@name", skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(rename = "@status", skip_serializing_if = "String::is_empty")]
    pub status: String,

    #[serde(rename = "@operation", skip_serializing_if = "String::is_empty")]
    pub operation: String,

    #[serde(rename = "@operationName", skip_serializing_if = "String::is_empty")]
    pub operation_name: String,

    #[serde(rename = "@startTime", skip_serializing_if = "String::is_empty")]
    pub start_time: String,

    #[serde(rename = "@endTime", skip_serializing_if = "String::is_empty")]
    pub end_time: String,

    #[serde(rename = "@expiryTime", skip_serializing_if = "String::is_empty")]
    pub expiry_time: String,

    #[serde(rename = "Description", skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(rename = "Owner", skip_serializing_if = "Option::is_none")]
    pub owner: Option<Reference>,

    #[serde(rename = "Error", skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,

    #[serde(rename = "Progress", skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

impl Document for Task {
    const ROOT: &'static str = "Task";
}

impl Task {
    pub fn status(&self) -> TaskStatus {
        TaskStatus::from(self.status.as_str())
    }
}

/// The lifecycle state of a [`Task`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Queued,
    PreRunning,
    Running,
    Success,
    Error,
    Canceled,
    Aborted,
    Unknown,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Success | Self::Error | Self::Canceled | Self::Aborted
        )
    }
}

impl From<&str> for TaskStatus {
    fn from(s: &str) -> Self {
        match s {
            "queued" => Self::Queued,
            "preRunning" => Self::PreRunning,
            "running" => Self::Running,
            "success" => Self::Success,
            "error" => Self::Error,
            "canceled" => Self::Canceled,
            "aborted" => Self::Aborted,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::Queued => "queued",
            Self::PreRunning => "preRunning",
            Self::Running => "running",
            Self::Success => "success",
            Self::Error => "error",
            Self::Canceled => "canceled",
            Self::Aborted => "aborted",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}
