use serde::{Deserialize, Serialize};

use crate::Document;

/// Minor error code of a request rejected because the entity is locked by
/// another task.
const BUSY_ENTITY: &str = "BUSY_ENTITY";

/// Message suffix of a request rejected because the entity is locked by
/// another task.
const BUSY_SUFFIX: &str = "is busy completing an operation.";

/// The body of a non-2xx API response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiError {
    #[serde(rename = "@message")]
    pub message: String,

    #[serde(rename = "@majorErrorCode")]
    pub major_error_code: i32,

    #[serde(rename = "@minorErrorCode")]
    pub minor_error_code: String,

    #[serde(
        rename = "@vendorSpecificErrorCode",
        skip_serializing_if = "String::is_empty"
    )]
    pub vendor_specific_error_code: String,

    #[serde(rename = "@stackTrace", skip_serializing_if = "String::is_empty")]
    pub stack_trace: String,
}

impl Document for ApiError {
    const ROOT: &'static str = "Error";
}

impl ApiError {
    /// Was the request rejected because another task holds the entity?
    ///
    /// Such requests succeed when sent again after the other task finished.
    pub fn is_busy(&self) -> bool {
        self.minor_error_code == BUSY_ENTITY || self.message.trim_end().ends_with(BUSY_SUFFIX)
    }
}
