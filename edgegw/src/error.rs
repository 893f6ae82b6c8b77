use edgegw_types::{ApiError, TaskStatus, from_xml};
use reqwest::StatusCode;

/// Errors returned by the client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Local state required by the operation is not available.
    #[error("missing state: {0}")]
    MissingState(&'static str),

    /// The API rejected the request.
    #[error("{op}: api error: {status}: {message}")]
    Api {
        op: &'static str,
        status: StatusCode,
        code: String,
        message: String,
    },

    /// The gateway is locked by another task. Sending the request again
    /// later will succeed.
    #[error("{op}: gateway busy: {status}: {message}")]
    Busy {
        op: &'static str,
        status: StatusCode,
        message: String,
    },

    #[error("{op}: gateway still busy after {attempts} attempts: {message}")]
    RetriesExhausted {
        op: &'static str,
        attempts: u32,
        message: String,
    },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("xml decode error: {0}")]
    Decode(#[from] quick_xml::DeError),

    #[error("xml encode error: {0}")]
    Encode(#[from] quick_xml::SeError),

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("task failed: {message}")]
    TaskFailed { message: String },

    #[error("task {status}")]
    TaskAborted { status: TaskStatus },
}

/// Operation named by errors created outside of a gateway operation.
const REQUEST: &str = "request";

impl Error {
    /// Create an error from a non-2xx response.
    ///
    /// The body is expected to be a vCloud `<Error>` document. If it is not,
    /// the raw body is used as message.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        match from_xml::<ApiError>(body) {
            Ok(e) if e.is_busy() => Self::Busy {
                op: REQUEST,
                status,
                message: e.message,
            },
            Ok(e) if !e.message.is_empty() => Self::Api {
                op: REQUEST,
                status,
                code: e.minor_error_code,
                message: e.message,
            },
            _ => Self::Api {
                op: REQUEST,
                status,
                code: String::new(),
                message: body.trim().to_string(),
            },
        }
    }

    /// Name the operation during which a response error occurred.
    pub fn during(mut self, name: &'static str) -> Self {
        if let Self::Api { op, .. } | Self::Busy { op, .. } | Self::RetriesExhausted { op, .. } =
            &mut self
        {
            *op = name
        }
        self
    }

    /// The operation named by this error, if any.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Api { op, .. } | Self::Busy { op, .. } | Self::RetriesExhausted { op, .. } => {
                Some(*op)
            }
            _ => None,
        }
    }

    /// Is this error expected to go away when the request is repeated?
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::Error;

    #[test]
    fn classify_response() {
        let e = Error::from_response(
            StatusCode::BAD_REQUEST,
            r#"<Error minorErrorCode="BUSY_ENTITY" majorErrorCode="400"
                      message="The entity gw-1 is busy completing an operation."/>"#,
        );
        assert!(e.is_transient());

        let e = Error::from_response(
            StatusCode::FORBIDDEN,
            r#"<Error minorErrorCode="ACCESS_TO_RESOURCE_IS_FORBIDDEN" majorErrorCode="403"
                      message="Access is forbidden"/>"#,
        );
        assert!(!e.is_transient());
        let Error::Api {
            op,
            status,
            code,
            message,
        } = e
        else {
            unreachable!()
        };
        assert_eq!(StatusCode::FORBIDDEN, status);
        assert_eq!("ACCESS_TO_RESOURCE_IS_FORBIDDEN", code);
        assert_eq!("Access is forbidden", message);
        assert_eq!("request", op);

        let e = Error::from_response(StatusCode::BAD_GATEWAY, "upstream unavailable\n");
        let Error::Api { message, .. } = e else {
            unreachable!()
        };
        assert_eq!("upstream unavailable", message);
    }

    #[test]
    fn name_operation() {
        let e = Error::from_response(StatusCode::NOT_FOUND, "gone").during("add nat rule");
        assert_eq!(Some("add nat rule"), e.operation());
        assert_eq!("add nat rule: api error: 404 Not Found: gone", e.to_string());

        let e = Error::MissingState("gateway snapshot").during("add nat rule");
        assert_eq!(None, e.operation());
        assert_eq!("missing state: gateway snapshot", e.to_string());
    }
}
