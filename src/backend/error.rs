//! Error types for backend calls.

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// The backend call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListDocuments,
    Upload,
    ClearDocuments,
    Query,
}

impl Operation {
    /// User-facing text for a non-success response.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::ListDocuments => "Failed to fetch documents",
            Self::Upload => "Failed to upload document",
            Self::ClearDocuments => "Failed to clear documents",
            Self::Query => "Failed to get response from server",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ListDocuments => "list_documents",
            Self::Upload => "upload",
            Self::ClearDocuments => "clear_documents",
            Self::Query => "query",
        };
        f.write_str(name)
    }
}

/// Backend error.
///
/// The UI does not branch on the variant: every failure is shown through its
/// `Display` text.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Connection, protocol or body decoding failure.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{}", .operation.failure_message())]
    Status {
        /// The call that was rejected.
        operation: Operation,
        /// HTTP status returned by the backend.
        status: StatusCode,
    },

    /// The configured base URL is not an absolute URL.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Result type alias for backend calls.
pub type Result<T> = std::result::Result<T, BackendError>;
