use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IssueBoardError {
    #[error("HTTP error: {0:?}")]
    Transport(reqwest::Error),
    #[error("Request timed out")]
    Timeout,
    #[error("Server answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Malformed response from {endpoint}: {source}")]
    MalformedBody {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Base URL cannot hold API paths: {0}")]
    InvalidBaseUrl(String),
    #[error("Session cookie is not a valid header value")]
    InvalidCookie,
    #[error("Refusing to post a blank comment")]
    BlankComment,
    #[error("An issue needs a title")]
    BlankTitle,
    #[error("Issue {0} could not be loaded")]
    IssueUnavailable(crate::tracker::types::IssueKey),
    #[error("No recommended assignee matches {0}")]
    UnknownCandidate(String),
    #[error("No session found, run `issueboard login` first")]
    MissingSession,
    #[error("Could not find a configuration directory")]
    NoProjectDirs,
    #[error("IO error: {0:?}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read configuration: {0}")]
    ConfigRead(#[from] ron::error::SpannedError),
    #[error("Failed to write configuration: {0}")]
    ConfigWrite(#[from] ron::Error),
}

/// Whether a request only reads tracker state or asks for a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Read,
    Write,
}

/// What a failed request means for the server-side state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    /// The request never took effect, it is safe to try again.
    NothingChanged,
    /// The server may have applied the request before it failed, re-fetch before retrying.
    MayHaveApplied,
}

impl IssueBoardError {
    /// Reads never change anything. Writes may have landed unless the request provably never
    /// reached the tracker or was refused.
    pub fn impact(&self, kind: RequestKind) -> Impact {
        if kind == RequestKind::Read {
            return Impact::NothingChanged;
        }

        match self {
            Self::Transport(error) if error.is_connect() || error.is_builder() => {
                Impact::NothingChanged
            }
            Self::Transport(_) | Self::Timeout | Self::MalformedBody { .. } => {
                Impact::MayHaveApplied
            }
            Self::Status { status, .. } if status.is_server_error() => Impact::MayHaveApplied,
            _ => Impact::NothingChanged,
        }
    }
}

impl From<reqwest::Error> for IssueBoardError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(error)
        }
    }
}
