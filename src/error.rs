use std::error::Error as StdError;

use thiserror::Error;

use crate::view_state::ViewState;

/// Subtitler's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Subtitler's crate-wide error type.
///
/// This is intentionally decoupled from `anyhow` so embedding UIs aren't forced to
/// adopt `anyhow` in their own public APIs.
#[derive(Debug, Error)]
pub enum Error {
    /// Submit was pressed with no file chosen.
    #[error("no file selected")]
    NoFileSelected,

    /// Submit was pressed while an earlier job was still in flight.
    #[error("a submission is already in flight")]
    SubmissionInFlight,

    /// The in-flight job was dropped before the service answered.
    #[error("abandoned before the service answered")]
    SubmissionAbandoned,

    /// The network exchange could not complete.
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The service answered with a status outside `200..=299`.
    #[error("service responded with HTTP {status}")]
    Service { status: u16 },

    /// A success status arrived with a body we could not decode.
    #[error("malformed service response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("view cannot handle `{event}` while in {from:?}")]
    InvalidTransition {
        from: ViewState,
        event: &'static str,
    },

    #[error("invalid service origin '{0}'")]
    InvalidOrigin(String),

    #[error("invalid resource path '{0}'")]
    InvalidResourcePath(String),

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an [`Error`], retained for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Detected locally; nothing was sent over the network.
    Validation,
    Transport,
    Service,
    Internal,
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub(crate) fn transport(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Transport(err.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoFileSelected | Self::SubmissionInFlight => ErrorKind::Validation,
            Self::Transport(_) | Self::SubmissionAbandoned => ErrorKind::Transport,
            Self::Service { .. } | Self::MalformedResponse(_) | Self::InvalidResourcePath(_) => {
                ErrorKind::Service
            }
            _ => ErrorKind::Internal,
        }
    }

    /// Text shown to the user in the form.
    ///
    /// Transport and service failures collapse into one "submission failed" family; the
    /// underlying detail is appended so the message stays legible.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Validation => match self {
                Self::SubmissionInFlight => {
                    "A submission is already in progress. Please wait for it to finish."
                        .to_string()
                }
                _ => "Please select a video file first.".to_string(),
            },
            ErrorKind::Transport | ErrorKind::Service => format!("Submission failed: {self}"),
            ErrorKind::Internal => format!("Unexpected error: {self}"),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err)
    }
}
