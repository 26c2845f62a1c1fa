use std::fmt;

use serde::Serialize;

/// Correlates an engine command with its completion event.
pub type Ticket = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetRequestBody {
    pub email: String,
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ResetConfirmBody {
    pub uid: String,
    pub token: String,
    pub new_password: String,
}

impl fmt::Debug for ResetConfirmBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetConfirmBody")
            .field("uid", &self.uid)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ResetRequested {
        ticket: Ticket,
        result: Result<(), AuthError>,
    },
    ResetConfirmed {
        ticket: Ticket,
        result: Result<(), AuthError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    pub kind: FailureKind,
    pub message: String,
}

impl AuthError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// True when the service answered; false for transport failures.
    pub fn is_rejection(&self) -> bool {
        matches!(self.kind, FailureKind::HttpStatus { .. })
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for AuthError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidBaseUrl,
    /// Non-2xx reply. `detail` is the body's `detail` string, when there is one.
    HttpStatus { status: u16, detail: Option<String> },
    Timeout,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidBaseUrl => write!(f, "invalid base url"),
            FailureKind::HttpStatus { status, .. } => write!(f, "http status {status}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
