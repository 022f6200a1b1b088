use thiserror::Error;

use crate::core::view::{ViewEvent, ViewState};

/// Error type that captures ledger mutation failures.
///
/// Every variant is raised before the ledger is touched, so a failed
/// transfer leaves balances and history exactly as they were.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error("No authenticated session")]
    NotAuthenticated,
    #[error("Invalid draft: {0}")]
    InvalidDraft(String),
    #[error("Insufficient balance: requested {requested:.2}, available {available:.2}")]
    InsufficientFunds { requested: f64, available: f64 },
}

/// Rejected view transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("`{event}` is not available from the {from} screen")]
    NotAllowed { from: ViewState, event: ViewEvent },
    #[error("{0}")]
    Guard(String),
    #[error("An operation is still in progress")]
    Busy,
}

/// Failures raised by a narrative collaborator. These never cross the
/// [`Narrator`](crate::narrative::Narrator) boundary.
#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Service returned status {0}")]
    Status(u16),
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("Request timed out")]
    Timeout,
    #[error("{0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Unified error for session operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Fatal shell errors; command-level problems are reported and the shell
/// keeps running.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}
