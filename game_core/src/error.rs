// Should be level 0, like common.rs

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorLevel {
    NonCritical,
    Critical,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// For instance, targeting a square while no piece is selected.
    ///
    /// Player input is expected to be dropped quietly, so this mostly shows
    /// up in logs and in direct calls to the lower level operations.
    #[error("command not currently possible [{0}]")]
    NotPossibleForState(String),
    /// The story generator could not settle a fight. The pending combat is
    /// abandoned and the turn is handed back to the attacking side.
    #[error("combat could not be resolved [{0}]")]
    CombatResolutionFailed(#[from] CombatFailure),
    /// Configuration could not be read or contains values out of range.
    #[error("invalid configuration [{0}]")]
    Configuration(String),
    /// Basically, programmer messed up, and the board is now in an invalid
    /// state (a missing king, two pieces on one square, and so on).
    #[error("programmer error detected, crashing [{0}]")]
    FailureCritical(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatFailure {
    #[error("narrator failed: {0}")]
    Service(String),
    #[error("narrator returned an empty response")]
    EmptyResponse,
    #[error("no verdict after {0:?}")]
    TimedOut(Duration),
    #[error("combat worker hung up without a verdict")]
    Disconnected,
}

impl Error {
    pub fn error_level(&self) -> ErrorLevel {
        use Error::*;
        match self {
            FailureCritical(_) => ErrorLevel::Critical,
            _ => ErrorLevel::NonCritical,
        }
    }

    pub fn is_critical(&self) -> bool {
        self.error_level() == ErrorLevel::Critical
    }
}

pub trait ErrorMsg {
    fn invalid<T>(&self) -> Result<T>;
    fn fail_critical<T>(&self) -> Result<T>;
    fn invalid_msg(&self) -> Error;
    fn fail_critical_msg(&self) -> Error;
}

impl ErrorMsg for str {
    fn invalid<T>(&self) -> Result<T> {
        Err(self.invalid_msg())
    }
    fn fail_critical<T>(&self) -> Result<T> {
        Err(self.fail_critical_msg())
    }
    fn invalid_msg(&self) -> Error {
        Error::NotPossibleForState(self.to_string())
    }
    fn fail_critical_msg(&self) -> Error {
        Error::FailureCritical(self.to_string())
    }
}
