use thiserror::Error;

use crate::runtime::contract::ValidationError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrchestrationError {
    #[error("{0}")]
    Config(ValidationError),
    #[error("invalid event: {0}")]
    InvalidEvent(String),
    #[error("no {resource} found for {lookup}")]
    NotFound {
        resource: &'static str,
        lookup: String,
    },
    #[error("{operation} failed: {message}")]
    Remote {
        operation: &'static str,
        message: String,
    },
}

impl OrchestrationError {
    pub fn remote(operation: &'static str) -> impl FnOnce(String) -> Self {
        move |message| Self::Remote { operation, message }
    }

    pub fn invalid_event(error: impl std::fmt::Display) -> Self {
        Self::InvalidEvent(error.to_string())
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}
