//! The module contains the error the engine can throw.
//!
//! Errors fall in two classes:
//!
//! - validation errors ([`InvalidTransition`], [`ProgramNotOpen`],
//!   [`InvalidCompletionDate`], ...) refuse a request and leave every record
//!   untouched;
//! - persistence errors ([`Database`], [`Persistence`], [`InvalidStatus`])
//!   report a failing or corrupt store.
//!
//!  [`InvalidTransition`]: EngineError::InvalidTransition
//!  [`ProgramNotOpen`]: EngineError::ProgramNotOpen
//!  [`InvalidCompletionDate`]: EngineError::InvalidCompletionDate
//!  [`Database`]: EngineError::Database
//!  [`Persistence`]: EngineError::Persistence
//!  [`InvalidStatus`]: EngineError::InvalidStatus
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    #[error("Program not open: {0}")]
    ProgramNotOpen(String),
    #[error("Invalid completion date: {0}")]
    InvalidCompletionDate(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Returns `true` when the request was refused before touching the store.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition(_)
                | Self::ProgramNotOpen(_)
                | Self::InvalidCompletionDate(_)
                | Self::InvalidAmount(_)
                | Self::InvalidDate(_)
        )
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidTransition(a), Self::InvalidTransition(b)) => a == b,
            (Self::ProgramNotOpen(a), Self::ProgramNotOpen(b)) => a == b,
            (Self::InvalidCompletionDate(a), Self::InvalidCompletionDate(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::InvalidStatus(a), Self::InvalidStatus(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Persistence(a), Self::Persistence(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
