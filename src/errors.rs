//! Unified error types and result handling.
//!
//! Every core operation returns [`Result`]. The transport layer maps
//! [`Error::kind`] onto its own status codes; the core never encodes one.

use sea_orm::{DbErr, SqlErr};
use std::fmt;
use thiserror::Error;

/// The kind of resource an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A registered user
    User,
    /// A trip aggregate root
    Trip,
    /// A city within a trip
    City,
    /// An activity within a city
    Activity,
    /// The budget attached to a trip
    Budget,
    /// An expense logged against a budget
    Expense,
    /// A public share token
    ShareToken,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::User => "User",
            Self::Trip => "Trip",
            Self::City => "City",
            Self::Activity => "Activity",
            Self::Budget => "Budget",
            Self::Expense => "Expense",
            Self::ShareToken => "Share token",
        };
        f.write_str(name)
    }
}

/// Coarse error taxonomy exposed to collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The resource or one of its ancestors does not exist
    NotFound,
    /// The actor may not perform the operation
    AccessDenied,
    /// A uniqueness invariant would be violated
    Conflict,
    /// A business invariant was violated by the arguments
    InvalidArgument,
    /// Storage failure; safe to retry
    Unavailable,
}

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{resource} not found: {id}")]
    NotFound { resource: ResourceKind, id: String },

    #[error("Access denied to {resource} {id}")]
    AccessDenied { resource: ResourceKind, id: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: f64 },

    #[error("Invalid reorder: {message}")]
    InvalidReorder { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds a `NotFound` error for the given resource.
    pub fn not_found(resource: ResourceKind, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Builds an `AccessDenied` error for the given resource.
    pub fn access_denied(resource: ResourceKind, id: impl ToString) -> Self {
        Self::AccessDenied {
            resource,
            id: id.to_string(),
        }
    }

    /// Builds an `InvalidArgument` error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Maps this error onto the taxonomy collaborators translate into responses.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AccessDenied { .. } => ErrorKind::AccessDenied,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::InvalidArgument { .. }
            | Self::InvalidAmount { .. }
            | Self::InvalidReorder { .. } => ErrorKind::InvalidArgument,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) => ErrorKind::Unavailable,
        }
    }
}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => Self::Conflict { message },
            _ => Self::Database(err),
        }
    }
}

impl From<std::num::TryFromIntError> for Error {
    fn from(err: std::num::TryFromIntError) -> Self {
        Self::invalid(format!("integer out of range: {err}"))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            Error::not_found(ResourceKind::Trip, 1).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            Error::access_denied(ResourceKind::City, 2).kind(),
            ErrorKind::AccessDenied
        );
        assert_eq!(
            Error::InvalidAmount { amount: -1.0 }.kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            Error::InvalidReorder {
                message: "x".to_string()
            }
            .kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            Error::from(DbErr::Custom("boom".to_string())).kind(),
            ErrorKind::Unavailable
        );
    }

    #[test]
    fn test_not_found_message_names_resource() {
        let err = Error::not_found(ResourceKind::Activity, 42);
        assert_eq!(err.to_string(), "Activity not found: 42");
    }
}
