//! This module acts as a central hub for all database-related logic.
//! It declares the storage submodules and the error type shared by them,
//! e.g. `database::homework::fetch_all_homework`.

pub mod homework;
pub mod init;
pub mod models;

pub use init::{DbPool, connect, connect_in_memory, database_url_from_env};

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure raised by the record store or the storage bootstrap.
#[derive(Debug)]
pub enum StoreError {
    Database(sqlx::Error),
    Migrate(sqlx::migrate::MigrateError),
    /// A required homework field was blank; carries the field name.
    Validation(&'static str),
    /// A homework field exceeded `max` characters.
    TooLong { field: &'static str, max: usize },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Database(err) => write!(f, "database error: {err}"),
            Self::Migrate(err) => write!(f, "migration error: {err}"),
            Self::Validation(field) => write!(f, "`{field}` must not be empty"),
            Self::TooLong { field, max } => {
                write!(f, "`{field}` must be at most {max} characters")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Database(err) => Some(err),
            Self::Migrate(err) => Some(err),
            Self::Validation(_) | Self::TooLong { .. } => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(value: sqlx::Error) -> Self {
        Self::Database(value)
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(value: sqlx::migrate::MigrateError) -> Self {
        Self::Migrate(value)
    }
}
