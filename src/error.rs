use rusqlite::ffi;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("not found")]
    NotFound,

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid reference: {0}")]
    InvalidReference(String),

    #[error("device {device_id} cannot have parent {parent_id}: the device hierarchy would contain a cycle")]
    DeviceCycle { device_id: i64, parent_id: i64 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl Error {
    /// Maps SQLite constraint failures onto the typed variants and keeps
    /// every other error as `Database`.
    pub(crate) fn from_write(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ref failure, ref message) = err {
            let detail = message
                .clone()
                .unwrap_or_else(|| failure.to_string());
            match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return Self::AlreadyExists(detail);
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => return Self::InvalidReference(detail),
                _ => {}
            }
        }
        Self::Database(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
