//! Error types for the asset library

use crate::category::Category;
use thiserror::Error;

/// Errors raised by the persistence gateway and its backends.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Collection has no registered write allow-list
    #[error("Schema not defined for table {0}")]
    UnknownTable(String),

    /// The backend rejected the request; the message is passed through verbatim
    #[error("{message}")]
    Backend { status: Option<u16>, message: String },

    /// The request never reached the backend
    #[error("Network error: {0}")]
    Transport(String),

    /// Row does not exist
    #[error("Row {id} not found in {table}")]
    NotFound { table: String, id: String },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend is not configured
    #[error("Backend URL is not configured (set BHHUB_URL or run `bhhub config --show`)")]
    NotConfigured,
}

/// Errors raised while editing filter selections.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("{0} has no filters")]
    NoFilters(Category),

    #[error("{category} has no filter named '{key}' (available: {available})")]
    UnknownFilter {
        category: Category,
        key: String,
        available: String,
    },

    #[error("'{0}' is not a valid on/off value")]
    InvalidToggle(String),
}

/// Errors surfaced by session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Input rejected before any network call
    #[error("{0}")]
    Validation(String),

    /// Operation needs a specific category selected
    #[error("Select a category first")]
    NoActiveCategory,

    #[error("Folder {0} not found")]
    FolderNotFound(String),

    #[error("{category} record {id} not found")]
    RecordNotFound { category: Category, id: String },

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Errors raised by the hosted auth endpoints.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Rejected(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Backend URL is not configured")]
    NotConfigured,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
