//! Error types for the bizledger-core library.

use thiserror::Error;

/// Main error type for the bizledger library.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed input rejected before any computation.
    #[error("malformed input: {0}")]
    Input(#[from] InputError),

    /// Document rendering error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Data store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised for line items, invoices or rows that cannot be computed on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Required field is missing.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Field holds a value outside its domain.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    /// Date field could not be parsed.
    #[error("invalid date in {field}: {value:?}")]
    InvalidDate { field: String, value: String },

    /// A persisted row does not match its schema.
    #[error("malformed {table} row: {reason}")]
    Row { table: String, reason: String },
}

impl InputError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors related to document rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    /// HTML template failed to render.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    /// PDF assembly failed.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// An embedded image could not be decoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The bundled font could not be read.
    #[error("font error: {0}")]
    Font(String),

    /// Writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the data store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The table is not known to the store.
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// No row matched the lookup.
    #[error("{table} row not found: {key}")]
    NotFound { table: String, key: String },

    /// The snapshot file is not a map of table names to row arrays.
    #[error("invalid snapshot: {0}")]
    Snapshot(String),
}

/// Result type for the bizledger library.
pub type Result<T> = std::result::Result<T, CoreError>;
