//! Crate-wide error types.
//!
//! Library modules return [`Error`] through the [`Result`] alias. The CLI
//! wraps everything in `anyhow` for convenient reporting.
//!
//! # Example
//!
//! ```ignore
//! use tracktable::error::{Result, ResultExt};
//!
//! fn covers(path: &Path) -> Result<usize> {
//!     let flac = FlacFormat::open(path).with_context("reading covers")?;
//!     Ok(flac.covers().len())
//! }
//! ```

use std::path::PathBuf;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error surfaced unchanged from the tag library
    #[error("Tag error: {0}")]
    Tag(#[from] lofty::error::LoftyError),

    /// A column with this identifier is already registered
    #[error("Column '{0}' is already registered")]
    DuplicateColumn(String),

    /// A column definition that can never be instantiated
    #[error("Invalid column definition: {0}")]
    InvalidColumn(String),

    /// A column declares a cell property its renderer cannot take
    #[error("Column '{column}' sets '{property}', which its renderer does not support")]
    UnsupportedCellProperty {
        column: String,
        property: &'static str,
    },

    /// No column with this identifier exists in the registry
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Row index past the end of the playlist
    #[error("Row {0} is out of range")]
    RowOutOfRange(usize),

    /// A rating interaction was routed to a column that does not render ratings
    #[error("Column '{0}' does not render ratings")]
    NotRatingColumn(String),

    /// The container can't store a tag under this name
    #[error("Invalid tag name: {0:?}")]
    InvalidTagName(String),

    /// No tag format handles this file
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an invalid column error.
    pub fn invalid_column(message: impl Into<String>) -> Self {
        Self::InvalidColumn(message.into())
    }

    /// Create an unknown column error.
    pub fn unknown_column(id: impl Into<String>) -> Self {
        Self::UnknownColumn(id.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, lofty::error::LoftyError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Tag(e).context(ctx))
    }
}
