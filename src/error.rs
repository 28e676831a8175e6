//! Error types for the dataset loading pipeline.
//!
//! - [`LoadError`] - terminal errors for one `load` call
//! - [`StoreError`] - preference store read/write errors
//!
//! Row-level anomalies (short rows, unparsable day names or session/exam
//! text) are not errors: they are logged and the offending row or field is
//! skipped, so a single bad row never aborts a parse.

use thiserror::Error;

// =============================================================================
// Dataset Loading Errors
// =============================================================================

/// Terminal errors while loading a course-catalog workbook.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The claimed file extension is not the supported container type.
    #[error("unsupported file extension '{0}', expected 'xlsx'")]
    UnsupportedFormat(String),

    /// The container bytes could not be decoded as an xlsx workbook.
    #[error("malformed xlsx container: {0}")]
    MalformedInput(#[from] calamine::XlsxError),

    /// The decoded sheet's column count matches neither known dialect.
    #[error("unrecognized sheet layout: {0} columns match no known dialect")]
    UnrecognizedLayout(usize),

    /// Decoding succeeded but the workbook yielded zero usable rows.
    #[error("no usable rows in the workbook")]
    EmptyResult,
}

// =============================================================================
// Preference Store Errors
// =============================================================================

/// Errors from a [`crate::cache::PreferenceStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying IO failure.
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for preference store operations.
pub type StoreResult<T> = Result<T, StoreError>;
