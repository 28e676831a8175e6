//! # Termplan - course-catalog normalization and schedule planning
//!
//! Termplan ingests the two xlsx catalog exports Iranian universities hand
//! out (Bustan and Golestan layouts), normalizes them into one canonical
//! class-record model and detects time and exam-date conflicts over a
//! picked subset of records.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  xlsx bytes │────▶│   Loader    │────▶│   Parser    │────▶│ ClassInfo[] │
//! │ (B/G export)│     │ (dispatch)  │     │ (row mapper)│     │  (merged)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └──────┬──────┘
//!                                                                    │ pick
//!                                                             ┌──────▼──────┐
//!                                                             │  Schedule   │
//!                                                             │ (conflicts) │
//!                                                             └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use termplan::{day_schedule, DatasetLoader, DayOfWeek};
//!
//! fn main() {
//!     let bytes = std::fs::read("catalog.xlsx").unwrap();
//!     let mut loader = DatasetLoader::new();
//!     let classes = loader.load(&bytes, "xlsx").unwrap();
//!     let saturday = day_schedule(&classes[..2], DayOfWeek::Saturday);
//!     println!("{} sessions on Saturday", saturday.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Typed load/store errors
//! - [`models`] - Domain models (ClassInfo, Session, Exam, Time)
//! - [`text`] - Farsi text normalization
//! - [`parser`] - Row-mapper framework and the two dialects
//! - [`cache`] - Credit mappings with optional persistence
//! - [`loader`] - Orchestration: decode, dispatch, backfill
//! - [`schedule`] - Conflict detection and credit totals

// Core modules
pub mod error;
pub mod models;

// Text normalization
pub mod text;

// Parsing
pub mod parser;

// Caching
pub mod cache;

// Orchestration
pub mod loader;

// Planning
pub mod schedule;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{LoadError, LoadResult, StoreError, StoreResult};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    day_label,
    format_exam,
    format_session,
    format_time,
    ranges_overlap,
    ClassInfo,
    DayOfWeek,
    Epoch,
    Exam,
    Session,
    Time,
    WeekParity,
};

// =============================================================================
// Re-exports - Text Normalization
// =============================================================================

pub use text::normalize;

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{map_rows, Assigner, RowMapper};

// =============================================================================
// Re-exports - Credit Cache
// =============================================================================

pub use cache::{CreditCache, FileStore, PreferenceStore};

// =============================================================================
// Re-exports - Loader
// =============================================================================

pub use loader::{DatasetLoader, SUPPORTED_EXTENSION};

// =============================================================================
// Re-exports - Schedule
// =============================================================================

pub use schedule::{
    credit_summary,
    day_schedule,
    weekly_schedule,
    CreditSummary,
    PlannedSession,
};
