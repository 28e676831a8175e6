//! Dataset loading orchestration.
//!
//! [`DatasetLoader::load`] turns a raw xlsx byte buffer into canonical
//! [`ClassInfo`] records: check the claimed extension, decode the
//! container, pick the dialect by the first worksheet's column count
//! (12 -> Bustan, 14 -> Golestan), run the row mapper and backfill missing
//! credits from the cache. Each call builds fresh state; only the credit
//! cache survives between calls.
//!
//! The Bustan auxiliary credit worksheet is also 14 columns wide, so it
//! cannot be told apart from a Golestan sheet by width alone; it has its
//! own explicit entry point, [`DatasetLoader::load_credit_sheet`].

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use tracing::debug;

use crate::cache::{CreditCache, PreferenceStore};
use crate::error::{LoadError, LoadResult};
use crate::models::ClassInfo;
use crate::parser::{bustan, golestan, map_rows};

/// The one supported container extension.
pub const SUPPORTED_EXTENSION: &str = "xlsx";

/// First worksheet of a decoded workbook.
struct Sheet {
    width: usize,
    rows: Vec<Vec<Data>>,
}

impl Sheet {
    /// Data rows, i.e. everything after the header row.
    fn data_rows(&self) -> impl Iterator<Item = &[Data]> {
        self.rows.iter().skip(1).map(|r| r.as_slice())
    }
}

/// Stateful loader owning the credit cache shared across parses.
///
/// Not safe for concurrent use: callers invoke one instance from one place
/// at a time.
pub struct DatasetLoader {
    cache: CreditCache,
}

impl DatasetLoader {
    /// Loader without a preference store: the credit cache starts empty on
    /// every run and is never persisted.
    pub fn new() -> Self {
        Self { cache: CreditCache::new() }
    }

    pub fn with_store(store: Box<dyn PreferenceStore>) -> Self {
        Self { cache: CreditCache::with_store(store) }
    }

    /// Allow or forbid persisting the credit cache through the store.
    pub fn set_store_use(&mut self, allowed: bool) {
        self.cache.set_store_use(allowed);
    }

    pub fn cache(&self) -> &CreditCache {
        &self.cache
    }

    /// Load a course-catalog workbook into canonical records.
    ///
    /// Records are insertion-ordered by first appearance of their merge
    /// key. All errors are terminal for this call; nothing is retried.
    pub fn load(&mut self, bytes: &[u8], extension: &str) -> LoadResult<Vec<ClassInfo>> {
        check_extension(extension)?;
        let sheet = decode_first_sheet(bytes)?;
        self.load_sheet(&sheet)
    }

    fn load_sheet(&mut self, sheet: &Sheet) -> LoadResult<Vec<ClassInfo>> {
        if sheet.rows.len() < 2 {
            return Err(LoadError::EmptyResult);
        }

        debug!(width = sheet.width, rows = sheet.rows.len(), "dispatching worksheet");
        let mut records = match sheet.width {
            bustan::SHEET_WIDTH => map_rows(sheet.data_rows(), &bustan::MAPPER),
            golestan::SHEET_WIDTH => map_rows(sheet.data_rows(), &golestan::MAPPER),
            other => return Err(LoadError::UnrecognizedLayout(other)),
        };

        for record in &mut records {
            if record.credit.is_none() {
                record.credit = self.cache.lookup(record.course_id);
            }
        }

        if records.is_empty() {
            return Err(LoadError::EmptyResult);
        }
        Ok(records)
    }

    /// Ingest the auxiliary field-lesson worksheet into the credit cache.
    ///
    /// Returns the number of mappings read. The cache is flushed through
    /// the preference store when persistence is allowed.
    pub fn load_credit_sheet(&mut self, bytes: &[u8], extension: &str) -> LoadResult<usize> {
        check_extension(extension)?;
        let sheet = decode_first_sheet(bytes)?;
        self.ingest_credit_sheet(&sheet)
    }

    fn ingest_credit_sheet(&mut self, sheet: &Sheet) -> LoadResult<usize> {
        let pairs = golestan::credit_rows(sheet.data_rows());
        if pairs.is_empty() {
            return Err(LoadError::EmptyResult);
        }
        let count = pairs.len();
        for (course_id, credit) in pairs {
            self.cache.record(course_id, credit);
        }
        self.cache.flush();
        Ok(count)
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn check_extension(extension: &str) -> LoadResult<()> {
    let ext = extension.trim_start_matches('.');
    if ext.eq_ignore_ascii_case(SUPPORTED_EXTENSION) {
        Ok(())
    } else {
        Err(LoadError::UnsupportedFormat(extension.to_string()))
    }
}

fn decode_first_sheet(bytes: &[u8]) -> LoadResult<Sheet> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let Some(name) = workbook.sheet_names().first().cloned() else {
        return Err(LoadError::EmptyResult);
    };
    let range = workbook.worksheet_range(&name)?;
    Ok(Sheet {
        width: range.width(),
        rows: range.rows().map(|r| r.to_vec()).collect(),
    })
}
