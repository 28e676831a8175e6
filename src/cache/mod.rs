//! Credit cache - course-id to credit mappings that outlive a parse.
//!
//! The Bustan main sheet has no credit column; the Golestan main sheet may
//! leave it empty. The auxiliary field-lesson worksheet (and previous
//! sessions) supply a `course id -> credit` mapping the loader consults to
//! backfill records after each parse.
//!
//! Persistence goes through the narrow [`PreferenceStore`] trait so the
//! core stays agnostic about where the mapping lives; [`FileStore`] is a
//! ready-made backend keeping one JSON document per key under a dotdir.
//! A missing or disabled store degrades to an empty in-memory map.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};

/// Store key under which the credit mapping is persisted.
const CREDIT_MAPPINGS_KEY: &str = "credit-mappings";

/// Directory where [`FileStore`] keeps its documents (relative to the
/// current dir).
const DEFAULT_STORE_DIR: &str = ".termplan";

// =============================================================================
// Preference Store
// =============================================================================

/// Minimal key-value persistence the core reads and writes through.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
}

/// File-backed [`PreferenceStore`]: one JSON document per key in a dotdir.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new() -> Self {
        Self::with_dir(DEFAULT_STORE_DIR)
    }

    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        Self { dir: PathBuf::from(dir.as_ref()) }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        fs::create_dir_all(&self.dir).map_err(StoreError::Io)?;
        fs::write(self.path_for(key), value).map_err(StoreError::Io)?;
        Ok(())
    }
}

// =============================================================================
// Credit Cache
// =============================================================================

/// Persisted payload: the mapping plus a write timestamp.
#[derive(Debug, Serialize, Deserialize)]
struct StoredCredits {
    saved_at: String,
    mappings: HashMap<String, f64>,
}

/// In-memory `course id -> credit` mapping with optional persistence.
pub struct CreditCache {
    mappings: HashMap<String, f64>,
    store: Option<Box<dyn PreferenceStore>>,
    persist: bool,
}

impl CreditCache {
    /// Cache without a backing store: starts empty, never persists.
    pub fn new() -> Self {
        Self { mappings: HashMap::new(), store: None, persist: false }
    }

    pub fn with_store(store: Box<dyn PreferenceStore>) -> Self {
        Self { mappings: HashMap::new(), store: Some(store), persist: false }
    }

    /// Toggle use of the backing store. Enabling restores any previously
    /// persisted mapping; an unreadable payload is logged and ignored.
    pub fn set_store_use(&mut self, allowed: bool) {
        self.persist = allowed;
        if !allowed {
            return;
        }
        let Some(store) = &self.store else { return };
        let Some(raw) = store.get(CREDIT_MAPPINGS_KEY) else { return };
        match serde_json::from_str::<StoredCredits>(&raw) {
            Ok(stored) => {
                debug!(count = stored.mappings.len(), saved_at = %stored.saved_at, "restored credit mappings");
                self.mappings.extend(stored.mappings);
            }
            Err(e) => warn!(error = %e, "stored credit mappings are unreadable, starting empty"),
        }
    }

    pub fn lookup(&self, course_id: i64) -> Option<f64> {
        self.mappings.get(&course_id.to_string()).copied()
    }

    pub fn record(&mut self, course_id: impl Into<String>, credit: f64) {
        self.mappings.insert(course_id.into(), credit);
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Write the mapping through the store, when present and allowed.
    /// Write failures are logged, never fatal.
    pub fn flush(&mut self) {
        if !self.persist {
            return;
        }
        let Some(store) = &mut self.store else { return };
        let payload = StoredCredits {
            saved_at: chrono::Utc::now().to_rfc3339(),
            mappings: self.mappings.clone(),
        };
        match serde_json::to_string(&payload) {
            Ok(json) => {
                if let Err(e) = store.set(CREDIT_MAPPINGS_KEY, &json) {
                    warn!(error = %e, "failed to persist credit mappings");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize credit mappings"),
        }
    }
}

impl Default for CreditCache {
    fn default() -> Self {
        Self::new()
    }
}
