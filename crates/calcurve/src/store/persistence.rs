//! Persistence for in-memory stores - save/load JSON snapshots.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{CurveError, Result};

use super::memory::{InMemoryCurveStore, StoreState};

impl InMemoryCurveStore {
    /// Save the store contents to a JSON snapshot.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use calcurve::store::InMemoryCurveStore;
    /// # fn example(store: &InMemoryCurveStore) -> calcurve::Result<()> {
    /// store.save("curves.snapshot.json")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    CurveError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let file = File::create(path).map_err(|source| CurveError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.snapshot()?).map_err(|e| {
            CurveError::Persistence(format!("Failed to serialize curve store: {}", e))
        })?;

        Ok(())
    }

    /// Load a store from a JSON snapshot.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|source| CurveError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let reader = BufReader::new(file);
        let state: StoreState = serde_json::from_reader(reader).map_err(|e| {
            CurveError::Persistence(format!(
                "Failed to parse curve store '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self::from_state(state))
    }
}
