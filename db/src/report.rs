//! Export report.
//!
//! A report summarizes what a successful run produced and is what callers get back from
//! [`crate::exporter::Exporter::run`].

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A structure representing the outcome of an export.
#[non_exhaustive]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExportReport {
    /// Absolute path of the written document.
    pub path: PathBuf,
    /// Number of exported keys.
    pub keys: usize,
    /// Export completion date.
    pub exported_at: DateTime<Local>,
}

impl ExportReport {
    /// Return a report of `keys` entries written into `path`, completed now.
    #[must_use]
    pub fn new(path: &Path, keys: usize) -> Self {
        Self {
            path: path.to_path_buf(),
            keys,
            exported_at: Local::now(),
        }
    }
}
