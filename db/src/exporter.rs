//! Key-value store exporter.
//!
//! An export is a straight sequence: enumerate all keys, fetch each value, serialize the
//! resulting mapping and write it to the output file. The mapping keeps the order in which the
//! store enumerated the keys.
//!
//! Any failure aborts the run before the output file is touched, so a failed export either
//! leaves no file at all or leaves a previous export intact.

use crate::config::ExportConfig;
use crate::error::Result;
use crate::io::Io;
use crate::report::ExportReport;
use crate::store::{KeyValueStore, ReplitStore};
use serde_json::{Map, Value as JValue};
use tracing::{debug, info};

/// In-memory snapshot of the store, key to value.
pub type ExportMapping = Map<String, JValue>;

/// A structure representing an export of a single store into a single file.
#[derive(Debug)]
pub struct Exporter<S> {
    store: S,
    io: Io,
    pretty: bool,
}

impl Exporter<ReplitStore> {
    /// Create an exporter for a Replit Database described by `config`.
    ///
    /// # Errors
    /// The function may fail if the output path is invalid or the HTTP client cannot be created.
    pub fn from_config(config: &ExportConfig) -> Result<Self> {
        let store = ReplitStore::new(&config.db_url)?.with_prefix(&config.prefix);
        let io = Io::new(&config.output)?;
        Ok(Self::new(store, io).with_pretty(config.pretty))
    }
}

impl<S> Exporter<S>
where
    S: KeyValueStore,
{
    /// Create an exporter reading from `store` and writing into `io`.
    ///
    /// The document is indented by default.
    #[must_use]
    pub fn new(store: S, io: Io) -> Self {
        Self {
            store,
            io,
            pretty: true,
        }
    }

    /// Select between indented and compact output.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Read the whole store into memory.
    ///
    /// One enumeration call is followed by one fetch per key.
    ///
    /// # Errors
    /// The first failing store call aborts the collection and its error is returned.
    pub fn collect(&self) -> Result<ExportMapping> {
        let keys = self.store.keys()?;
        info!(count = keys.len(), "enumerated store keys");

        let mut mapping = ExportMapping::new();
        for key in keys {
            let value = self.store.get(&key)?;
            debug!(key = %key, "fetched value");
            mapping.insert(key, value);
        }
        Ok(mapping)
    }

    /// Export the store into the output file.
    ///
    /// A pre-existing output file is replaced without confirmation.
    ///
    /// # Errors
    /// The function may return connectivity or serialization errors coming from the store and
    /// I/O errors coming from the output file.
    pub fn run(&self) -> Result<ExportReport> {
        info!(path = %self.io.path().display(), "exporting store");
        let mapping = self.collect()?;
        self.io.serialize(&mapping, self.pretty)?;

        let report = ExportReport::new(self.io.path(), mapping.len());
        info!(keys = report.keys, path = %report.path.display(), "export finished");
        Ok(report)
    }
}
