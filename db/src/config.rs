//! Export configuration.
//!
//! All the settings a run depends on are gathered into [`ExportConfig`] which is built once at
//! program start and handed over to the exporter. Nothing is read from global state afterwards.

use crate::error::{CustomKind, Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Output file used when none is given explicitly.
pub const DEFAULT_OUTPUT: &str = "replit_db_export.json";

/// Environment variable holding the database URL.
pub const DB_URL_ENV: &str = "REPLIT_DB_URL";

/// File holding the database URL in deployed environments.
pub const DB_URL_FILE: &str = "/tmp/replitdb";

/// A structure representing settings of a single export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Base URL of the key-value store.
    pub db_url: String,
    /// Path of the output document.
    pub output: PathBuf,
    /// Only keys starting with the prefix are exported. Empty prefix selects every key.
    pub prefix: String,
    /// Whether the output document is indented.
    pub pretty: bool,
}

impl ExportConfig {
    /// Return a configuration exporting every key of `db_url` into [`DEFAULT_OUTPUT`].
    ///
    /// # Errors
    /// Fails if `db_url` is not an HTTP(S) URL.
    pub fn new(db_url: &str) -> Result<Self> {
        Ok(Self {
            db_url: Self::validate_db_url(db_url)?,
            output: PathBuf::from(DEFAULT_OUTPUT),
            prefix: String::new(),
            pretty: true,
        })
    }

    /// Resolve the database URL.
    ///
    /// An explicit, non-empty value wins (the CLI feeds both its flag and [`DB_URL_ENV`] through
    /// here). Otherwise the URL is read from [`DB_URL_FILE`].
    ///
    /// # Errors
    /// Returns a custom [`CustomKind::InvalidArgument`] error when no URL is configured anywhere
    /// or the configured one is not an HTTP(S) URL.
    pub fn resolve_db_url(explicit: Option<String>) -> Result<String> {
        Self::resolve_db_url_from(explicit, Path::new(DB_URL_FILE))
    }

    fn resolve_db_url_from(explicit: Option<String>, fallback: &Path) -> Result<String> {
        if let Some(url) = explicit.filter(|url| !url.trim().is_empty()) {
            return Self::validate_db_url(&url);
        }

        // A missing file is not an error on its own, just another unconfigured source
        match fs::read_to_string(fallback) {
            Ok(content) if !content.trim().is_empty() => {
                debug!(file = %fallback.display(), "database URL read from file");
                Self::validate_db_url(&content)
            }
            _ => Err(Error::custom_err(
                CustomKind::InvalidArgument,
                &format!(
                    "No database URL configured: set {} or provide {}",
                    DB_URL_ENV,
                    fallback.display()
                ),
            )),
        }
    }

    fn validate_db_url(url: &str) -> Result<String> {
        let url = url.trim().trim_end_matches('/');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::custom_err(
                CustomKind::InvalidArgument,
                &format!("Database URL must be an HTTP(S) URL: {}", url),
            ));
        }
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use tempdir::TempDir;

    const URL: &'static str = "https://kv.replit.com/v0/token";

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new("").unwrap()
    }

    #[test]
    fn default_configuration_exports_everything_into_default_file() {
        let config = ExportConfig::new(URL).unwrap();
        assert_eq!(URL, config.db_url);
        assert_eq!(PathBuf::from(DEFAULT_OUTPUT), config.output);
        assert!(config.prefix.is_empty());
        assert!(config.pretty);
    }

    #[rstest]
    #[case::trailing_slash("https://kv.replit.com/v0/token/")]
    #[case::whitespace("  https://kv.replit.com/v0/token\n")]
    fn url_is_normalized(#[case] raw: &str) {
        assert_eq!(URL, ExportConfig::new(raw).unwrap().db_url);
    }

    #[rstest]
    #[case::no_scheme("kv.replit.com/v0/token")]
    #[case::other_scheme("ftp://kv.replit.com")]
    fn non_http_url_is_rejected(#[case] raw: &str) {
        let err = ExportConfig::new(raw).unwrap_err();
        assert_eq!(CustomKind::InvalidArgument, *err.get_custom_kind().unwrap());
    }

    #[rstest]
    fn explicit_url_takes_precedence_over_file(temp_dir: TempDir) {
        let file = temp_dir.path().join("replitdb");
        fs::write(&file, "http://from-file").unwrap();

        let url = ExportConfig::resolve_db_url_from(Some(URL.to_string()), &file).unwrap();
        assert_eq!(URL, url);
    }

    #[rstest]
    #[case::missing(None)]
    #[case::blank(Some("   ".to_string()))]
    fn url_falls_back_to_file(#[case] explicit: Option<String>, temp_dir: TempDir) {
        let file = temp_dir.path().join("replitdb");
        fs::write(&file, format!("{}\n", URL)).unwrap();

        let url = ExportConfig::resolve_db_url_from(explicit, &file).unwrap();
        assert_eq!(URL, url);
    }

    #[rstest]
    fn missing_url_everywhere_produces_error(temp_dir: TempDir) {
        let file = temp_dir.path().join("missing");

        let err = ExportConfig::resolve_db_url_from(None, &file).unwrap_err();
        assert_eq!(CustomKind::InvalidArgument, *err.get_custom_kind().unwrap());
        assert!(err.to_string().contains(DB_URL_ENV));
    }
}
