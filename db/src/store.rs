//! Remote key-value store access.
//!
//! The exporter only needs two operations from a store: list every key and read a value by key.
//! They are captured by the [`KeyValueStore`] trait. [`ReplitStore`] implements it on top of the
//! Replit Database HTTP interface:
//! - `GET {url}?encode=true&prefix={prefix}` returns newline separated, percent-encoded keys
//! - `GET {url}/{key}` returns the raw value stored under a percent-encoded key
//!
//! Calls are blocking. A run is a straight sequence of requests so there is nothing to gain from
//! an async runtime.

#[cfg(test)]
use mockall::automock;

use crate::error::{CustomKind, Error, Result};
use crate::jutil;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde_json::Value as JValue;
use tracing::debug;

/// Read-only access to a key-value store.
#[cfg_attr(test, automock)]
pub trait KeyValueStore {
    /// Enumerate all keys of the store.
    ///
    /// # Errors
    /// Fails when the store cannot be reached or returns undecodable keys.
    fn keys(&self) -> Result<Vec<String>>;

    /// Fetch the value stored under `key`.
    ///
    /// # Errors
    /// Fails when the store cannot be reached, the key no longer exists or the stored value is
    /// not valid JSON.
    fn get(&self, key: &str) -> Result<JValue>;
}

/// A structure representing a connection to a Replit Database.
#[derive(Debug)]
pub struct ReplitStore {
    client: Client,
    db_url: String,
    prefix: String,
}

impl ReplitStore {
    /// Create a store client for the database at `db_url`.
    ///
    /// No request is sent until keys or values are asked for. Requests never time out, a slow
    /// store blocks the caller until it answers or the connection fails.
    ///
    /// # Errors
    /// Returns an HTTP error if the underlying client cannot be initialized.
    pub fn new(db_url: &str) -> Result<Self> {
        // Blocking client defaults to a 30 second timeout
        let client = Client::builder().timeout(None).build()?;
        Ok(Self {
            client,
            db_url: db_url.trim_end_matches('/').to_string(),
            prefix: String::new(),
        })
    }

    /// Restrict enumeration to keys starting with `prefix`.
    #[must_use]
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    fn keys_url(&self) -> String {
        format!(
            "{}?encode=true&prefix={}",
            self.db_url,
            urlencoding::encode(&self.prefix)
        )
    }

    fn key_url(&self, key: &str) -> String {
        format!("{}/{}", self.db_url, urlencoding::encode(key))
    }

    // Send a GET request and make sure the store answered with success
    fn fetch(&self, url: &str, what: &str) -> Result<Response> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::custom_err(
                CustomKind::Connectivity,
                &format!("Store has no {}", what),
            ));
        }
        if !status.is_success() {
            return Err(Error::custom_err(
                CustomKind::Connectivity,
                &format!("Store responded with {} while reading {}", status, what),
            ));
        }
        Ok(response)
    }

    // Split a key listing into separate, decoded keys
    fn parse_keys(body: &str) -> Result<Vec<String>> {
        body.split('\n')
            .filter(|line| !line.is_empty())
            .map(|line| {
                urlencoding::decode(line)
                    .map(|key| key.into_owned())
                    .map_err(|err| {
                        Error::custom_err(
                            CustomKind::Serialization,
                            &format!("Key '{}' is not valid UTF-8 once decoded: {}", line, err),
                        )
                    })
            })
            .collect()
    }
}

impl KeyValueStore for ReplitStore {
    fn keys(&self) -> Result<Vec<String>> {
        let body = self.fetch(&self.keys_url(), "key listing")?.text()?;
        let keys = Self::parse_keys(&body)?;
        debug!(count = keys.len(), prefix = %self.prefix, "keys enumerated");
        Ok(keys)
    }

    fn get(&self, key: &str) -> Result<JValue> {
        let raw = self
            .fetch(&self.key_url(key), &format!("key '{}'", key))?
            .text()?;
        jutil::decode_value(key, &raw)
    }
}
