//! Helper functions to deal with JSON values.
//!
//! The module provides a set of free functions to deal with JSON values which are not a part of
//! `serde_json` dependency but yet useful in terms of this library.

use crate::error::{CustomKind, Error, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value as JValue;
use std::io::Write;

/// Indentation used for human-readable documents.
pub const INDENT: &[u8] = b"    ";

/// Decode a raw value read from the store.
///
/// Values are stored as JSON text, so anything which does not parse as JSON cannot be
/// represented in the output document and is rejected. `key` is only used to build a meaningful
/// error message.
///
/// # Errors
/// Returns a custom [`CustomKind::Serialization`] error if `raw` is not a valid JSON text.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use db::jutil::decode_value;
///
/// let value = decode_value("scores", "[1, 2, 3]").unwrap();
/// assert_eq!(json!([1, 2, 3]), value);
/// assert!(decode_value("scores", "not json").is_err());
/// ```
pub fn decode_value(key: &str, raw: &str) -> Result<JValue> {
    serde_json::from_str(raw).map_err(|err| {
        Error::custom_err(
            CustomKind::Serialization,
            &format!("Value of key '{}' is not valid JSON: {}", key, err),
        )
    })
}

/// Serialize an object into a writer using [`INDENT`] as indentation.
///
/// # Errors
/// The function may return a serde error if the object cannot be serialized or the writer fails.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use db::jutil::to_writer_indented;
///
/// let mut out = Vec::new();
/// to_writer_indented(&mut out, &json!({"a": 1})).unwrap();
/// assert_eq!("{\n    \"a\": 1\n}", String::from_utf8(out).unwrap());
/// ```
pub fn to_writer_indented<W, S>(writer: W, object: &S) -> Result<()>
where
    W: Write,
    S: Serialize + ?Sized,
{
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    object.serialize(&mut serializer)?;
    Ok(())
}
