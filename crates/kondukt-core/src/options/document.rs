//! Decoding of untyped options documents into typed options structs.
//!
//! Options can arrive as JSON/TOML documents (pipeline configs, CLI
//! files). Decoding enforces the rules the typed structs cannot express on
//! their own: connection-level keys are rejected, unknown keys produce a
//! warning, and the deprecated `mode` key is remapped to `if_exists` with
//! a deprecation warning.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Keys that belong to connections and are never valid inside options.
const CONNECTION_KEYS: [&str; 7] = ["host", "port", "user", "password", "database", "url", "driver"];

/// Decodes a JSON options document into a typed options struct.
///
/// * The deprecated `mode` key is accepted as a spelling of `if_exists`
///   and warns; passing both is an error.
/// * Connection parameters (`host`, `user`, `password`, ...) are rejected.
/// * Keys outside `known_keys` are passed through with a warning, so new
///   engine-side options keep working with older Kondukt releases.
///
/// # Examples
///
/// ```
/// use kondukt_core::options::{FileIfExists, decode_document};
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Debug, Default, Deserialize)]
/// #[serde(default)]
/// struct WriteOptions {
///     if_exists: FileIfExists,
/// }
///
/// let options: WriteOptions = decode_document(
///     json!({"mode": "replace_file"}),
///     &["if_exists"],
///     "WriteOptions",
/// )
/// .unwrap();
/// assert_eq!(options.if_exists, FileIfExists::ReplaceFile);
/// ```
pub fn decode_document<T>(document: Value, known_keys: &[&str], options_name: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let Value::Object(mut map) = document else {
        return Err(Error::validation(format!(
            "{options_name} document must be an object, got {document}"
        )));
    };

    if map.contains_key("mode") {
        if map.contains_key("if_exists") {
            return Err(Error::validation_field(
                "mode",
                format!("Options 'mode' and 'if_exists' cannot be used in a {options_name} together"),
            ));
        }

        tracing::warn!(
            "option 'mode' is deprecated and will be removed in 1.0.0, use 'if_exists' instead"
        );
        if let Some(value) = map.remove("mode") {
            map.insert("if_exists".to_string(), value);
        }
    }

    for key in map.keys() {
        if CONNECTION_KEYS.contains(&key.as_str()) {
            return Err(Error::validation_field(
                key.clone(),
                format!("Option '{key}' is not allowed to use in a {options_name}"),
            ));
        }
    }

    let unknown: Vec<&str> = map
        .keys()
        .map(String::as_str)
        .filter(|key| !known_keys.contains(key))
        .collect();

    match unknown.as_slice() {
        [] => {}
        [key] => {
            tracing::warn!("Option '{key}' is not known by {options_name}, are you sure it is valid?");
        }
        keys => {
            let joined = keys
                .iter()
                .map(|key| format!("'{key}'"))
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!("Options {joined} are not known by {options_name}, are you sure they are valid?");
        }
    }

    serde_json::from_value(Value::Object(map)).map_err(Into::into)
}

/// Decodes a TOML options document into a typed options struct.
///
/// Applies the same key handling as [`decode_document`].
pub fn decode_toml_document<T>(document: &str, known_keys: &[&str], options_name: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let value: toml::Value = toml::from_str(document)
        .map_err(|e| Error::config(format!("invalid {options_name} document: {e}")))?;
    let json = serde_json::to_value(value)?;
    decode_document(json, known_keys, options_name)
}
