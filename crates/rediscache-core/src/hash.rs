//! Deterministic cache-key hashing.
//!
//! Both functions produce the lowercase hex SHA-256 digest (64 characters)
//! and never touch the network.
//!
//! [`hash_object`] serializes its input to canonical JSON first: compact
//! output with object keys sorted at every level, so two values with the same
//! fields hash the same regardless of field order. If serialization fails the
//! digest of the empty input is returned instead of an error. Existing cache
//! keys depend on that behavior, so it stays.
//!
//! Digests are not interchangeable with keys produced by Go's
//! `json.Marshal`, which keeps struct fields in declaration order and escapes
//! `<`, `>` and `&` as `\u003c`, `\u003e` and `\u0026`. Here fields are sorted
//! and those characters are written as-is.

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Length in characters of every digest returned by this module.
pub const DIGEST_HEX_LEN: usize = 64;

/// Returns the SHA-256 digest of the UTF-8 bytes of `key`, hex-encoded.
///
/// # Examples
///
/// ```
/// use rediscache_core::hash::hash;
///
/// assert_eq!(
///     hash("test_key"),
///     "92488e1e3eeecdf99f3ed2ce59233efb4b4fb612d5655c0ce9ea52b5a502e655"
/// );
/// ```
pub fn hash(key: &str) -> String {
    hash_bytes(key.as_bytes())
}

/// Returns the SHA-256 digest of `bytes`, hex-encoded.
pub fn hash_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Serializes `obj` to canonical JSON and hashes the result.
///
/// # Examples
///
/// ```
/// use rediscache_core::hash::hash_object;
/// use serde_json::json;
///
/// let a = hash_object(&json!({"id": 123, "name": "test"}));
/// let b = hash_object(&json!({"name": "test", "id": 123}));
/// assert_eq!(a, b);
/// ```
pub fn hash_object<T: Serialize + ?Sized>(obj: &T) -> String {
    hash_bytes(&canonical_json(obj).unwrap_or_default())
}

/// Serializes `obj` to compact JSON with object keys sorted recursively.
pub fn canonical_json<T: Serialize + ?Sized>(obj: &T) -> Result<Vec<u8>, serde_json::Error> {
    let value = serde_json::to_value(obj)?;
    serde_json::to_vec(&sort_keys(value))
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));

            let mut sorted = Map::new();
            for (k, v) in entries {
                sorted.insert(k, sort_keys(v));
            }
            Value::Object(sorted)
        },
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    const EMPTY_DIGEST: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_hash_empty_input() {
        assert_eq!(hash(""), EMPTY_DIGEST);
        assert_eq!(hash_bytes(&[]), EMPTY_DIGEST);
    }

    #[test]
    fn test_hash_is_lowercase_hex() {
        let digest = hash("Some Key");

        assert_eq!(digest.len(), DIGEST_HEX_LEN);
        assert!(
            digest
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn test_canonical_json_sorts_nested_keys() {
        let value = json!({"b": {"z": 1, "a": [ {"y": 2, "x": 1} ]}, "a": null});
        let bytes = canonical_json(&value).unwrap();

        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"a":null,"b":{"a":[{"x":1,"y":2}],"z":1}}"#
        );
    }

    #[test]
    fn test_hash_object_hashmap_is_order_independent() {
        let mut first = HashMap::new();
        let mut second = HashMap::new();
        for i in 0..32 {
            first.insert(format!("k{}", i), i);
        }
        for i in (0..32).rev() {
            second.insert(format!("k{}", i), i);
        }

        assert_eq!(hash_object(&first), hash_object(&second));
    }

    #[test]
    fn test_hash_object_swallows_serialization_error() {
        // Tuple keys cannot become JSON object keys.
        let mut map = HashMap::new();
        map.insert((1, 2), "value");

        assert!(canonical_json(&map).is_err());
        assert_eq!(hash_object(&map), EMPTY_DIGEST);
    }

    #[test]
    fn test_hash_object_of_string_is_quoted() {
        // A JSON string includes its quotes, so it differs from hashing the raw text.
        assert_eq!(hash_object("abc"), hash("\"abc\""));
        assert_ne!(hash_object("abc"), hash("abc"));
    }

    #[test]
    fn test_canonical_json_keeps_html_characters() {
        let value = json!({"q": "<a>&"});

        assert_eq!(canonical_json(&value).unwrap(), br#"{"q":"<a>&"}"#.to_vec());
        assert_eq!(hash_object(&value), hash(r#"{"q":"<a>&"}"#));
    }
}
