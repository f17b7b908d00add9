//! # Carton Archive
//!
//! Generic serialization and deserialization core for exposing native
//! values as a portable text encoding.
//!
//! Any type that describes its own fields to a generic visitor (via
//! `serde::Serialize` / `serde::Deserialize`) can be encoded to a
//! single-rooted JSON document and reconstructed losslessly from it:
//!
//! ```
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Demo {
//!     x: i64,
//! }
//!
//! let encoded = carton_archive::serialize(&Demo { x: 1337 }).unwrap();
//! assert_eq!(encoded, r#"{"carton":{"x":1337}}"#);
//!
//! let restored: Demo = carton_archive::deserialize(&encoded).unwrap();
//! assert_eq!(restored, Demo { x: 1337 });
//! ```
//!
//! ## Design Notes
//!
//! - Every call owns a fresh writer or reader bound to a fresh in-memory
//!   buffer; nothing is shared or reused across calls, so independent
//!   calls from independent threads are safe by construction.
//! - The writer is scope-acquired and destroyed before the buffer is read
//!   out, on every exit path, so the encoded form is never truncated.
//! - The payload sits under one fixed top-level key ([`ROOT_KEY`]) so the
//!   decode side knows unambiguously where it begins. Field order inside
//!   the payload is the value's own declaration order; the core imposes
//!   nothing beyond the outer key.
//! - Decode fails as a whole on any shape mismatch. It never hands back a
//!   partially populated value.

pub mod error;

pub use error::{ArchiveError, ArchiveResult};

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, DeserializeOwned, IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Fixed top-level key wrapping every encoded value.
pub const ROOT_KEY: &str = "carton";

/// Field list handed to the reader for unknown-key errors.
const ROOT_FIELDS: &[&str] = &[ROOT_KEY];

// ============================================================================
// Encode
// ============================================================================

/// Encode `value` as a single-rooted text archive.
///
/// Opens a fresh in-memory buffer, drives the structured writer over the
/// value's field visitor under [`ROOT_KEY`], and returns the buffer's full
/// contents once the writer has been dropped. The inner scope guarantees
/// the writer flushes before the buffer is read, on every exit path.
///
/// The input is never mutated. On failure the partially written buffer is
/// discarded and the visitor's error propagates unchanged.
pub fn serialize<T: Serialize>(value: &T) -> ArchiveResult<String> {
    let mut buffer = Vec::new();
    {
        let mut writer = serde_json::Serializer::new(&mut buffer);
        let mut root =
            Serializer::serialize_map(&mut writer, Some(1)).map_err(ArchiveError::Emit)?;
        root.serialize_entry(ROOT_KEY, value)
            .map_err(ArchiveError::Emit)?;
        root.end().map_err(ArchiveError::Emit)?;
    }
    Ok(String::from_utf8(buffer)?)
}

// ============================================================================
// Decode
// ============================================================================

/// Reconstruct a `T` from a text archive produced by [`serialize`].
///
/// The caller fixes the target type; the encoding carries field structure,
/// not a type tag. The reader expects exactly one top-level entry under
/// [`ROOT_KEY`]; a mismatched root key, a missing required field, a wrong
/// field shape, or trailing content after the document all fail with a
/// malformed-input error rather than yielding a partially populated value.
pub fn deserialize<T: DeserializeOwned>(encoded: &str) -> ArchiveResult<T> {
    let mut reader = serde_json::Deserializer::from_str(encoded);
    let document = Document::<T>::deserialize(&mut reader).map_err(ArchiveError::Malformed)?;
    reader
        .end()
        .map_err(|_| ArchiveError::TrailingContent)?;
    Ok(document.0)
}

// ============================================================================
// Root envelope
// ============================================================================

/// The single-entry map `{ ROOT_KEY: T }` that every archive decodes
/// through. Exists only inside a [`deserialize`] call.
struct Document<T>(T);

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Document<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct DocumentVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for DocumentVisitor<T> {
            type Value = Document<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a map with a single \"{ROOT_KEY}\" entry")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let key: String = match map.next_key()? {
                    Some(key) => key,
                    None => return Err(de::Error::missing_field(ROOT_KEY)),
                };
                if key != ROOT_KEY {
                    return Err(de::Error::unknown_field(&key, ROOT_FIELDS));
                }
                let value = map.next_value()?;
                if map.next_key::<IgnoredAny>()?.is_some() {
                    return Err(de::Error::custom("multiple top-level archive entries"));
                }
                Ok(Document(value))
            }
        }

        deserializer.deserialize_map(DocumentVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Pair {
        a: i64,
        b: i64,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Holder {
        name: String,
        inner: Box<Pair>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Empty {}

    #[test]
    fn test_roundtrip_two_int_fields() {
        let value = Pair { a: 3, b: 5 };
        let encoded = serialize(&value).unwrap();
        assert_eq!(encoded, r#"{"carton":{"a":3,"b":5}}"#);

        let restored: Pair = deserialize(&encoded).unwrap();
        assert_eq!(restored, value);
    }

    #[test]
    fn test_repeated_encode_is_byte_identical() {
        let value = Pair { a: -7, b: 42 };
        let first = serialize(&value).unwrap();
        let second = serialize(&value).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_encode_does_not_mutate_input() {
        let value = Pair { a: 1, b: 2 };
        let before = value.clone();
        serialize(&value).unwrap();
        assert_eq!(value, before);
    }

    #[test]
    fn test_roundtrip_owned_nested_value() {
        let value = Holder {
            name: "outer".to_string(),
            inner: Box::new(Pair { a: 10, b: 20 }),
        };
        let encoded = serialize(&value).unwrap();
        let restored: Holder = deserialize(&encoded).unwrap();
        assert_eq!(restored, value);
        assert_eq!(*restored.inner, Pair { a: 10, b: 20 });
    }

    #[test]
    fn test_roundtrip_empty_struct() {
        let encoded = serialize(&Empty {}).unwrap();
        assert_eq!(encoded, r#"{"carton":{}}"#);
        let restored: Empty = deserialize(&encoded).unwrap();
        assert_eq!(restored, Empty {});
    }

    #[test]
    fn test_mismatched_root_key_fails() {
        let err = deserialize::<Pair>(r#"{"tin":{"a":1,"b":2}}"#).unwrap_err();
        assert!(matches!(err, ArchiveError::Malformed(_)));
    }

    #[test]
    fn test_missing_field_fails() {
        let err = deserialize::<Pair>(r#"{"carton":{"a":1}}"#).unwrap_err();
        assert!(matches!(err, ArchiveError::Malformed(_)));
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn test_wrong_field_shape_fails() {
        let err = deserialize::<Pair>(r#"{"carton":{"a":"one","b":2}}"#).unwrap_err();
        assert!(matches!(err, ArchiveError::Malformed(_)));
    }

    #[test]
    fn test_extra_top_level_entry_fails() {
        let err = deserialize::<Pair>(r#"{"carton":{"a":1,"b":2},"extra":0}"#).unwrap_err();
        assert!(matches!(err, ArchiveError::Malformed(_)));
    }

    #[test]
    fn test_non_map_document_fails() {
        let err = deserialize::<Pair>("3").unwrap_err();
        assert!(matches!(err, ArchiveError::Malformed(_)));
    }

    #[test]
    fn test_trailing_content_fails() {
        let err = deserialize::<Pair>(r#"{"carton":{"a":1,"b":2}} trailing"#).unwrap_err();
        assert!(matches!(err, ArchiveError::TrailingContent));
    }

    #[test]
    fn test_empty_input_fails() {
        let err = deserialize::<Pair>("").unwrap_err();
        assert!(matches!(err, ArchiveError::Malformed(_)));
    }

    #[test]
    fn test_concurrent_encodes_are_independent() {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                std::thread::spawn(move || {
                    let value = Pair { a: i, b: i * 2 };
                    let encoded = serialize(&value).unwrap();
                    let restored: Pair = deserialize(&encoded).unwrap();
                    assert_eq!(restored, value);
                    encoded
                })
            })
            .collect();

        let mut encodings: Vec<String> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();
        encodings.sort();
        encodings.dedup();
        assert_eq!(encodings.len(), 8);
    }
}
