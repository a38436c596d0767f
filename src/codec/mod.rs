//! Serialization backend used as the deep-copy primitive
//!
//! The engine never clones nested objects, containers or wrapper values by
//! hand: it serializes them to text and deserializes that text into the
//! destination's declared type. Any [`SerializationBackend`] can be plugged
//! into a [`Copier`](crate::Copier); [`JsonBackend`] is the default.

mod bytes;

pub use self::bytes::{base64, Bytes};

use crate::types::{CopyError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Turns values into portable text and back
pub trait SerializationBackend: Send + Sync {
    /// Short name used in diagnostics
    fn name(&self) -> &'static str;

    /// Serialize `value` to text
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<String>;

    /// Deserialize `text` into a `T`
    fn deserialize<T: DeserializeOwned>(&self, text: &str) -> Result<T>;

    /// Serialize then deserialize, producing a structurally independent copy
    fn round_trip<T: Serialize + DeserializeOwned>(&self, value: &T) -> Result<T> {
        let text = self.serialize(value)?;
        self.deserialize(&text)
    }
}

/// JSON backend over `serde_json`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonBackend {
    pretty: bool,
}

impl JsonBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that pretty-prints its output
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl SerializationBackend for JsonBackend {
    fn name(&self) -> &'static str {
        "json"
    }

    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let result = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        result.map_err(|e| {
            CopyError::serialization(
                format!("failed to serialize {}", std::any::type_name::<T>()),
                e,
            )
        })
    }

    fn deserialize<T: DeserializeOwned>(&self, text: &str) -> Result<T> {
        serde_json::from_str(text).map_err(|e| {
            CopyError::serialization(
                format!("failed to deserialize {}", std::any::type_name::<T>()),
                e,
            )
        })
    }
}

/// Deep copy through a serialization backend
///
/// Implemented for every serde round-trippable type, so any copyable record
/// can be cloned with no shared state with the original.
///
/// # Example
/// ```
/// use objkopy::codec::{DeepCloneable, JsonBackend};
///
/// let names = vec!["a".to_string(), "b".to_string()];
/// let copy = names.deep_clone_with(&JsonBackend::new())?;
/// assert_eq!(names, copy);
/// # Ok::<(), objkopy::CopyError>(())
/// ```
pub trait DeepCloneable: Serialize + DeserializeOwned {
    fn deep_clone_with<B: SerializationBackend>(&self, backend: &B) -> Result<Self> {
        backend.round_trip(self)
    }
}

impl<T: Serialize + DeserializeOwned> DeepCloneable for T {}
