//! Preservation of wire fields the typed schema does not recognize.
//!
//! Every transaction owns one [`UnknownFieldBag`]. Decoding routes each
//! unrecognized top-level field here; encoding appends the entries back in
//! insertion order, so a payload round-trips losslessly even when the server
//! speaks a newer protocol revision than this model.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldBagError {
    #[error("field {key:?} is recognized by the typed schema and cannot be stored as unknown")]
    RecognizedKey { key: String },

    #[error("unknown field {key:?} inserted twice")]
    DuplicateKey { key: String },
}

/// An append-only ordered mapping from wire field name to raw wire value.
/// Keys are case-sensitive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnknownFieldBag {
    entries: Vec<(String, Value)>,
}

impl UnknownFieldBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. `recognized` is the enclosing type's schema: a key
    /// colliding with it, or with an entry already in the bag, is rejected.
    pub fn insert(
        &mut self,
        key: &str,
        value: Value,
        recognized: &[&str],
    ) -> Result<(), FieldBagError> {
        if recognized.contains(&key) {
            return Err(FieldBagError::RecognizedKey {
                key: key.to_string(),
            });
        }
        if self.get(key).is_some() {
            return Err(FieldBagError::DuplicateKey {
                key: key.to_string(),
            });
        }
        self.entries.push((key.to_string(), value));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
