// ABOUTME: Phantom-typed identifiers for NRM and NSI objects.
// ABOUTME: Keeps connection, circuit, link and workgroup ids from being mixed up.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker types for phantom type parameters.
pub enum ConnectionMarker {}
pub enum CircuitMarker {}
pub enum LinkMarker {}
pub enum WorkgroupMarker {}

/// An opaque identifier tagged with the kind of object it names.
///
/// The NRM hands these out as plain strings; the tag only exists at compile
/// time so a `CircuitId` can never be passed where a `ConnectionId` is
/// expected.
///
/// ```compile_fail
/// use oess_cm::types::{CircuitId, ConnectionId};
///
/// fn takes_connection(_id: ConnectionId) {}
///
/// takes_connection(CircuitId::new("C-42"));
/// ```
#[must_use = "IDs reference remote objects and should not be ignored"]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_inner(self) -> String {
        self.value
    }
}

// T is only a marker, so none of these impls may require bounds on it.

impl<T> std::fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Id").field(&self.value).finish()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> std::fmt::Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

// OESS is inconsistent about quoting ids, so numbers are accepted too.
impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Ok(Self::new(s)),
            Raw::Number(n) => Ok(Self::new(n.to_string())),
        }
    }
}

pub type ConnectionId = Id<ConnectionMarker>;
pub type CircuitId = Id<CircuitMarker>;
pub type LinkId = Id<LinkMarker>;
pub type WorkgroupId = Id<WorkgroupMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_deserialize_as_text() {
        let id: WorkgroupId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_str(), "42");

        let id: CircuitId = serde_json::from_str("\"C-42\"").unwrap();
        assert_eq!(id.as_str(), "C-42");
    }

    #[test]
    fn display_is_the_raw_value() {
        let id = LinkId::new("link-7");
        assert_eq!(id.to_string(), "link-7");
    }
}
