// ABOUTME: JSON response shapes returned by the OESS CGI scripts.
// ABOUTME: Every response is an envelope with a `results` payload and optional `error`.

use crate::types::{CircuitId, LinkId, WorkgroupId};
use serde::{Deserialize, Deserializer};

/// `{"results": ..., "error": "..."}` wrapper around every payload.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub results: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Remote error text, if OESS reported one.
    pub fn error_text(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkgroupEntry {
    pub name: String,
    pub workgroup_id: WorkgroupId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterfaceEntry {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VlanAvailability {
    #[serde(default, deserialize_with = "flag")]
    pub available: bool,
}

/// `is_vlan_tag_available` answers with a single object on newer OESS
/// releases and with a one-element list on older ones.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    // Tried first: a struct with defaulted fields would also accept `[]`.
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_first(self) -> Option<T> {
        match self {
            OneOrMany::One(v) => Some(v),
            OneOrMany::Many(v) => v.into_iter().next(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathLink {
    pub link: LinkId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionResult {
    #[serde(default, deserialize_with = "flag")]
    pub success: bool,
    #[serde(default)]
    pub circuit_id: Option<CircuitId>,
}

/// Accepts `true`/`false`, `0`/`1` and `"0"`/`"1"`.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => b,
        Raw::Int(n) => n != 0,
        Raw::Text(s) => !matches!(s.trim(), "" | "0" | "false"),
    })
}
