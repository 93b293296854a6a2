// ABOUTME: Capability contract between the connection lifecycle controller and an NRM adapter.
// ABOUTME: Naming, id allocation, label swapping, and async link setup/teardown.

use super::error::AdapterError;
use crate::types::ConnectionId;
use async_trait::async_trait;
use std::fmt;

/// NSI label type URN for Ethernet VLANs.
pub const ETHERNET_VLAN_URN: &str = "http://schemas.ogf.org/nml/2012/10/ethernet#vlan";

/// Kind of label carried on a port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LabelType {
    EthernetVlan,
    Other(String),
}

impl LabelType {
    pub fn from_urn(urn: &str) -> Self {
        if urn == ETHERNET_VLAN_URN {
            LabelType::EthernetVlan
        } else {
            LabelType::Other(urn.to_string())
        }
    }
}

impl fmt::Display for LabelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelType::EthernetVlan => f.write_str(ETHERNET_VLAN_URN),
            LabelType::Other(urn) => f.write_str(urn),
        }
    }
}

/// What the lifecycle controller calls on a backend.
///
/// Setup and teardown complete asynchronously; the controller runs one
/// state machine per connection and may have many calls in flight at once.
/// It must not start a teardown before the setup for the same connection
/// has completed.
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    /// Resource string used for conflict detection, `interface:label`.
    fn resource_name(
        &self,
        port: &str,
        label_type: &LabelType,
        label_value: u32,
    ) -> Result<String, AdapterError>;

    /// Target string later passed to setup/teardown, `interface#label`.
    fn target_name(
        &self,
        port: &str,
        label_type: &LabelType,
        label_value: u32,
    ) -> Result<String, AdapterError>;

    /// A connection id unique among the connections currently held.
    fn allocate_connection_id(&self, source_target: &str, dest_target: &str) -> ConnectionId;

    /// Forget an allocated id whose connection is being terminated before it
    /// was ever set up. Returns false if the id is unknown or has a circuit.
    fn release_connection_id(&self, connection_id: &ConnectionId) -> bool;

    /// Whether the backend can translate labels between ingress and egress.
    fn supports_label_swap(&self, label_type: &LabelType) -> bool;

    async fn setup_link(
        &self,
        connection_id: &ConnectionId,
        source_target: &str,
        dest_target: &str,
        bandwidth: u64,
    ) -> Result<(), AdapterError>;

    async fn teardown_link(
        &self,
        connection_id: &ConnectionId,
        source_target: &str,
        dest_target: &str,
        bandwidth: u64,
    ) -> Result<(), AdapterError>;
}
