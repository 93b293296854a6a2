// ABOUTME: NRM adapter exposed to the connection lifecycle controller.
// ABOUTME: Capability trait, port mapping, per-connection registry and the OESS implementation.

mod capability;
mod error;
mod oess;
mod port_map;
mod registry;

pub use capability::{ConnectionManager, ETHERNET_VLAN_URN, LabelType};
pub use error::AdapterError;
pub use oess::{CONNECTION_ID_PREFIX, MINIMUM_DURATION, OessConnectionManager};
pub use port_map::{PortMap, PortMapError};
pub use registry::{ConnectionRegistry, ConnectionState, TransitionError};
