// ABOUTME: Type-safe identifiers and validated endpoint types.
// ABOUTME: Uses phantom types to keep NRM and NSI ids apart at compile time.

mod endpoint;
mod id;
mod vlan;

pub use endpoint::{Endpoint, EndpointError};
pub use id::{CircuitId, ConnectionId, Id, LinkId, WorkgroupId};
pub use vlan::{MAX_VLAN, MIN_VLAN, VlanTag, VlanTagError};
