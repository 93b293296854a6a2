// ABOUTME: Dual-path provisioning engine on top of the NRM session.
// ABOUTME: Validation, path planning, circuit provisioning and teardown.

mod circuit;
mod error;
mod path;
mod validate;

pub use circuit::{ProvisionedCircuit, circuit_description, provision, teardown};
pub use error::{ErrorKind, ProvisionError};
pub use path::{BackupPolicy, PathPlan, PathRole, find_path, plan_paths};
pub use validate::{
    ValidatedEndpoint, validate_each, validate_endpoint, validate_pair, validate_target,
};
