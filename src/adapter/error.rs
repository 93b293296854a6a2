// ABOUTME: Adapter error types with SNAFU pattern.
// ABOUTME: Unifies session, port mapping, provisioning and connection-state failures.

use snafu::Snafu;

use super::port_map::PortMapError;
use super::registry::ConnectionState;
use crate::nrm::{NrmError, SessionError};
use crate::provision::{ErrorKind, ProvisionError};
use crate::types::ConnectionId;

/// Error returned by every capability call.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum AdapterError {
    #[snafu(display("NRM session could not be established: {source}"))]
    Session { source: SessionError },

    #[snafu(display("port mapping error: {source}"))]
    PortMap { source: PortMapError },

    #[snafu(display("{source}"))]
    Provision { source: ProvisionError },

    #[snafu(display("no provisioned circuit recorded for connection {id} (state {state})"))]
    UnknownConnection {
        id: ConnectionId,
        state: ConnectionState,
    },

    #[snafu(display("cannot {operation} connection {id} while {state}"))]
    InvalidState {
        id: ConnectionId,
        state: ConnectionState,
        operation: &'static str,
    },
}

impl AdapterError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdapterError::Session { source } => match source {
                SessionError::Authentication { .. } => ErrorKind::Authentication,
                SessionError::UnknownWorkgroup(_) | SessionError::Configuration(_) => {
                    ErrorKind::Configuration
                }
                SessionError::Nrm(e) => nrm_kind(e),
            },
            AdapterError::PortMap { .. } => ErrorKind::Configuration,
            AdapterError::Provision { source } => source.kind(),
            AdapterError::UnknownConnection { .. } => ErrorKind::UnknownConnection,
            AdapterError::InvalidState { .. } => ErrorKind::InvalidState,
        }
    }

    /// Whether the lifecycle controller may retry the call later.
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Returns the underlying provisioning error, if that is what failed.
    pub fn provision_error(&self) -> Option<&ProvisionError> {
        match self {
            AdapterError::Provision { source } => Some(source),
            _ => None,
        }
    }
}

fn nrm_kind(err: &NrmError) -> ErrorKind {
    match err {
        NrmError::Timeout { .. } => ErrorKind::Timeout,
        NrmError::Unauthorized(_) => ErrorKind::Authentication,
        NrmError::InvalidUrl { .. } => ErrorKind::Configuration,
        _ => ErrorKind::Remote,
    }
}

impl From<SessionError> for AdapterError {
    fn from(source: SessionError) -> Self {
        AdapterError::Session { source }
    }
}

impl From<PortMapError> for AdapterError {
    fn from(source: PortMapError) -> Self {
        AdapterError::PortMap { source }
    }
}

impl From<ProvisionError> for AdapterError {
    fn from(source: ProvisionError) -> Self {
        AdapterError::Provision { source }
    }
}
