// ABOUTME: Error taxonomy for validation, path computation, provisioning and teardown.
// ABOUTME: ErrorKind classifies failures so the lifecycle controller can decide on retries.

use super::path::PathRole;
use crate::nrm::NrmError;
use crate::types::{CircuitId, EndpointError, VlanTag};
use std::time::Duration;

/// Errors from the provisioning engine.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// The compound endpoint string could not be parsed.
    #[error("malformed endpoint: {0}")]
    MalformedEndpoint(#[from] EndpointError),

    /// The interface is not known on the switch.
    #[error("interface {interface} does not exist on switch {switch}")]
    UnknownInterface { switch: String, interface: String },

    /// The VLAN tag is already in use on the interface.
    #[error("VLAN {vlan} is not available on {switch}:{interface}")]
    VlanUnavailable {
        switch: String,
        interface: String,
        vlan: VlanTag,
    },

    /// OESS found no path (for the backup: none avoiding the primary links).
    #[error("no {role} path between {from} and {to}")]
    NoPath {
        from: String,
        to: String,
        role: PathRole,
    },

    /// OESS refused to provision the circuit. The message is the NRM's own.
    #[error("provisioning failed: {0}")]
    Provisioning(String),

    /// OESS refused or garbled the removal of a circuit.
    #[error("teardown of circuit {circuit} failed: {message}")]
    Teardown { circuit: CircuitId, message: String },

    /// A remote call exceeded its time budget.
    #[error("{action} timed out after {timeout:?}")]
    Timeout {
        action: &'static str,
        timeout: Duration,
    },

    /// The NRM stopped accepting our credentials mid-session.
    #[error("NRM rejected the credentials (HTTP {status})")]
    Unauthorized { status: u16 },

    /// Transport, HTTP or decoding failure talking to the NRM.
    #[error("NRM request failed: {0}")]
    Remote(NrmError),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credentials rejected at startup.
    Authentication,
    /// Workgroup, port map or URL misconfigured.
    Configuration,
    /// Compound endpoint string is not `switch:interface#vlan`.
    MalformedEndpoint,
    /// Interface missing on the switch.
    UnknownInterface,
    /// VLAN tag in use.
    VlanUnavailable,
    /// No primary or no disjoint backup path.
    NoPath,
    /// NRM refused to provision.
    Provisioning,
    /// NRM refused to tear down.
    Teardown,
    /// Remote call exceeded its timeout.
    Timeout,
    /// Transport, HTTP or decode failure.
    Remote,
    /// No circuit recorded for the connection.
    UnknownConnection,
    /// Capability call out of order for the connection's state.
    InvalidState,
}

impl ErrorKind {
    /// Whether the lifecycle controller may reasonably try again later.
    /// The adapter itself never retries.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::Timeout | ErrorKind::NoPath | ErrorKind::Remote)
    }
}

impl ProvisionError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProvisionError::MalformedEndpoint(_) => ErrorKind::MalformedEndpoint,
            ProvisionError::UnknownInterface { .. } => ErrorKind::UnknownInterface,
            ProvisionError::VlanUnavailable { .. } => ErrorKind::VlanUnavailable,
            ProvisionError::NoPath { .. } => ErrorKind::NoPath,
            ProvisionError::Provisioning(_) => ErrorKind::Provisioning,
            ProvisionError::Teardown { .. } => ErrorKind::Teardown,
            ProvisionError::Timeout { .. } => ErrorKind::Timeout,
            ProvisionError::Unauthorized { .. } => ErrorKind::Authentication,
            ProvisionError::Remote(_) => ErrorKind::Remote,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Map an NRM failure from the provisioning call. Remote diagnostics
    /// become `Provisioning` with the text untouched.
    pub(crate) fn from_provisioning(err: NrmError) -> Self {
        match err {
            NrmError::Remote { message, .. } => ProvisionError::Provisioning(message),
            NrmError::Status { body, .. } => ProvisionError::Provisioning(body),
            other => other.into(),
        }
    }

    /// Map an NRM failure from the removal call. Anything the NRM said,
    /// including an empty or unreadable reply, is a teardown failure.
    pub(crate) fn from_teardown(circuit: &CircuitId, err: NrmError) -> Self {
        let message = match err {
            NrmError::Remote { message, .. } => message,
            NrmError::Status { body, .. } => body,
            NrmError::Decode { reason, .. } => reason,
            other => return other.into(),
        };
        ProvisionError::Teardown {
            circuit: circuit.clone(),
            message,
        }
    }
}

impl From<NrmError> for ProvisionError {
    fn from(err: NrmError) -> Self {
        match err {
            NrmError::Timeout { action, timeout } => ProvisionError::Timeout { action, timeout },
            NrmError::Unauthorized(status) => ProvisionError::Unauthorized { status },
            other => ProvisionError::Remote(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_credentials_are_not_retryable() {
        let err = ProvisionError::from_provisioning(NrmError::Unauthorized(401));
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(!err.is_retryable());

        let err = ProvisionError::from_teardown(&CircuitId::new("C-1"), NrmError::Unauthorized(403));
        assert!(matches!(err, ProvisionError::Unauthorized { status: 403 }));
    }

    #[test]
    fn timeouts_stay_timeouts() {
        let err: ProvisionError = NrmError::Timeout {
            action: "provision_circuit",
            timeout: Duration::from_secs(1),
        }
        .into();
        assert!(err.is_retryable());
    }
}
