// ABOUTME: Interface and VLAN validation for compound endpoints.
// ABOUTME: Confirms the interface exists on the switch and the tag is free on it.

use super::error::ProvisionError;
use crate::nrm::{Session, Transport};
use crate::types::{Endpoint, VlanTag};
use tracing::{debug, warn};

/// An endpoint the NRM has confirmed: interface present, VLAN free.
///
/// Only obtainable through validation, so the provisioner cannot be handed
/// an endpoint that skipped the checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEndpoint(Endpoint);

impl ValidatedEndpoint {
    pub fn endpoint(&self) -> &Endpoint {
        &self.0
    }

    pub fn switch(&self) -> &str {
        self.0.switch()
    }

    pub fn interface(&self) -> &str {
        self.0.interface()
    }

    pub fn vlan(&self) -> VlanTag {
        self.0.vlan()
    }

    pub fn into_inner(self) -> Endpoint {
        self.0
    }
}

/// Check one endpoint against the NRM.
///
/// The VLAN availability query is authoritative: if it reports the
/// interface as unknown, that wins even when the interface list had it.
pub async fn validate_endpoint<T: Transport>(
    session: &Session<T>,
    endpoint: &Endpoint,
) -> Result<ValidatedEndpoint, ProvisionError> {
    let client = session.client();
    let unknown = || ProvisionError::UnknownInterface {
        switch: endpoint.switch().to_string(),
        interface: endpoint.interface().to_string(),
    };

    let interfaces = client.get_node_interfaces(endpoint.switch()).await?;
    if !interfaces.iter().any(|i| i.name == endpoint.interface()) {
        return Err(unknown());
    }

    let available = client
        .is_vlan_tag_available(endpoint.switch(), endpoint.interface(), endpoint.vlan())
        .await?;
    match available {
        Some(true) => {
            debug!(%endpoint, "endpoint validated");
            Ok(ValidatedEndpoint(endpoint.clone()))
        }
        Some(false) => Err(ProvisionError::VlanUnavailable {
            switch: endpoint.switch().to_string(),
            interface: endpoint.interface().to_string(),
            vlan: endpoint.vlan(),
        }),
        None => Err(unknown()),
    }
}

/// Parse a `switch:interface#vlan` target and validate it.
pub async fn validate_target<T: Transport>(
    session: &Session<T>,
    target: &str,
) -> Result<ValidatedEndpoint, ProvisionError> {
    let endpoint = Endpoint::parse(target)?;
    validate_endpoint(session, &endpoint).await
}

/// Validate both ends concurrently and report each outcome.
pub async fn validate_each<T: Transport>(
    session: &Session<T>,
    source: &str,
    dest: &str,
) -> (
    Result<ValidatedEndpoint, ProvisionError>,
    Result<ValidatedEndpoint, ProvisionError>,
) {
    futures::join!(
        validate_target(session, source),
        validate_target(session, dest)
    )
}

/// Validate both ends; the source's error is reported first when both fail.
pub async fn validate_pair<T: Transport>(
    session: &Session<T>,
    source: &str,
    dest: &str,
) -> Result<(ValidatedEndpoint, ValidatedEndpoint), ProvisionError> {
    match validate_each(session, source, dest).await {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
        (Err(source_err), Err(dest_err)) => {
            warn!(%dest, error = %dest_err, "destination endpoint also failed validation");
            Err(source_err)
        }
    }
}
