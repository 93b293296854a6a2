// ABOUTME: Circuit provisioning and removal on the NRM.
// ABOUTME: Builds the provisioning request from validated endpoints and a path plan.

use super::error::ProvisionError;
use super::path::{BackupPolicy, PathPlan, plan_paths};
use super::validate::ValidatedEndpoint;
use crate::nrm::{ProvisionRequest, Session, Transport};
use crate::types::{CircuitId, Endpoint};
use chrono::{DateTime, Utc};
use tracing::info;

/// A circuit the NRM has accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedCircuit {
    pub circuit_id: CircuitId,
    pub source: Endpoint,
    pub dest: Endpoint,
    pub plan: PathPlan,
    pub provisioned_at: DateTime<Utc>,
}

/// OESS circuit description for a connection on the given source VLAN.
pub fn circuit_description(source: &Endpoint) -> String {
    format!("NSI-VLAN-{}", source.vlan())
}

/// Compute paths and submit one provisioning request.
///
/// The three remote calls (primary path, backup path, provision) are
/// independent; a plan computed for a request that then fails is dropped.
pub async fn provision<T: Transport>(
    session: &Session<T>,
    source: &ValidatedEndpoint,
    dest: &ValidatedEndpoint,
    policy: BackupPolicy,
) -> Result<ProvisionedCircuit, ProvisionError> {
    let plan = plan_paths(session, source.switch(), dest.switch(), policy).await?;

    let request = ProvisionRequest {
        workgroup: session.workgroup_id().clone(),
        source: source.endpoint().clone(),
        dest: dest.endpoint().clone(),
        primary: plan.primary.clone(),
        backup: plan.backup.clone(),
        description: circuit_description(source.endpoint()),
    };

    let circuit_id = session
        .client()
        .provision_circuit(&request)
        .await
        .map_err(ProvisionError::from_provisioning)?;

    info!(
        circuit_id = %circuit_id,
        source = %request.source,
        dest = %request.dest,
        primary_hops = plan.primary.len(),
        backup_hops = plan.backup.len(),
        "circuit provisioned"
    );

    Ok(ProvisionedCircuit {
        circuit_id,
        source: request.source,
        dest: request.dest,
        plan,
        provisioned_at: Utc::now(),
    })
}

/// Remove a circuit immediately.
///
/// Removing an already removed circuit is whatever the NRM says it is;
/// its answer is passed through unchanged.
pub async fn teardown<T: Transport>(
    session: &Session<T>,
    circuit_id: &CircuitId,
) -> Result<(), ProvisionError> {
    session
        .client()
        .remove_circuit(circuit_id, session.workgroup_id())
        .await
        .map_err(|e| ProvisionError::from_teardown(circuit_id, e))?;

    info!(circuit_id = %circuit_id, "circuit removed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_names_source_vlan() {
        let ep = Endpoint::parse("sw1:eth0#1234").unwrap();
        assert_eq!(circuit_description(&ep), "NSI-VLAN-1234");
    }
}
