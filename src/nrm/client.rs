// ABOUTME: Typed client for the OESS control API.
// ABOUTME: Wraps a Transport with per-call timeouts and JSON envelope decoding.

use super::error::{NrmError, Result};
use super::request::{NrmRequest, ProvisionRequest};
use super::transport::Transport;
use super::wire::{
    Envelope, InterfaceEntry, OneOrMany, PathLink, ProvisionResult, VlanAvailability,
    WorkgroupEntry,
};
use crate::types::{CircuitId, LinkId, VlanTag, WorkgroupId};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Typed operations against the control API.
///
/// Each call is a single request with a bounded timeout. Nothing is retried
/// here; callers decide what a failure means.
pub struct NrmClient<T> {
    transport: T,
    timeout: Duration,
}

impl<T: Transport> NrmClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn send(&self, request: NrmRequest<'_>) -> Result<Bytes> {
        let action = request.action();
        let path = request.path_and_query();
        debug!(action, path = %path, "NRM request");

        match tokio::time::timeout(self.timeout, self.transport.get(&path)).await {
            Ok(result) => result,
            Err(_) => Err(NrmError::Timeout {
                action,
                timeout: self.timeout,
            }),
        }
    }

    async fn call<R: DeserializeOwned>(&self, request: NrmRequest<'_>) -> Result<Envelope<R>> {
        let action = request.action();
        let body = self.send(request).await?;
        serde_json::from_slice(&body).map_err(|e| NrmError::Decode {
            action,
            reason: e.to_string(),
        })
    }

    /// Authenticated GET of the control URL. Only the status matters.
    pub async fn handshake(&self) -> Result<()> {
        self.send(NrmRequest::Handshake).await.map(|_| ())
    }

    pub async fn get_workgroups(&self) -> Result<Vec<WorkgroupEntry>> {
        let env: Envelope<Vec<WorkgroupEntry>> = self.call(NrmRequest::GetWorkgroups).await?;
        Ok(env.results.unwrap_or_default())
    }

    pub async fn get_node_interfaces(&self, node: &str) -> Result<Vec<InterfaceEntry>> {
        let env: Envelope<Vec<InterfaceEntry>> =
            self.call(NrmRequest::GetNodeInterfaces { node }).await?;
        Ok(env.results.unwrap_or_default())
    }

    /// `None` when OESS has no record of the interface on that node.
    pub async fn is_vlan_tag_available(
        &self,
        node: &str,
        interface: &str,
        vlan: VlanTag,
    ) -> Result<Option<bool>> {
        let env: Envelope<OneOrMany<VlanAvailability>> = self
            .call(NrmRequest::IsVlanTagAvailable {
                node,
                interface,
                vlan,
            })
            .await?;
        Ok(env
            .results
            .and_then(OneOrMany::into_first)
            .map(|a| a.available))
    }

    /// Links of the shortest path, in order. An empty vector means OESS
    /// found no path (or the switches are the same).
    pub async fn get_shortest_path(
        &self,
        from: &str,
        to: &str,
        excluded: &[LinkId],
    ) -> Result<Vec<LinkId>> {
        let env: Envelope<Vec<PathLink>> = self
            .call(NrmRequest::GetShortestPath { from, to, excluded })
            .await?;
        Ok(env
            .results
            .unwrap_or_default()
            .into_iter()
            .map(|l| l.link)
            .collect())
    }

    pub async fn provision_circuit(&self, request: &ProvisionRequest) -> Result<CircuitId> {
        const ACTION: &str = "provision_circuit";
        let env: Envelope<ProvisionResult> =
            self.call(NrmRequest::ProvisionCircuit(request)).await?;

        let remote_error = env.error_text().map(str::to_string);
        match env.results {
            Some(ProvisionResult {
                success: true,
                circuit_id: Some(id),
            }) => Ok(id),
            Some(ProvisionResult { success: true, .. }) => Err(NrmError::Decode {
                action: ACTION,
                reason: "success reported without a circuit_id".to_string(),
            }),
            _ => Err(NrmError::Remote {
                action: ACTION,
                message: remote_error
                    .unwrap_or_else(|| "provisioning was not successful".to_string()),
            }),
        }
    }

    pub async fn remove_circuit(
        &self,
        circuit: &CircuitId,
        workgroup: &WorkgroupId,
    ) -> Result<()> {
        const ACTION: &str = "remove_circuit";
        let body = self
            .send(NrmRequest::RemoveCircuit { circuit, workgroup })
            .await?;

        let value: serde_json::Value =
            serde_json::from_slice(&body).map_err(|e| NrmError::Decode {
                action: ACTION,
                reason: e.to_string(),
            })?;

        let empty = match &value {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            serde_json::Value::Array(items) => items.is_empty(),
            _ => false,
        };
        if empty {
            return Err(NrmError::Decode {
                action: ACTION,
                reason: "empty response".to_string(),
            });
        }

        if let Some(message) = value
            .get("error")
            .and_then(|e| e.as_str())
            .filter(|e| !e.trim().is_empty())
        {
            return Err(NrmError::Remote {
                action: ACTION,
                message: message.to_string(),
            });
        }

        let refused = value
            .get("results")
            .and_then(|r| r.get("success"))
            .is_some_and(|s| s == &serde_json::json!(0) || s == &serde_json::json!(false));
        if refused {
            return Err(NrmError::Remote {
                action: ACTION,
                message: value.to_string(),
            });
        }

        debug!(action = ACTION, reply = %value, "removal accepted");
        Ok(())
    }
}
