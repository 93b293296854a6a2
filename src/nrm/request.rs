// ABOUTME: Typed OESS control API operations.
// ABOUTME: Each variant knows its CGI script, action name and query parameters.

use crate::types::{CircuitId, Endpoint, LinkId, VlanTag, WorkgroupId};

const DATA_CGI: &str = "services/data.cgi";
const PROVISIONING_CGI: &str = "services/provisioning.cgi";

/// Sentinel for "now" / "never" in provisioning and removal times.
/// Scheduling is owned by the lifecycle controller, not by OESS.
pub const IMMEDIATE: i64 = -1;

/// Everything OESS needs to build a circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    pub workgroup: WorkgroupId,
    pub source: Endpoint,
    pub dest: Endpoint,
    pub primary: Vec<LinkId>,
    pub backup: Vec<LinkId>,
    pub description: String,
}

/// A single request against the control API.
#[derive(Debug, Clone, Copy)]
pub enum NrmRequest<'a> {
    /// Plain authenticated GET of the base URL.
    Handshake,
    GetWorkgroups,
    GetNodeInterfaces {
        node: &'a str,
    },
    IsVlanTagAvailable {
        node: &'a str,
        interface: &'a str,
        vlan: VlanTag,
    },
    GetShortestPath {
        from: &'a str,
        to: &'a str,
        excluded: &'a [LinkId],
    },
    ProvisionCircuit(&'a ProvisionRequest),
    RemoveCircuit {
        circuit: &'a CircuitId,
        workgroup: &'a WorkgroupId,
    },
}

impl NrmRequest<'_> {
    pub fn action(&self) -> &'static str {
        match self {
            NrmRequest::Handshake => "handshake",
            NrmRequest::GetWorkgroups => "get_workgroups",
            NrmRequest::GetNodeInterfaces { .. } => "get_node_interfaces",
            NrmRequest::IsVlanTagAvailable { .. } => "is_vlan_tag_available",
            NrmRequest::GetShortestPath { .. } => "get_shortest_path",
            NrmRequest::ProvisionCircuit(_) => "provision_circuit",
            NrmRequest::RemoveCircuit { .. } => "remove_circuit",
        }
    }

    fn script(&self) -> Option<&'static str> {
        match self {
            NrmRequest::Handshake => None,
            NrmRequest::ProvisionCircuit(_) | NrmRequest::RemoveCircuit { .. } => {
                Some(PROVISIONING_CGI)
            }
            _ => Some(DATA_CGI),
        }
    }

    /// Query parameters in wire order. Repeated keys (`node`, `link`) are
    /// significant to OESS and must stay in this order.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if matches!(self, NrmRequest::Handshake) {
            return params;
        }
        params.push(("action", self.action().to_string()));

        match self {
            NrmRequest::Handshake | NrmRequest::GetWorkgroups => {}
            NrmRequest::GetNodeInterfaces { node } => {
                params.push(("node", node.to_string()));
            }
            NrmRequest::IsVlanTagAvailable {
                node,
                interface,
                vlan,
            } => {
                params.push(("node", node.to_string()));
                params.push(("vlan", vlan.to_string()));
                params.push(("interface", interface.to_string()));
            }
            NrmRequest::GetShortestPath { from, to, excluded } => {
                params.push(("node", from.to_string()));
                params.push(("node", to.to_string()));
                params.extend(excluded.iter().map(|l| ("link", l.to_string())));
            }
            NrmRequest::ProvisionCircuit(req) => {
                params.push(("workgroup_id", req.workgroup.to_string()));
                for ep in [&req.source, &req.dest] {
                    params.push(("node", ep.switch().to_string()));
                    params.push(("interface", ep.interface().to_string()));
                    params.push(("tag", ep.vlan().to_string()));
                }
                params.extend(req.primary.iter().map(|l| ("link", l.to_string())));
                params.extend(req.backup.iter().map(|l| ("backup_link", l.to_string())));
                params.push(("provision_time", IMMEDIATE.to_string()));
                params.push(("remove_time", IMMEDIATE.to_string()));
                params.push(("description", req.description.clone()));
            }
            NrmRequest::RemoveCircuit { circuit, workgroup } => {
                params.push(("circuit_id", circuit.to_string()));
                params.push(("remove_time", IMMEDIATE.to_string()));
                params.push(("workgroup_id", workgroup.to_string()));
            }
        }

        params
    }

    /// Path and query relative to the control URL, e.g.
    /// `services/data.cgi?action=get_node_interfaces&node=sw1`.
    pub fn path_and_query(&self) -> String {
        let Some(script) = self.script() else {
            return String::new();
        };

        let query = self
            .params()
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", script, query)
    }
}
