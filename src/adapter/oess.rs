// ABOUTME: OESS implementation of the connection manager capability contract.
// ABOUTME: Composes session, validation, path planning, provisioning and teardown per connection.

use super::capability::{ConnectionManager, LabelType};
use super::error::AdapterError;
use super::port_map::PortMap;
use super::registry::{ConnectionRegistry, ConnectionState, TransitionError};
use crate::config::Config;
use crate::nrm::{HttpTransport, Session, SessionConfig, Transport};
use crate::provision::{
    self, BackupPolicy, PathPlan, ProvisionedCircuit, find_path, plan_paths, validate_pair,
};
use crate::types::{CircuitId, ConnectionId, LinkId};
use async_trait::async_trait;
use rand::RngCore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Prefix of every connection id this adapter allocates.
pub const CONNECTION_ID_PREFIX: &str = "OESS-";

/// Shortest reservation the backend accepts.
pub const MINIMUM_DURATION: Duration = Duration::from_secs(1);

fn random_connection_id() -> ConnectionId {
    ConnectionId::new(format!(
        "{}{:08x}",
        CONNECTION_ID_PREFIX,
        rand::thread_rng().next_u32()
    ))
}

/// Connection manager for one OESS-controlled network.
///
/// The session is established once at construction and shared read-only by
/// every connection. Circuits are tracked per connection id.
pub struct OessConnectionManager<T = HttpTransport> {
    name: String,
    port_map: PortMap,
    session: Session<T>,
    registry: ConnectionRegistry,
    backup_policy: BackupPolicy,
}

impl<T> std::fmt::Debug for OessConnectionManager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OessConnectionManager")
            .field("name", &self.name)
            .field("ports", &self.port_map.len())
            .field("session", &self.session)
            .field("backup_policy", &self.backup_policy)
            .finish_non_exhaustive()
    }
}

impl OessConnectionManager<HttpTransport> {
    /// Authenticate against OESS and build the adapter. Fails if the
    /// credentials are rejected or the workgroup does not exist.
    pub async fn connect(
        network: &str,
        port_map: PortMap,
        session_config: &SessionConfig,
        backup_policy: BackupPolicy,
    ) -> Result<Self, AdapterError> {
        let session = Session::establish(session_config).await?;
        Ok(Self::new(network, port_map, session, backup_policy))
    }

    /// Build the adapter from a loaded configuration file.
    pub async fn from_config(config: &Config) -> crate::error::Result<Self> {
        let port_map = config.port_map()?;
        let session_config = config.session_config()?;
        Ok(Self::connect(&config.network, port_map, &session_config, config.backup_path).await?)
    }
}

impl<T: Transport> OessConnectionManager<T> {
    pub fn new(
        network: &str,
        port_map: PortMap,
        session: Session<T>,
        backup_policy: BackupPolicy,
    ) -> Self {
        Self {
            name: format!("OESS NRM {}", network),
            port_map,
            session,
            registry: ConnectionRegistry::new(),
            backup_policy,
        }
    }

    /// Backend name used in log context.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn minimum_duration(&self) -> Duration {
        MINIMUM_DURATION
    }

    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    pub fn connection_state(&self, id: &ConnectionId) -> ConnectionState {
        self.registry.state(id)
    }

    /// The circuit recorded for a connection, if its setup succeeded.
    pub fn circuit(&self, id: &ConnectionId) -> Option<ProvisionedCircuit> {
        self.registry.circuit(id)
    }

    pub fn active_circuits(&self) -> usize {
        self.registry.active_count()
    }

    /// Connections held in any state, circuit or not.
    pub fn held_connections(&self) -> usize {
        self.registry.len()
    }

    /// Allocate with a caller-supplied generator; collisions with held ids
    /// are regenerated.
    pub fn allocate_connection_id_with(
        &self,
        generate: impl FnMut() -> ConnectionId,
    ) -> ConnectionId {
        self.registry.allocate_with(generate)
    }

    /// Primary and backup paths between two switches, without provisioning.
    pub async fn plan(&self, from: &str, to: &str) -> Result<PathPlan, AdapterError> {
        Ok(plan_paths(&self.session, from, to, self.backup_policy).await?)
    }

    /// Shortest path between two switches avoiding `excluded`.
    pub async fn shortest_path(
        &self,
        from: &str,
        to: &str,
        excluded: &[LinkId],
    ) -> Result<Vec<LinkId>, AdapterError> {
        Ok(find_path(&self.session, from, to, excluded).await?)
    }

    /// Remove a circuit by id, bypassing the connection table.
    pub async fn remove_circuit(&self, circuit_id: &CircuitId) -> Result<(), AdapterError> {
        provision::teardown(&self.session, circuit_id).await?;
        Ok(())
    }

    async fn establish_circuit(
        &self,
        source_target: &str,
        dest_target: &str,
    ) -> Result<ProvisionedCircuit, AdapterError> {
        let (source, dest) = validate_pair(&self.session, source_target, dest_target).await?;
        let circuit = provision::provision(&self.session, &source, &dest, self.backup_policy).await?;
        Ok(circuit)
    }
}

impl<T: Transport + 'static> OessConnectionManager<T> {
    /// Run `setup_link` on its own task.
    pub fn spawn_setup_link(
        self: &Arc<Self>,
        connection_id: ConnectionId,
        source_target: String,
        dest_target: String,
        bandwidth: u64,
    ) -> JoinHandle<Result<(), AdapterError>> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            this.setup_link(&connection_id, &source_target, &dest_target, bandwidth)
                .await
        })
    }

    /// Run `teardown_link` on its own task.
    pub fn spawn_teardown_link(
        self: &Arc<Self>,
        connection_id: ConnectionId,
        source_target: String,
        dest_target: String,
        bandwidth: u64,
    ) -> JoinHandle<Result<(), AdapterError>> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            this.teardown_link(&connection_id, &source_target, &dest_target, bandwidth)
                .await
        })
    }
}

#[async_trait]
impl<T: Transport> ConnectionManager for OessConnectionManager<T> {
    fn resource_name(
        &self,
        port: &str,
        _label_type: &LabelType,
        label_value: u32,
    ) -> Result<String, AdapterError> {
        let interface = self.port_map.interface(port)?;
        Ok(format!("{}:{}", interface, label_value))
    }

    fn target_name(
        &self,
        port: &str,
        _label_type: &LabelType,
        label_value: u32,
    ) -> Result<String, AdapterError> {
        let interface = self.port_map.interface(port)?;
        Ok(format!("{}#{}", interface, label_value))
    }

    fn allocate_connection_id(&self, source_target: &str, dest_target: &str) -> ConnectionId {
        let id = self.registry.allocate_with(random_connection_id);
        debug!(backend = %self.name, %id, source_target, dest_target, "connection id allocated");
        id
    }

    fn release_connection_id(&self, connection_id: &ConnectionId) -> bool {
        let released = self.registry.release(connection_id);
        if released {
            debug!(backend = %self.name, %connection_id, "connection id released");
        }
        released
    }

    // OESS cannot translate tags between the two ends of a circuit.
    fn supports_label_swap(&self, _label_type: &LabelType) -> bool {
        false
    }

    async fn setup_link(
        &self,
        connection_id: &ConnectionId,
        source_target: &str,
        dest_target: &str,
        bandwidth: u64,
    ) -> Result<(), AdapterError> {
        self.registry
            .begin_setup(connection_id)
            .map_err(|e| transition_error(connection_id, e, "set up"))?;

        debug!(
            backend = %self.name,
            connection_id = %connection_id,
            source_target,
            dest_target,
            bandwidth,
            "setting up link"
        );

        match self.establish_circuit(source_target, dest_target).await {
            Ok(circuit) => {
                info!(
                    backend = %self.name,
                    connection_id = %connection_id,
                    circuit_id = %circuit.circuit_id,
                    "link {} -> {} up",
                    source_target,
                    dest_target
                );
                self.registry.finish_setup(connection_id, circuit);
                Ok(())
            }
            Err(e) => {
                self.registry.abort_setup(connection_id);
                warn!(
                    backend = %self.name,
                    connection_id = %connection_id,
                    error = %e,
                    "link setup failed"
                );
                Err(e)
            }
        }
    }

    async fn teardown_link(
        &self,
        connection_id: &ConnectionId,
        source_target: &str,
        dest_target: &str,
        _bandwidth: u64,
    ) -> Result<(), AdapterError> {
        let circuit_id = self
            .registry
            .begin_teardown(connection_id)
            .map_err(|e| transition_error(connection_id, e, "tear down"))?;

        debug!(
            backend = %self.name,
            connection_id = %connection_id,
            circuit_id = %circuit_id,
            "tearing down link"
        );

        match provision::teardown(&self.session, &circuit_id).await {
            Ok(_) => {
                self.registry.finish_teardown(connection_id);
                info!(
                    backend = %self.name,
                    connection_id = %connection_id,
                    circuit_id = %circuit_id,
                    state = %ConnectionState::Terminated,
                    "link {} -> {} down",
                    source_target,
                    dest_target
                );
                Ok(())
            }
            Err(e) => {
                self.registry.abort_teardown(connection_id);
                warn!(
                    backend = %self.name,
                    connection_id = %connection_id,
                    circuit_id = %circuit_id,
                    error = %e,
                    "link teardown failed"
                );
                Err(e.into())
            }
        }
    }
}

fn transition_error(
    id: &ConnectionId,
    err: TransitionError,
    operation: &'static str,
) -> AdapterError {
    match err {
        TransitionError::NoCircuit(state) => AdapterError::UnknownConnection {
            id: id.clone(),
            state,
        },
        TransitionError::WrongState(state) => AdapterError::InvalidState {
            id: id.clone(),
            state,
            operation,
        },
    }
}
