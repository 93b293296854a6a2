// ABOUTME: Per-connection state and provisioned circuit table.
// ABOUTME: A lock-guarded map keyed by ConnectionId, one entry per in-flight connection.

use crate::provision::ProvisionedCircuit;
use crate::types::{CircuitId, ConnectionId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;

/// Lifecycle of one connection as seen by the adapter.
///
/// `Unallocated` means no entry exists. `Terminated` is the state a
/// connection reaches when its circuit is removed; the entry is dropped at
/// that point, so it is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Unallocated,
    ResourcesNamed,
    SetupInProgress,
    Active,
    TeardownInProgress,
    Terminated,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Unallocated => "unallocated",
            ConnectionState::ResourcesNamed => "resources-named",
            ConnectionState::SetupInProgress => "setup-in-progress",
            ConnectionState::Active => "active",
            ConnectionState::TeardownInProgress => "teardown-in-progress",
            ConnectionState::Terminated => "terminated",
        };
        f.write_str(s)
    }
}

/// Why a registry transition was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// No provisioned circuit is recorded for the connection.
    NoCircuit(ConnectionState),
    /// The connection is in a state the operation cannot start from.
    WrongState(ConnectionState),
}

#[derive(Debug)]
struct Entry {
    state: ConnectionState,
    circuit: Option<ProvisionedCircuit>,
}

impl Entry {
    fn named() -> Self {
        Self {
            state: ConnectionState::ResourcesNamed,
            circuit: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    entries: Mutex<HashMap<ConnectionId, Entry>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a fresh id. `generate` is called again whenever it produces an
    /// id that is already held; check and insert happen under one lock.
    pub fn allocate_with(&self, mut generate: impl FnMut() -> ConnectionId) -> ConnectionId {
        let mut entries = self.entries.lock();
        loop {
            let id = generate();
            if !entries.contains_key(&id) {
                entries.insert(id.clone(), Entry::named());
                return id;
            }
            tracing::debug!(%id, "connection id collision, regenerating");
        }
    }

    pub fn state(&self, id: &ConnectionId) -> ConnectionState {
        self.entries
            .lock()
            .get(id)
            .map(|e| e.state)
            .unwrap_or(ConnectionState::Unallocated)
    }

    pub fn circuit(&self, id: &ConnectionId) -> Option<ProvisionedCircuit> {
        self.entries.lock().get(id).and_then(|e| e.circuit.clone())
    }

    /// Number of connections held, in any state.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Number of connections with a provisioned circuit.
    pub fn active_count(&self) -> usize {
        self.entries
            .lock()
            .values()
            .filter(|e| e.circuit.is_some())
            .count()
    }

    /// Unallocated or ResourcesNamed -> SetupInProgress.
    /// Ids the adapter never handed out are accepted.
    pub fn begin_setup(&self, id: &ConnectionId) -> Result<(), TransitionError> {
        let mut entries = self.entries.lock();
        let entry = entries.entry(id.clone()).or_insert_with(Entry::named);
        match entry.state {
            ConnectionState::ResourcesNamed => {
                entry.state = ConnectionState::SetupInProgress;
                Ok(())
            }
            other => Err(TransitionError::WrongState(other)),
        }
    }

    /// SetupInProgress -> Active, recording the circuit.
    pub fn finish_setup(&self, id: &ConnectionId, circuit: ProvisionedCircuit) {
        let mut entries = self.entries.lock();
        let entry = entries.entry(id.clone()).or_insert_with(Entry::named);
        entry.state = ConnectionState::Active;
        entry.circuit = Some(circuit);
    }

    /// SetupInProgress -> ResourcesNamed after a failed setup.
    pub fn abort_setup(&self, id: &ConnectionId) {
        if let Some(entry) = self.entries.lock().get_mut(id)
            && entry.state == ConnectionState::SetupInProgress
        {
            entry.state = ConnectionState::ResourcesNamed;
        }
    }

    /// Active -> TeardownInProgress, returning the circuit to remove.
    ///
    /// A connection that was named but never got a circuit (never set up, or
    /// its setup failed) is terminated here: the entry is dropped and
    /// `NoCircuit` is still reported.
    pub fn begin_teardown(&self, id: &ConnectionId) -> Result<CircuitId, TransitionError> {
        let mut entries = self.entries.lock();
        let Some(entry) = entries.get_mut(id) else {
            return Err(TransitionError::NoCircuit(ConnectionState::Unallocated));
        };
        match entry.state {
            ConnectionState::Active => match &entry.circuit {
                Some(circuit) => {
                    let circuit_id = circuit.circuit_id.clone();
                    entry.state = ConnectionState::TeardownInProgress;
                    Ok(circuit_id)
                }
                None => Err(TransitionError::NoCircuit(ConnectionState::Active)),
            },
            ConnectionState::ResourcesNamed => {
                entries.remove(id);
                Err(TransitionError::NoCircuit(ConnectionState::ResourcesNamed))
            }
            ConnectionState::TeardownInProgress => Err(TransitionError::WrongState(entry.state)),
            state => Err(TransitionError::NoCircuit(state)),
        }
    }

    /// TeardownInProgress -> Terminated. The entry is dropped.
    pub fn finish_teardown(&self, id: &ConnectionId) -> Option<ProvisionedCircuit> {
        self.entries.lock().remove(id).and_then(|e| e.circuit)
    }

    /// TeardownInProgress -> Active; the circuit is kept so the controller
    /// can try again.
    pub fn abort_teardown(&self, id: &ConnectionId) {
        if let Some(entry) = self.entries.lock().get_mut(id)
            && entry.state == ConnectionState::TeardownInProgress
        {
            entry.state = ConnectionState::Active;
        }
    }

    /// Drop an allocated id that never got a circuit.
    pub fn release(&self, id: &ConnectionId) -> bool {
        let mut entries = self.entries.lock();
        match entries.get(id) {
            Some(entry) if entry.state == ConnectionState::ResourcesNamed => {
                entries.remove(id);
                true
            }
            _ => false,
        }
    }
}
