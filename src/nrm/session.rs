// ABOUTME: Session bootstrap against the OESS control API.
// ABOUTME: Authenticates once and resolves the operator workgroup id.

use super::client::{DEFAULT_TIMEOUT, NrmClient};
use super::error::NrmError;
use super::transport::{HttpTransport, Transport};
use crate::types::WorkgroupId;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Username and password for the control API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Inputs for establishing a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub url: String,
    pub credentials: Credentials,
    pub workgroup: String,
    pub timeout: Duration,
}

impl SessionConfig {
    pub fn new(
        url: impl Into<String>,
        credentials: Credentials,
        workgroup: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            credentials,
            workgroup: workgroup.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("authentication against {url} failed: {reason}")]
    Authentication { url: String, reason: String },

    #[error("no workgroup named '{0}' is visible to this account")]
    UnknownWorkgroup(String),

    #[error("invalid NRM configuration: {0}")]
    Configuration(String),

    #[error(transparent)]
    Nrm(NrmError),
}

/// The resolved operator workgroup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workgroup {
    pub name: String,
    pub id: WorkgroupId,
}

/// An authenticated channel plus the workgroup every provisioning call runs
/// under. Immutable once established and safe to share across connections.
pub struct Session<T = HttpTransport> {
    control_url: String,
    workgroup: Workgroup,
    client: NrmClient<T>,
}

impl<T> std::fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("control_url", &self.control_url)
            .field("workgroup", &self.workgroup)
            .finish_non_exhaustive()
    }
}

impl Session<HttpTransport> {
    /// Connect over HTTP, authenticate and resolve the configured workgroup.
    pub async fn establish(config: &SessionConfig) -> Result<Self, SessionError> {
        let transport = HttpTransport::new(&config.url, &config.credentials).map_err(|e| {
            SessionError::Configuration(e.to_string())
        })?;
        let client = NrmClient::new(transport).with_timeout(config.timeout);
        Self::establish_with(&config.url, client, &config.workgroup).await
    }
}

impl<T: Transport> Session<T> {
    /// Authenticate through an existing client and resolve `workgroup_name`
    /// by exact name match.
    pub async fn establish_with(
        control_url: &str,
        client: NrmClient<T>,
        workgroup_name: &str,
    ) -> Result<Self, SessionError> {
        let auth_error = |e: NrmError| match e {
            NrmError::Unauthorized(status) => SessionError::Authentication {
                url: control_url.to_string(),
                reason: format!("credentials rejected (HTTP {})", status),
            },
            other => SessionError::Nrm(other),
        };

        debug!(url = control_url, "authenticating against NRM");
        client.handshake().await.map_err(auth_error)?;

        let workgroups = client.get_workgroups().await.map_err(auth_error)?;
        let entry = workgroups
            .into_iter()
            .find(|wg| wg.name == workgroup_name)
            .ok_or_else(|| SessionError::UnknownWorkgroup(workgroup_name.to_string()))?;

        info!(
            workgroup = %entry.name,
            workgroup_id = %entry.workgroup_id,
            "NRM session established"
        );

        Ok(Self {
            control_url: control_url.to_string(),
            workgroup: Workgroup {
                name: entry.name,
                id: entry.workgroup_id,
            },
            client,
        })
    }

    pub fn control_url(&self) -> &str {
        &self.control_url
    }

    pub fn workgroup(&self) -> &Workgroup {
        &self.workgroup
    }

    pub fn workgroup_id(&self) -> &WorkgroupId {
        &self.workgroup.id
    }

    pub fn client(&self) -> &NrmClient<T> {
        &self.client
    }
}
