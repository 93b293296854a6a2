// ABOUTME: Configuration types and parsing for oess-cm.yml.
// ABOUTME: NRM endpoint and credentials, NSI port list, timeouts and backup policy.

mod env_value;
mod init;
mod ports;

pub use env_value::EnvValue;
pub use init::init_config;
pub use ports::PortConfig;

use crate::adapter::PortMap;
use crate::error::{Error, Result};
use crate::nrm::{Credentials, DEFAULT_TIMEOUT, SessionConfig};
use crate::provision::BackupPolicy;
use nonempty::NonEmpty;
use ports::deserialize_ports;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "oess-cm.yml";
pub const CONFIG_FILENAME_ALT: &str = "oess-cm.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".oess-cm/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// NSI network name this backend serves.
    pub network: String,

    pub nrm: NrmConfig,

    #[serde(default)]
    pub backup_path: BackupPolicy,

    #[serde(deserialize_with = "deserialize_ports")]
    pub ports: NonEmpty<PortConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NrmConfig {
    /// Base URL of the OESS installation, e.g. `http://oess.example.net/oess/`.
    pub url: String,
    pub user: String,
    pub password: EnvValue,
    pub workgroup: String,
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// NSI port name -> OESS `switch:interface`.
    pub fn port_map(&self) -> Result<PortMap> {
        PortMap::new(
            self.ports
                .iter()
                .map(|p| (p.name.clone(), p.interface.clone())),
        )
        .map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Session parameters with the password resolved.
    pub fn session_config(&self) -> Result<SessionConfig> {
        if self.nrm.timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "nrm.timeout must be greater than zero".to_string(),
            ));
        }
        let password = self.nrm.password.resolve()?;
        Ok(SessionConfig::new(
            self.nrm.url.clone(),
            Credentials::new(self.nrm.user.clone(), password),
            self.nrm.workgroup.clone(),
        )
        .timeout(self.nrm.timeout))
    }

    pub fn template() -> Self {
        Config {
            network: "example.net".to_string(),
            nrm: NrmConfig {
                url: "http://oess.example.net/oess/".to_string(),
                user: "nsi".to_string(),
                password: EnvValue::FromEnv {
                    var: "OESS_PASSWORD".to_string(),
                    default: None,
                },
                workgroup: "NSI".to_string(),
                timeout: DEFAULT_TIMEOUT,
            },
            backup_path: BackupPolicy::default(),
            ports: NonEmpty::new(PortConfig {
                name: "port-1".to_string(),
                interface: "switch1.example.net:e1/1".to_string(),
            }),
        }
    }
}
