// ABOUTME: Mapping from NSI port names to OESS switch:interface identifiers.
// ABOUTME: Built once from configuration and read-only afterwards.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PortMapError {
    #[error("port '{0}' is configured more than once")]
    Duplicate(String),

    #[error("port '{0}' has an empty interface")]
    EmptyInterface(String),

    #[error("unknown port: {0}")]
    UnknownPort(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortMap {
    ports: HashMap<String, String>,
}

impl PortMap {
    pub fn new<I, K, V>(entries: I) -> Result<Self, PortMapError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut ports = HashMap::new();
        for (name, interface) in entries {
            let name = name.into();
            let interface = interface.into();
            if interface.trim().is_empty() {
                return Err(PortMapError::EmptyInterface(name));
            }
            if ports.contains_key(&name) {
                return Err(PortMapError::Duplicate(name));
            }
            ports.insert(name, interface);
        }
        Ok(Self { ports })
    }

    pub fn interface(&self, port: &str) -> Result<&str, PortMapError> {
        self.ports
            .get(port)
            .map(String::as_str)
            .ok_or_else(|| PortMapError::UnknownPort(port.to_string()))
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_rejected() {
        let err = PortMap::new([("ps", "sw1:eth0"), ("ps", "sw2:eth0")]).unwrap_err();
        assert_eq!(err, PortMapError::Duplicate("ps".to_string()));
    }

    #[test]
    fn lookup() {
        let map = PortMap::new([("ps", "sw1:eth0")]).unwrap();
        assert_eq!(map.interface("ps"), Ok("sw1:eth0"));
        assert_eq!(
            map.interface("nope"),
            Err(PortMapError::UnknownPort("nope".to_string()))
        );
    }
}
