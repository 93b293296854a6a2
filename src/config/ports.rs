// ABOUTME: NSI port declarations for the OESS network.
// ABOUTME: Accepts "name=switch:interface" shorthand or a {name, interface} map.

use nonempty::NonEmpty;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortConfig {
    pub name: String,
    pub interface: String,
}

impl PortConfig {
    /// Both declaration forms end up here, so they share the same checks.
    pub fn new(name: &str, interface: &str) -> Result<Self, String> {
        let (name, interface) = (name.trim(), interface.trim());

        if name.is_empty() {
            return Err(format!("port with interface '{}' has an empty name", interface));
        }
        match interface.split_once(':') {
            Some((switch, iface)) if !switch.is_empty() && !iface.is_empty() => {}
            _ => {
                return Err(format!(
                    "interface '{}' of port '{}' must look like switch:interface",
                    interface, name
                ));
            }
        }

        Ok(PortConfig {
            name: name.to_string(),
            interface: interface.to_string(),
        })
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let (name, interface) = s
            .split_once('=')
            .ok_or_else(|| format!("port '{}' must look like name=switch:interface", s))?;
        Self::new(name, interface)
    }
}

#[derive(Debug, Deserialize)]
struct DetailedPort {
    name: String,
    interface: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PortEntry {
    Simple(String),
    Detailed(DetailedPort),
}

impl PortEntry {
    fn into_port_config(self) -> Result<PortConfig, String> {
        match self {
            PortEntry::Simple(s) => PortConfig::parse(&s),
            PortEntry::Detailed(d) => PortConfig::new(&d.name, &d.interface),
        }
    }
}

pub fn deserialize_ports<'de, D>(deserializer: D) -> Result<NonEmpty<PortConfig>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<PortEntry> = Vec::deserialize(deserializer)?;
    let ports = values
        .into_iter()
        .map(PortEntry::into_port_config)
        .collect::<Result<Vec<_>, _>>()
        .map_err(serde::de::Error::custom)?;

    NonEmpty::from_vec(ports).ok_or_else(|| serde::de::Error::custom("at least one port is required"))
}
