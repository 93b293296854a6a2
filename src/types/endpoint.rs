// ABOUTME: Compound endpoint parsing for the switch:interface#vlan encoding.
// ABOUTME: This is the target string the adapter hands back to the lifecycle controller.

use super::vlan::{VlanTag, VlanTagError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointError {
    #[error("endpoint '{0}' is missing the ':' between switch and interface")]
    MissingSwitchDelimiter(String),

    #[error("endpoint '{0}' is missing the '#' before the VLAN tag")]
    MissingVlanDelimiter(String),

    #[error("endpoint '{0}' has an empty switch name")]
    EmptySwitch(String),

    #[error("endpoint '{0}' has an empty interface name")]
    EmptyInterface(String),

    #[error("switch name '{0}' must not contain ':'")]
    SwitchContainsDelimiter(String),

    #[error("endpoint '{endpoint}' has an invalid VLAN tag: {source}")]
    InvalidVlan {
        endpoint: String,
        source: VlanTagError,
    },
}

/// A tagged interface on a switch, encoded as `switch:interface#vlan`.
///
/// The switch name runs up to the first `:` and the VLAN tag follows the
/// last `#`, so interface names like `e15/1` or `Eth1:2` survive intact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    switch: String,
    interface: String,
    vlan: VlanTag,
}

impl Endpoint {
    pub fn new(
        switch: impl Into<String>,
        interface: impl Into<String>,
        vlan: VlanTag,
    ) -> Result<Self, EndpointError> {
        let switch = switch.into();
        let interface = interface.into();
        if switch.is_empty() {
            return Err(EndpointError::EmptySwitch(format!("{}:{}#{}", switch, interface, vlan)));
        }
        if interface.is_empty() {
            return Err(EndpointError::EmptyInterface(format!("{}:{}#{}", switch, interface, vlan)));
        }
        // parse() splits at the first ':', so such a switch would not survive display.
        if switch.contains(':') {
            return Err(EndpointError::SwitchContainsDelimiter(switch));
        }
        Ok(Self {
            switch,
            interface,
            vlan,
        })
    }

    pub fn parse(input: &str) -> Result<Self, EndpointError> {
        let input = input.trim();

        let (switch, rest) = input
            .split_once(':')
            .ok_or_else(|| EndpointError::MissingSwitchDelimiter(input.to_string()))?;
        let (interface, vlan) = rest
            .rsplit_once('#')
            .ok_or_else(|| EndpointError::MissingVlanDelimiter(input.to_string()))?;

        if switch.is_empty() {
            return Err(EndpointError::EmptySwitch(input.to_string()));
        }
        if interface.is_empty() {
            return Err(EndpointError::EmptyInterface(input.to_string()));
        }

        let vlan = vlan.parse().map_err(|source| EndpointError::InvalidVlan {
            endpoint: input.to_string(),
            source,
        })?;

        Ok(Self {
            switch: switch.to_string(),
            interface: interface.to_string(),
            vlan,
        })
    }

    pub fn switch(&self) -> &str {
        &self.switch
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn vlan(&self) -> VlanTag {
        self.vlan
    }
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.switch, self.interface, self.vlan)
    }
}
