// ABOUTME: 802.1Q VLAN tag validation.
// ABOUTME: Only tags usable for customer traffic (1..=4094) are accepted.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MIN_VLAN: u16 = 1;
pub const MAX_VLAN: u16 = 4094;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VlanTagError {
    #[error("VLAN tag cannot be empty")]
    Empty,

    #[error("VLAN tag is not a number: {0}")]
    NotANumber(String),

    #[error("VLAN tag {0} is outside the valid range {MIN_VLAN}-{MAX_VLAN}")]
    OutOfRange(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VlanTag(u16);

impl VlanTag {
    pub fn new(value: u16) -> Result<Self, VlanTagError> {
        if !(MIN_VLAN..=MAX_VLAN).contains(&value) {
            return Err(VlanTagError::OutOfRange(u32::from(value)));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl FromStr for VlanTag {
    type Err = VlanTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(VlanTagError::Empty);
        }
        if !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(VlanTagError::NotANumber(s.to_string()));
        }
        let value: u32 = s
            .parse()
            .map_err(|_| VlanTagError::OutOfRange(u32::MAX))?;
        let value = u16::try_from(value).map_err(|_| VlanTagError::OutOfRange(value))?;
        Self::new(value)
    }
}

impl fmt::Display for VlanTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
