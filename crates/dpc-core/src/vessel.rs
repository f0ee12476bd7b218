//! # Vessel Configuration
//!
//! The static description of the monitored vessel that a monitoring session
//! carries: its name, DP equipment class, and redundancy counts.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// IMO DP equipment class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DpClass {
    /// No redundancy.
    Class1,
    /// Redundant active components.
    Class2,
    /// Redundant components with physical separation (fire/flood).
    Class3,
}

impl DpClass {
    /// Numeric class (1, 2 or 3).
    pub fn number(self) -> u8 {
        match self {
            Self::Class1 => 1,
            Self::Class2 => 2,
            Self::Class3 => 3,
        }
    }
}

impl TryFrom<u8> for DpClass {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Class1),
            2 => Ok(Self::Class2),
            3 => Ok(Self::Class3),
            other => Err(ValidationError::InvalidDpClass(other)),
        }
    }
}

impl From<DpClass> for u8 {
    fn from(class: DpClass) -> Self {
        class.number()
    }
}

impl std::fmt::Display for DpClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DP{}", self.number())
    }
}

/// Vessel description attached to a monitoring session.
///
/// Fields missing from a config file fall back to [`VesselConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselConfig {
    /// Vessel name, also used as the event vessel identifier.
    pub name: String,
    /// DP equipment class.
    pub dp_class: DpClass,
    /// Number of thrusters.
    pub thrusters: u32,
    /// Number of main generators.
    pub generators: u32,
    /// Number of independent position reference systems.
    pub position_references: u32,
}

impl VesselConfig {
    /// A DP2 vessel with six thrusters, four generators and three position
    /// references, named as given.
    pub fn dp2(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dp_class: DpClass::Class2,
            thrusters: 6,
            generators: 4,
            position_references: 3,
        }
    }

    /// Builder: replace the vessel name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Default for VesselConfig {
    fn default() -> Self {
        Self::dp2("unnamed vessel")
    }
}
