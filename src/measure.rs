// License: MIT
// Copyright © 2026 multistate-net contributors

//! The scalar quantity being propagated through a network, and the registry
//! that maps it to a unit and a ceiling value.

use std::collections::HashMap;

/// The scalar performance measure carried by a [`Ugf`][crate::Ugf].
///
/// A network propagates exactly one measure per solve; mixing measures across
/// the elements of one network is a configuration error.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Measure {
    /// Electrical power.
    Power,
    /// Volumetric flow.
    Flow,
    /// Energy.
    Energy,
}

impl Measure {
    /// Returns the display unit of the measure.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Power => "MW",
            Self::Flow => "m³/hr",
            Self::Energy => "MWh",
        }
    }
}

impl std::fmt::Display for Measure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Power => write!(f, "power [{}]", self.unit()),
            Self::Flow => write!(f, "flow [{}]", self.unit()),
            Self::Energy => write!(f, "energy [{}]", self.unit()),
        }
    }
}

/// Per-solve registry of measure ceilings.
///
/// The ceiling of a measure is the output assigned to an element with no
/// characterization of its own: a single state at the ceiling with
/// probability one, the neutral element of series composition.  The default
/// ceiling is unbounded.
#[derive(Clone, Debug, Default)]
pub struct MeasureRegistry {
    ceilings: HashMap<Measure, f64>,
}

impl MeasureRegistry {
    /// Creates a registry with unbounded ceilings for every measure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the ceiling of the given measure.
    pub fn with_ceiling(mut self, measure: Measure, ceiling: f64) -> Self {
        self.ceilings.insert(measure, ceiling);
        self
    }

    /// Returns the ceiling of the given measure.
    pub fn ceiling(&self, measure: Measure) -> f64 {
        self.ceilings.get(&measure).copied().unwrap_or(f64::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Measure::Power.to_string(), "power [MW]");
        assert_eq!(Measure::Flow.to_string(), "flow [m³/hr]");
        assert_eq!(Measure::Flow.unit(), "m³/hr");
    }

    #[test]
    fn test_registry_ceilings() {
        let registry = MeasureRegistry::new();
        assert_eq!(registry.ceiling(Measure::Power), f64::INFINITY);

        let registry = registry.with_ceiling(Measure::Power, 500.0);
        assert_eq!(registry.ceiling(Measure::Power), 500.0);
        assert_eq!(registry.ceiling(Measure::Energy), f64::INFINITY);
    }
}
