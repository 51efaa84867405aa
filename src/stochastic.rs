// License: MIT
// Copyright © 2026 multistate-net contributors

//! The contract with the external stochastic-process layer.
//!
//! The solvers that turn a state-transition diagram into per-state
//! probability trajectories (Markov ODE integration, semi-Markov Volterra
//! solving, steady-state linear solve) live outside this crate.  The network
//! engine only ever consumes their finished output: one probability per
//! state, read at the end of the solve horizon or at steady state, together
//! with the performance value each state maps to.

use crate::{ugf::PROB_TOLERANCE, Error, Measure};

/// The solved output of a state-transition diagram.
///
/// `state_values[i]` is the performance output of state `i` expressed in
/// `measure`; `state_probabilities[i]` is the probability of occupying state
/// `i` (terminal or steady-state, depending on the upstream solver).
#[derive(Clone, Debug, PartialEq)]
pub struct SolvedStd {
    measure: Measure,
    state_values: Vec<f64>,
    state_probabilities: Vec<f64>,
}

impl SolvedStd {
    /// Wraps a solved state-transition diagram.
    ///
    /// Returns an error if the vectors differ in length or the probabilities
    /// do not sum to one within tolerance.
    pub fn new(
        measure: Measure,
        state_values: Vec<f64>,
        state_probabilities: Vec<f64>,
    ) -> Result<Self, Error> {
        if state_values.len() != state_probabilities.len() {
            return Err(Error::configuration(format!(
                "State values and probabilities differ in length: {} vs {}.",
                state_values.len(),
                state_probabilities.len()
            )));
        }
        let sum: f64 = state_probabilities.iter().sum();
        if (sum - 1.0).abs() > PROB_TOLERANCE {
            return Err(Error::configuration(format!(
                "State probabilities sum to {sum} instead of 1."
            )));
        }
        Ok(Self {
            measure,
            state_values,
            state_probabilities,
        })
    }

    /// The measure the state values are expressed in.
    pub fn measure(&self) -> Measure {
        self.measure
    }

    /// The per-state performance values.
    pub fn state_values(&self) -> &[f64] {
        &self.state_values
    }

    /// The per-state occupation probabilities.
    pub fn state_probabilities(&self) -> &[f64] {
        &self.state_probabilities
    }
}
