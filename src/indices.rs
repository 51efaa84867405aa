// License: MIT
// Copyright © 2026 multistate-net contributors

//! Scalar reliability indices derived from a solved user's UGF.
//!
//! These are pure functions of the distribution; nothing here feeds back
//! into the network engine.

use crate::Ugf;

/// Expected energy (or flow, ...) not supplied: the expected shortfall of
/// the delivered performance against the given demand,
/// `Σ pᵢ · max(0, demand − vᵢ)`.
pub fn eens(ugf: &Ugf, demand: f64) -> f64 {
    ugf.values()
        .iter()
        .zip(ugf.probabilities())
        .map(|(v, p)| p * (demand - v).max(0.0))
        .sum()
}

/// Generation ratio availability: the probability that the delivered
/// performance covers the given demand, `Σ pᵢ · [vᵢ ≥ demand]`.
pub fn gra(ugf: &Ugf, demand: f64) -> f64 {
    ugf.values()
        .iter()
        .zip(ugf.probabilities())
        .filter(|(v, _)| **v >= demand)
        .map(|(_, p)| p)
        .sum()
}
