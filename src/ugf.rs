// License: MIT
// Copyright © 2026 multistate-net contributors

//! The Universal Generating Function: an immutable probability-mass
//! representation over one scalar measure.

use ordered_float::OrderedFloat;
use std::collections::BTreeMap;

use crate::{Error, Measure, SolvedStd};

/// Tolerance on the sum of a probability vector.  Sums within this distance
/// of one are renormalized silently; larger deviations are a configuration
/// error.
pub(crate) const PROB_TOLERANCE: f64 = 1e-6;

/// A discrete probability distribution over one scalar performance measure.
///
/// A reduced UGF holds unique, sorted `values` and matching `probabilities`
/// summing to one.  UGFs constructed with [`Ugf::raw`] keep the given
/// positional order instead, which is what evaluation-dependent joint tables
/// need.
#[derive(Clone, Debug, PartialEq)]
pub struct Ugf {
    measure: Measure,
    values: Vec<f64>,
    probabilities: Vec<f64>,
}

impl Ugf {
    /// Creates a UGF from a raw (values, probabilities) pair, sorting by
    /// value and merging duplicate values by summing their probabilities.
    ///
    /// Returns an error if the vectors differ in length, are empty, or if the
    /// probabilities do not sum to one within tolerance.
    pub fn reduce(
        measure: Measure,
        values: Vec<f64>,
        probabilities: Vec<f64>,
    ) -> Result<Self, Error> {
        let probabilities = checked_probabilities(&values, probabilities)?;

        let mut merged = BTreeMap::new();
        for (value, probability) in values.into_iter().zip(probabilities) {
            *merged.entry(OrderedFloat(value)).or_insert(0.0) += probability;
        }

        Ok(Self {
            measure,
            values: merged.keys().map(|v| v.0).collect(),
            probabilities: merged.values().copied().collect(),
        })
    }

    /// Creates a UGF that keeps the given positional order, duplicate values
    /// included.
    ///
    /// The index of a state is meaningful here: the members of an
    /// evaluation-dependent group take the value at the same shared index, so
    /// their tables must not be reordered or merged.
    pub fn raw(measure: Measure, values: Vec<f64>, probabilities: Vec<f64>) -> Result<Self, Error> {
        let probabilities = checked_probabilities(&values, probabilities)?;
        Ok(Self {
            measure,
            values,
            probabilities,
        })
    }

    /// A degenerate UGF representing "unconstrained / no element present":
    /// a single state at the measure's ceiling with probability one.
    pub fn unconstrained(measure: Measure, ceiling: f64) -> Self {
        Self {
            measure,
            values: vec![ceiling],
            probabilities: vec![1.0],
        }
    }

    /// Reduces the per-state (value, probability) pairs of a finished
    /// state-transition diagram into a UGF.
    ///
    /// This is the single contract the network engine requires from the
    /// stochastic-process layer.
    pub fn from_solved_std(std: &SolvedStd) -> Result<Self, Error> {
        Self::reduce(
            std.measure(),
            std.state_values().to_vec(),
            std.state_probabilities().to_vec(),
        )
    }

    /// The measure this distribution is expressed in.
    pub fn measure(&self) -> Measure {
        self.measure
    }

    /// The state values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The state probabilities.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// The number of states.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the UGF has no states.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The largest state value.
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// The expected value of the distribution.
    pub fn expectation(&self) -> f64 {
        self.values
            .iter()
            .zip(&self.probabilities)
            .map(|(v, p)| v * p)
            .sum()
    }
}

/// Validates vector lengths and the probability sum, renormalizing away
/// floating-point drift within [`PROB_TOLERANCE`].
fn checked_probabilities(values: &[f64], mut probabilities: Vec<f64>) -> Result<Vec<f64>, Error> {
    if values.len() != probabilities.len() {
        return Err(Error::configuration(format!(
            "Values and probabilities differ in length: {} vs {}.",
            values.len(),
            probabilities.len()
        )));
    }
    if values.is_empty() {
        return Err(Error::configuration(
            "A UGF needs at least one state.".to_string(),
        ));
    }

    let sum: f64 = probabilities.iter().sum();
    if (sum - 1.0).abs() > PROB_TOLERANCE {
        return Err(Error::configuration(format!(
            "Probabilities sum to {sum} instead of 1."
        )));
    }
    if sum != 1.0 {
        for p in probabilities.iter_mut() {
            *p /= sum;
        }
    }

    Ok(probabilities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_ugf;

    #[test]
    fn test_reduce_merges_duplicates() -> Result<(), Error> {
        let ugf = Ugf::reduce(
            Measure::Power,
            vec![2.0, 0.0, 2.0, 1.0],
            vec![0.1, 0.2, 0.3, 0.4],
        )?;
        assert_ugf(&ugf, &[0.0, 1.0, 2.0], &[0.2, 0.4, 0.4]);
        assert_eq!(ugf.measure(), Measure::Power);
        assert_eq!(ugf.max_value(), 2.0);
        Ok(())
    }

    #[test]
    fn test_reduce_rejects_bad_sum() {
        assert_eq!(
            Ugf::reduce(Measure::Power, vec![0.0, 1.0], vec![0.5, 0.6]),
            Err(Error::configuration(
                "Probabilities sum to 1.1 instead of 1."
            ))
        );
        assert_eq!(
            Ugf::reduce(Measure::Power, vec![0.0], vec![0.5, 0.5]),
            Err(Error::configuration(
                "Values and probabilities differ in length: 1 vs 2."
            ))
        );
        assert!(Ugf::reduce(Measure::Power, vec![], vec![]).is_err());
    }

    #[test]
    fn test_reduce_renormalizes_drift() -> Result<(), Error> {
        let ugf = Ugf::reduce(Measure::Flow, vec![0.0, 1.0], vec![0.3, 0.7 + 1e-9])?;
        let sum: f64 = ugf.probabilities().iter().sum();
        assert_eq!(sum, 1.0);
        Ok(())
    }

    #[test]
    fn test_raw_keeps_positions() -> Result<(), Error> {
        let ugf = Ugf::raw(
            Measure::Power,
            vec![0.0, 1.0, 0.0, 1.0],
            vec![0.1, 0.2, 0.3, 0.4],
        )?;
        assert_eq!(ugf.values(), &[0.0, 1.0, 0.0, 1.0]);
        assert_eq!(ugf.len(), 4);
        Ok(())
    }

    #[test]
    fn test_unconstrained() {
        let ugf = Ugf::unconstrained(Measure::Flow, f64::INFINITY);
        assert_eq!(ugf.values(), &[f64::INFINITY]);
        assert_eq!(ugf.probabilities(), &[1.0]);
    }

    #[test]
    fn test_from_solved_std() -> Result<(), Error> {
        let std = SolvedStd::new(Measure::Power, vec![2.0, 0.0, 2.0], vec![0.5, 0.1, 0.4])?;
        let ugf = Ugf::from_solved_std(&std)?;
        assert_ugf(&ugf, &[0.0, 2.0], &[0.1, 0.9]);
        Ok(())
    }

    #[test]
    fn test_expectation() -> Result<(), Error> {
        let ugf = Ugf::reduce(Measure::Power, vec![0.0, 10.0], vec![0.4, 0.6])?;
        assert!((ugf.expectation() - 6.0).abs() < 1e-12);
        Ok(())
    }
}
