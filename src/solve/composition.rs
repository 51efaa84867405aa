// License: MIT
// Copyright © 2026 multistate-net contributors

//! Probability composition: the joint state space of one network and the
//! weighing of its structure function over it.
//!
//! Independent elements each form a dimension of their own.  The members of
//! an evaluation-dependent group form one shared dimension: they take the
//! value at a single state index of their positional joint tables.  Fully
//! correlated sources likewise collapse into one shared dimension, so every
//! joint availability state is evaluated against every state of the
//! independent elements.

use itertools::Itertools;
use std::collections::HashMap;

use super::expr::Expr;
use super::paths::{component_leaf, source_leaf};
use crate::ugf::PROB_TOLERANCE;
use crate::{Error, Measure, Network, Ugf};

/// One dimension of the state space: the leaves that share one state index
/// and one probability vector.  Independent elements are dimensions with a
/// single leaf.
struct Dimension {
    leaves: Vec<usize>,
    values: Vec<Vec<f64>>,
    probabilities: Vec<f64>,
}

impl Dimension {
    fn single(leaf: usize, ugf: &Ugf) -> Self {
        Self {
            leaves: vec![leaf],
            values: vec![ugf.values().to_vec()],
            probabilities: ugf.probabilities().to_vec(),
        }
    }

    fn push_member(&mut self, leaf: usize, ugf: &Ugf) {
        self.leaves.push(leaf);
        self.values.push(ugf.values().to_vec());
    }

    fn shares_probabilities(&self, ugf: &Ugf) -> bool {
        ugf.probabilities()
            .iter()
            .zip(&self.probabilities)
            .all(|(a, b)| (a - b).abs() <= PROB_TOLERANCE)
    }

    /// Adds a member to an evaluation-dependent dimension.  Members must
    /// agree on the state count and on the shared probability vector.
    fn join(&mut self, group: &str, leaf: usize, ugf: &Ugf) -> Result<(), Error> {
        if ugf.len() != self.probabilities.len() {
            return Err(Error::configuration(format!(
                "Group '{group}': joint tables differ in state count: {} vs {}.",
                self.probabilities.len(),
                ugf.len()
            )));
        }
        if !self.shares_probabilities(ugf) {
            return Err(Error::configuration(format!(
                "Group '{group}': joint tables disagree on the shared probabilities."
            )));
        }
        self.push_member(leaf, ugf);
        Ok(())
    }

    /// Adds a fully correlated source to the shared source dimension, with
    /// the same agreement requirements as an evaluation-dependent group.
    fn join_correlated(&mut self, leaf: usize, ugf: &Ugf) -> Result<(), Error> {
        if ugf.len() != self.probabilities.len() {
            return Err(Error::configuration(format!(
                "Dependent sources differ in state count: {} vs {}.",
                self.probabilities.len(),
                ugf.len()
            )));
        }
        if !self.shares_probabilities(ugf) {
            return Err(Error::configuration(
                "Dependent sources disagree on the shared probabilities.".to_string(),
            ));
        }
        self.push_member(leaf, ugf);
        Ok(())
    }
}

/// The joint state space of one network.
pub(crate) struct Space {
    dimensions: Vec<Dimension>,
    leaf_count: usize,
}

/// Builds the state space from the resolved per-leaf UGFs (components first,
/// then sources, matching the leaf id layout).
pub(crate) fn build_space(ntw: &Network, resolved: &[Ugf]) -> Result<Space, Error> {
    let mut dimensions: Vec<Dimension> = Vec::new();
    let mut group_index: HashMap<&str, usize> = HashMap::new();
    let mut correlated: Option<Dimension> = None;

    for (index, component) in ntw.components.iter().enumerate() {
        let leaf = component_leaf(index);
        place(
            &mut dimensions,
            &mut group_index,
            leaf,
            &resolved[leaf],
            component.eval_group.as_deref(),
        )?;
    }

    for (index, source) in ntw.sources.iter().enumerate() {
        let leaf = source_leaf(ntw, index);
        let ugf = &resolved[leaf];
        if source.dependent {
            match correlated.as_mut() {
                None => correlated = Some(Dimension::single(leaf, ugf)),
                Some(dimension) => dimension.join_correlated(leaf, ugf)?,
            }
        } else {
            place(
                &mut dimensions,
                &mut group_index,
                leaf,
                ugf,
                source.eval_group.as_deref(),
            )?;
        }
    }
    dimensions.extend(correlated);

    Ok(Space {
        dimensions,
        leaf_count: resolved.len(),
    })
}

fn place<'a>(
    dimensions: &mut Vec<Dimension>,
    group_index: &mut HashMap<&'a str, usize>,
    leaf: usize,
    ugf: &Ugf,
    group: Option<&'a str>,
) -> Result<(), Error> {
    match group {
        None => dimensions.push(Dimension::single(leaf, ugf)),
        Some(group) => {
            if let Some(&at) = group_index.get(group) {
                dimensions[at].join(group, leaf, ugf)?;
            } else {
                group_index.insert(group, dimensions.len());
                dimensions.push(Dimension::single(leaf, ugf));
            }
        }
    }
    Ok(())
}

impl Space {
    /// Weighs the structure function over every joint state and reduces the
    /// outcomes into one UGF.
    pub(crate) fn evaluate(&self, expr: &Expr, measure: Measure) -> Result<Ugf, Error> {
        let mut leaf_values = vec![0.0; self.leaf_count];

        if self.dimensions.is_empty() {
            return Ugf::reduce(measure, vec![expr.eval(&leaf_values)], vec![1.0]);
        }

        let combinations = self
            .dimensions
            .iter()
            .map(|dimension| 0..dimension.probabilities.len())
            .multi_cartesian_product();

        let mut values = Vec::new();
        let mut probabilities = Vec::new();
        for combination in combinations {
            let mut probability = 1.0;
            for (dimension, &state) in self.dimensions.iter().zip(&combination) {
                probability *= dimension.probabilities[state];
                for (&leaf, member_values) in dimension.leaves.iter().zip(&dimension.values) {
                    leaf_values[leaf] = member_values[state];
                }
            }
            values.push(expr.eval(&leaf_values));
            probabilities.push(probability);
        }
        Ugf::reduce(measure, values, probabilities)
    }
}
