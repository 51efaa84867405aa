// License: MIT
// Copyright © 2026 multistate-net contributors

//! The element records a network registers: components, sources and users,
//! each with exactly one location and an optional characterization.

use crate::{NetworkRef, SolvedStd, Ugf};

/// Where an element sits on the multigraph: a vertex, or a directed edge
/// between two vertices.
///
/// Adding an element grows the graph as needed, so locations may reference
/// vertices that do not exist yet.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Location {
    /// A vertex id.
    Node(usize),
    /// A directed edge.  Every edge component is placed on its own parallel
    /// edge, so two components between the same vertices occupy distinct
    /// multi-edges.
    Edge {
        /// Source vertex id.
        from: usize,
        /// Destination vertex id.
        to: usize,
    },
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Node(node) => write!(f, "node {node}"),
            Self::Edge { from, to } => write!(f, "edge ({from}, {to})"),
        }
    }
}

/// The characterization of a component or source: where its output
/// distribution comes from.
#[derive(Clone)]
pub enum Behavior {
    /// A precomputed distribution.
    Ugf(Ugf),
    /// A solved state-transition diagram; the distribution is derived from
    /// its terminal state probabilities on demand.
    Std(SolvedStd),
    /// The element behaves as the solved output of a user of a nested
    /// network.
    Network {
        /// The nested network.
        network: NetworkRef,
        /// Index of the user within the nested network.
        user: usize,
    },
    /// No characterization: the element is unconstrained and resolves to a
    /// single state at the measure's ceiling.
    None,
}

/// A component record: a transport element placed on a vertex or an edge.
#[derive(Clone)]
pub(crate) struct Component {
    pub(crate) location: Location,
    pub(crate) behavior: Behavior,
    /// Evaluation-dependent group this component belongs to, if any.  All
    /// members of a group share one joint state index at evaluation time.
    pub(crate) eval_group: Option<String>,
}

/// A source record: an element injecting performance at a vertex.
#[derive(Clone)]
pub(crate) struct Source {
    pub(crate) node: usize,
    pub(crate) behavior: Behavior,
    /// Fully correlated with every other dependent source (e.g. co-located
    /// generators sharing one weather-driven availability state).
    pub(crate) dependent: bool,
    /// Evaluation-dependent group this source belongs to, if any.
    pub(crate) eval_group: Option<String>,
}

/// A user record: the delivery point the engine solves for.
#[derive(Clone)]
pub(crate) struct User {
    pub(crate) node: usize,
    /// Written by the solver.
    pub(crate) ugf: Option<Ugf>,
}
