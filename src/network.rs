// License: MIT
// Copyright © 2026 multistate-net contributors

//! The multi-state network data model: a directed multigraph over integer
//! vertex ids, plus registries for the components, sources and users placed
//! on it.

mod creation;
mod elements;
mod retrieval;
mod subnetworks;

pub use elements::{Behavior, Location};
pub(crate) use elements::{Component, Source, User};

use petgraph::graph::{DiGraph, EdgeIndex};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A shared handle to a network, used for nested sub-network references.
///
/// The engine is single-threaded; interior mutability lets the solver write
/// results into a sub-network that several parent elements reference.
pub type NetworkRef = Rc<RefCell<Network>>;

/// Maps a vertex id to the indices of the element records placed on it.
///
/// A location may host several elements, e.g. two sources feeding the same
/// vertex.
pub(crate) type VertexMap = HashMap<usize, Vec<usize>>;

/// Maps a multigraph edge to the indices of the components placed on it.
///
/// Every edge component gets its own parallel edge, so the `EdgeIndex` plays
/// the role of a (from, to, multiplicity) triple.
pub(crate) type EdgeComponentMap = HashMap<EdgeIndex, Vec<usize>>;

/// A multi-state network: sources, components and users connected by a
/// directed multigraph.
///
/// A network is created empty, populated incrementally through the `add_*`
/// methods, and handed to [`solve`][crate::solve], which writes a
/// [`Ugf`][crate::Ugf] into every user record.  There is no partial re-solve
/// after a topology mutation.
pub struct Network {
    pub(crate) graph: DiGraph<(), ()>,
    pub(crate) components: Vec<Component>,
    pub(crate) sources: Vec<Source>,
    pub(crate) users: Vec<User>,
    pub(crate) vertex_components: VertexMap,
    pub(crate) edge_components: EdgeComponentMap,
    pub(crate) vertex_sources: VertexMap,
    pub(crate) solved: bool,
    next_group: u32,
}

impl Network {
    /// Creates an empty network.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            components: Vec::new(),
            sources: Vec::new(),
            users: Vec::new(),
            vertex_components: VertexMap::new(),
            edge_components: EdgeComponentMap::new(),
            vertex_sources: VertexMap::new(),
            solved: false,
            next_group: 0,
        }
    }

    /// Wraps the network in a shared handle for use as a nested sub-network.
    pub fn into_shared(self) -> NetworkRef {
        Rc::new(RefCell::new(self))
    }

    /// Allocates a fresh evaluation-dependent group name for a bidirectional
    /// link.
    pub(crate) fn next_bidirectional_group(&mut self) -> String {
        let group = format!("bidirectional-{}", self.next_group);
        self.next_group += 1;
        group
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}
