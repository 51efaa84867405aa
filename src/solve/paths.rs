// License: MIT
// Copyright © 2026 multistate-net contributors

//! Path enumeration over the extended graph.
//!
//! For one user, an extended graph is built: a virtual vertex is connected
//! to every source vertex so that all supply routes share a common start,
//! and every vertex hosting components is split into an entry vertex and an
//! exit twin, with the twin edge carrying the vertex components.  The split
//! gives node components a path position of their own, so routes that fan
//! out over parallel edges and reconverge on the vertex still share one
//! entry for it.  Every simple node-path from the virtual vertex to the
//! user's exit is then expanded into one component path per combination of
//! parallel-edge choices along it.

use itertools::Itertools;
use petgraph::algo::all_simple_paths;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeSet, HashMap};

use super::expr::Expr;
use crate::Network;

/// Sentinel vertex id for the virtual source vertex.
pub(crate) const VIRTUAL: usize = usize::MAX;

/// One supply route: a node-path (starting at [`VIRTUAL`]) and the leaf
/// expressions traversed along it.
///
/// `exprs[i]` is the entry of the hop from `nodes[i]` to `nodes[i + 1]`:
/// the source leaf for the first hop, the components of the chosen parallel
/// edge for a graph hop, or the components of a vertex for the hop onto its
/// exit twin.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ComponentPath {
    pub(crate) nodes: Vec<usize>,
    pub(crate) exprs: Vec<Expr>,
}

/// Leaf id of a component record.
pub(crate) fn component_leaf(index: usize) -> usize {
    index
}

/// Leaf id of a source record.  Sources follow the components in the leaf
/// space.
pub(crate) fn source_leaf(ntw: &Network, index: usize) -> usize {
    ntw.components.len() + index
}

/// Enumerates every component path from any source to the given user vertex.
pub(crate) fn enumerate_paths(ntw: &Network, user_node: usize) -> Vec<ComponentPath> {
    let extended = ExtendedGraph::build(ntw);

    // Parallel edges make the enumeration repeat node sequences; the
    // per-hop choices are expanded separately below.
    let node_paths: BTreeSet<Vec<NodeIndex>> = all_simple_paths::<Vec<NodeIndex>, _>(
        &extended.graph,
        extended.virtual_vertex,
        extended.exit(user_node),
        0,
        None,
    )
    .collect();

    let mut paths = Vec::new();
    for node_path in node_paths {
        let choices: Vec<Vec<Expr>> = node_path
            .windows(2)
            .map(|hop| extended.hop_entries(hop[0], hop[1]))
            .collect();
        let nodes: Vec<usize> = node_path
            .iter()
            .map(|&vertex| extended.vertex_id(vertex))
            .collect();

        for exprs in choices.into_iter().multi_cartesian_product() {
            paths.push(ComponentPath {
                nodes: nodes.clone(),
                exprs,
            });
        }
    }
    paths
}

/// The extended graph of one enumeration: split vertices, a virtual source
/// vertex, and one leaf entry per edge.
struct ExtendedGraph {
    graph: DiGraph<(), ()>,
    virtual_vertex: NodeIndex,
    exits: HashMap<usize, NodeIndex>,
    entries: HashMap<EdgeIndex, Expr>,
}

impl ExtendedGraph {
    fn build(ntw: &Network) -> Self {
        let mut graph = DiGraph::new();
        for _ in 0..ntw.graph.node_count() {
            graph.add_node(());
        }

        // Split every vertex hosting components: incoming edges keep the
        // original vertex, outgoing edges leave from the exit twin, and the
        // twin edge carries the vertex components.
        let mut exits = HashMap::new();
        let mut entries = HashMap::new();
        let mut split_vertices: Vec<usize> = ntw.vertex_components.keys().copied().collect();
        split_vertices.sort_unstable();
        for vertex in split_vertices {
            let twin = graph.add_node(());
            let edge = graph.add_edge(NodeIndex::new(vertex), twin, ());
            entries.insert(edge, vertex_entry(ntw, vertex));
            exits.insert(vertex, twin);
        }

        for edge in ntw.graph.edge_references() {
            let from = exits
                .get(&edge.source().index())
                .copied()
                .unwrap_or_else(|| edge.source());
            let added = graph.add_edge(from, edge.target(), ());
            entries.insert(added, edge_entry(ntw, edge.id()));
        }

        let virtual_vertex = graph.add_node(());
        for (index, source) in ntw.sources.iter().enumerate() {
            let edge = graph.add_edge(virtual_vertex, NodeIndex::new(source.node), ());
            entries.insert(edge, Expr::val(source_leaf(ntw, index)));
        }

        Self {
            graph,
            virtual_vertex,
            exits,
            entries,
        }
    }

    /// Where a route through the vertex ends up: the exit twin if the vertex
    /// hosts components, the vertex itself otherwise.
    fn exit(&self, vertex: usize) -> NodeIndex {
        self.exits
            .get(&vertex)
            .copied()
            .unwrap_or_else(|| NodeIndex::new(vertex))
    }

    /// One entry per parallel extended edge between the two vertices.
    fn hop_entries(&self, from: NodeIndex, to: NodeIndex) -> Vec<Expr> {
        let mut edges: Vec<EdgeIndex> = self
            .graph
            .edges_connecting(from, to)
            .map(|edge| edge.id())
            .collect();
        edges.sort_unstable();
        edges
            .iter()
            .filter_map(|edge| self.entries.get(edge).cloned())
            .collect()
    }

    fn vertex_id(&self, vertex: NodeIndex) -> usize {
        if vertex == self.virtual_vertex {
            VIRTUAL
        } else {
            vertex.index()
        }
    }
}

/// The components placed on a vertex, in series.
fn vertex_entry(ntw: &Network, vertex: usize) -> Expr {
    Expr::min(
        ntw.vertex_components
            .get(&vertex)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&index| Expr::val(component_leaf(index)))
                    .collect()
            })
            .unwrap_or_default(),
    )
}

/// The components placed on one multigraph edge, in series.
fn edge_entry(ntw: &Network, edge: EdgeIndex) -> Expr {
    Expr::min(
        ntw.edge_components
            .get(&edge)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&index| Expr::val(component_leaf(index)))
                    .collect()
            })
            .unwrap_or_default(),
    )
}
