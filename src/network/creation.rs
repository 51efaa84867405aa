// License: MIT
// Copyright © 2026 multistate-net contributors

//! Methods for populating a [`Network`] with components, sources and users.

use petgraph::graph::NodeIndex;

use crate::{Behavior, Error, Location, Network, Ugf};

use super::{Component, Source, User};

/// Element insertion.
impl Network {
    /// Adds a component at the given location.
    ///
    /// An edge location always creates a fresh parallel edge, so repeated
    /// calls with the same endpoints build up a multigraph.  The graph is
    /// grown to cover any vertex the location references.
    pub fn add_component(&mut self, location: Location, behavior: Behavior) -> Result<usize, Error> {
        self.insert_component(location, behavior, None)
    }

    /// Adds a batch of components.
    ///
    /// The two arrays must have equal length; a mismatch is rejected before
    /// the graph is touched.
    pub fn add_components(
        &mut self,
        locations: Vec<Location>,
        behaviors: Vec<Behavior>,
    ) -> Result<Vec<usize>, Error> {
        if locations.len() != behaviors.len() {
            return Err(Error::configuration(format!(
                "Batch lengths differ: {} locations vs {} behaviors.",
                locations.len(),
                behaviors.len()
            )));
        }
        for location in &locations {
            check_location(location)?;
        }
        locations
            .into_iter()
            .zip(behaviors)
            .map(|(location, behavior)| self.insert_component(location, behavior, None))
            .collect()
    }

    /// Adds a component that is a member of a named evaluation-dependent
    /// group.
    ///
    /// The UGF of such a component is a positional joint table (built with
    /// [`Ugf::raw`][crate::Ugf::raw]): at evaluation time all members of the
    /// group take the value at one shared state index, instead of being
    /// treated as independent.
    pub fn add_eval_dependent_component(
        &mut self,
        location: Location,
        ugf: Ugf,
        group: impl Into<String>,
    ) -> Result<usize, Error> {
        self.insert_component(location, Behavior::Ugf(ugf), Some(group.into()))
    }

    /// Adds both directions of one physical link as two edge components
    /// forming an evaluation-dependent group of size 2.
    ///
    /// The two directions cannot be independently available states of the
    /// same physical link, so they share one joint state index.
    pub fn add_bidirectional_component(
        &mut self,
        from: usize,
        to: usize,
        ugf: Ugf,
    ) -> Result<(usize, usize), Error> {
        let group = self.next_bidirectional_group();
        let forward = self.insert_component(
            Location::Edge { from, to },
            Behavior::Ugf(ugf.clone()),
            Some(group.clone()),
        )?;
        let reverse = self.insert_component(
            Location::Edge { from: to, to: from },
            Behavior::Ugf(ugf),
            Some(group),
        )?;
        Ok((forward, reverse))
    }

    /// Adds a source at the given vertex.  Pass [`Behavior::None`] for an
    /// unconstrained source.
    pub fn add_source(&mut self, node: usize, behavior: Behavior) -> usize {
        self.ensure_vertex(node);
        let index = self.sources.len();
        self.sources.push(Source {
            node,
            behavior,
            dependent: false,
            eval_group: None,
        });
        self.vertex_sources.entry(node).or_default().push(index);
        index
    }

    /// Adds a batch of sources.
    ///
    /// The two arrays must have equal length; a mismatch is rejected before
    /// the graph is touched.
    pub fn add_sources(
        &mut self,
        nodes: &[usize],
        behaviors: Vec<Behavior>,
    ) -> Result<Vec<usize>, Error> {
        if nodes.len() != behaviors.len() {
            return Err(Error::configuration(format!(
                "Batch lengths differ: {} nodes vs {} behaviors.",
                nodes.len(),
                behaviors.len()
            )));
        }
        Ok(nodes
            .iter()
            .zip(behaviors)
            .map(|(node, behavior)| self.add_source(*node, behavior))
            .collect())
    }

    /// Adds a fully correlated source: all dependent sources of a network
    /// share one availability state and are composed jointly against the
    /// rest of the network.
    pub fn add_dependent_source(&mut self, node: usize, ugf: Ugf) -> usize {
        let index = self.add_source(node, Behavior::Ugf(ugf));
        self.sources[index].dependent = true;
        index
    }

    /// Adds a source that is a member of a named evaluation-dependent group,
    /// the source counterpart of
    /// [`add_eval_dependent_component`][Self::add_eval_dependent_component]:
    /// its UGF is a positional joint table sharing one state index with the
    /// other members of the group.
    pub fn add_eval_dependent_source(
        &mut self,
        node: usize,
        ugf: Ugf,
        group: impl Into<String>,
    ) -> usize {
        let index = self.add_source(node, Behavior::Ugf(ugf));
        self.sources[index].eval_group = Some(group.into());
        index
    }

    /// Adds a user at the given vertex.
    pub fn add_user(&mut self, node: usize) -> usize {
        self.ensure_vertex(node);
        let index = self.users.len();
        self.users.push(User { node, ugf: None });
        index
    }

    /// Adds a batch of users.
    pub fn add_users(&mut self, nodes: &[usize]) -> Vec<usize> {
        nodes.iter().map(|node| self.add_user(*node)).collect()
    }

    fn insert_component(
        &mut self,
        location: Location,
        behavior: Behavior,
        eval_group: Option<String>,
    ) -> Result<usize, Error> {
        check_location(&location)?;

        let index = self.components.len();
        match location {
            Location::Node(node) => {
                self.ensure_vertex(node);
                self.vertex_components.entry(node).or_default().push(index);
            }
            Location::Edge { from, to } => {
                self.ensure_vertex(from.max(to));
                let edge = self
                    .graph
                    .add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
                self.edge_components.entry(edge).or_default().push(index);
            }
        }
        self.components.push(Component {
            location,
            behavior,
            eval_group,
        });
        Ok(index)
    }

    /// Grows the graph until it covers the given vertex id.
    fn ensure_vertex(&mut self, node: usize) {
        while self.graph.node_count() <= node {
            self.graph.add_node(());
        }
    }
}

fn check_location(location: &Location) -> Result<(), Error> {
    if let Location::Edge { from, to } = location {
        if from == to {
            return Err(Error::topology(format!(
                "Location ({from}, {to}): can't connect a vertex to itself."
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Measure;

    fn two_state(p_up: f64) -> Ugf {
        Ugf::reduce(Measure::Power, vec![0.0, 1.0], vec![1.0 - p_up, p_up]).unwrap()
    }

    #[test]
    fn test_graph_grows_with_locations() -> Result<(), Error> {
        let mut ntw = Network::new();
        assert_eq!(ntw.graph.node_count(), 0);

        ntw.add_component(
            Location::Edge { from: 2, to: 5 },
            Behavior::Ugf(two_state(0.9)),
        )?;
        assert_eq!(ntw.graph.node_count(), 6);
        assert_eq!(ntw.graph.edge_count(), 1);

        ntw.add_source(1, Behavior::None);
        ntw.add_user(7);
        assert_eq!(ntw.graph.node_count(), 8);
        Ok(())
    }

    #[test]
    fn test_parallel_edges_are_distinct() -> Result<(), Error> {
        let mut ntw = Network::new();
        let a = ntw.add_component(
            Location::Edge { from: 0, to: 1 },
            Behavior::Ugf(two_state(0.8)),
        )?;
        let b = ntw.add_component(
            Location::Edge { from: 0, to: 1 },
            Behavior::Ugf(two_state(0.6)),
        )?;
        assert_ne!(a, b);
        assert_eq!(ntw.graph.edge_count(), 2);
        assert_eq!(ntw.edge_components.len(), 2);
        Ok(())
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut ntw = Network::new();
        assert_eq!(
            ntw.add_component(
                Location::Edge { from: 3, to: 3 },
                Behavior::Ugf(two_state(0.9)),
            ),
            Err(Error::topology(
                "Location (3, 3): can't connect a vertex to itself."
            ))
        );
    }

    #[test]
    fn test_batch_length_mismatch_rejected_before_mutation() {
        let mut ntw = Network::new();
        let result = ntw.add_components(
            vec![
                Location::Edge { from: 0, to: 1 },
                Location::Edge { from: 1, to: 2 },
            ],
            vec![Behavior::Ugf(two_state(0.9))],
        );
        assert_eq!(
            result,
            Err(Error::configuration(
                "Batch lengths differ: 2 locations vs 1 behaviors."
            ))
        );
        assert_eq!(ntw.graph.node_count(), 0);
        assert!(ntw.components.is_empty());

        assert!(ntw
            .add_sources(&[0, 1], vec![Behavior::None])
            .is_err());
        assert!(ntw.sources.is_empty());
    }

    #[test]
    fn test_bidirectional_forms_group() -> Result<(), Error> {
        let mut ntw = Network::new();
        let (forward, reverse) = ntw.add_bidirectional_component(1, 2, two_state(0.9))?;

        let group_a = ntw.components[forward].eval_group.clone();
        let group_b = ntw.components[reverse].eval_group.clone();
        assert!(group_a.is_some());
        assert_eq!(group_a, group_b);
        assert_eq!(
            ntw.components[forward].location,
            Location::Edge { from: 1, to: 2 }
        );
        assert_eq!(
            ntw.components[reverse].location,
            Location::Edge { from: 2, to: 1 }
        );

        // A second link gets a fresh group.
        let (second, _) = ntw.add_bidirectional_component(2, 3, two_state(0.9))?;
        assert_ne!(ntw.components[second].eval_group, group_a);
        Ok(())
    }

    #[test]
    fn test_dependent_source_flag() {
        let mut ntw = Network::new();
        let independent = ntw.add_source(0, Behavior::None);
        let dependent = ntw.add_dependent_source(1, two_state(0.7));
        assert!(!ntw.sources[independent].dependent);
        assert!(ntw.sources[dependent].dependent);
    }

    #[test]
    fn test_eval_dependent_source_joins_group() {
        let mut ntw = Network::new();
        let plain = ntw.add_source(0, Behavior::None);
        let member = ntw.add_eval_dependent_source(1, two_state(0.5), "standby");
        assert_eq!(ntw.sources[plain].eval_group, None);
        assert_eq!(ntw.sources[member].eval_group.as_deref(), Some("standby"));
        assert!(!ntw.sources[member].dependent);
    }
}
