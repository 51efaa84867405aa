// License: MIT
// Copyright © 2026 multistate-net contributors

//! Algebraic reduction of the enumerated supply routes into one structure
//! function.
//!
//! Three rules are applied until a single component path remains: parallel
//! reduction (identical node-paths merge with `+`), series reduction
//! (locally unique vertex runs collapse into `min`), and bridge reduction
//! (the Wheatstone pattern of two swapped long paths and their two short
//! sub-paths collapses into an imbalance-indicator term).  Every rule
//! strictly shrinks the route set, so the loop terminates; if no rule
//! applies while more than one route remains, the topology is outside the
//! supported series-parallel-bridge class and solving fails loudly.

use std::collections::HashMap;

use super::expr::Expr;
use super::paths::ComponentPath;
use crate::Error;

/// Reduces the component paths of one user to its structure function.
pub(crate) fn reduce_to_structure(mut paths: Vec<ComponentPath>) -> Result<Expr, Error> {
    while paths.len() > 1 {
        if reduce_parallel(&mut paths) {
            continue;
        }
        if reduce_series(&mut paths) {
            continue;
        }
        if reduce_bridge(&mut paths) {
            continue;
        }
        return Err(Error::unsupported_topology(
            "No parallel, series or bridge reduction applies to the remaining supply routes.",
        ));
    }

    let path = paths
        .pop()
        .ok_or_else(|| Error::internal("Reduction ran on an empty route set."))?;
    Ok(Expr::min(path.exprs))
}

/// Merges one group of routes with identical node-paths, position by
/// position: identical entries are deduplicated, the rest combine with `+`.
fn reduce_parallel(paths: &mut Vec<ComponentPath>) -> bool {
    let mut group: Vec<usize> = Vec::new();
    'search: for i in 0..paths.len() {
        for j in i + 1..paths.len() {
            if paths[j].nodes == paths[i].nodes {
                group = (i..paths.len())
                    .filter(|&k| paths[k].nodes == paths[i].nodes)
                    .collect();
                break 'search;
            }
        }
    }
    if group.is_empty() {
        return false;
    }

    let positions = paths[group[0]].exprs.len();
    let mut merged = Vec::with_capacity(positions);
    for position in 0..positions {
        let mut entries: Vec<Expr> = Vec::new();
        for &member in &group {
            let entry = &paths[member].exprs[position];
            if !entries.contains(entry) {
                entries.push(entry.clone());
            }
        }
        merged.push(Expr::sum(entries));
    }

    let nodes = paths[group[0]].nodes.clone();
    for &member in group.iter().rev() {
        paths.remove(member);
    }
    paths.push(ComponentPath {
        nodes,
        exprs: merged,
    });
    true
}

/// Collapses the longest run of locally unique interior vertices into one
/// `min` term.
///
/// A vertex is locally unique when every interior occurrence across all
/// routes has the same predecessor and successor; chaining overlapping
/// windows first avoids redundant partial collapses.
fn reduce_series(paths: &mut Vec<ComponentPath>) -> bool {
    // Interior vertex -> its (predecessor, successor) window, or None once
    // two different windows have been seen.
    let mut windows: HashMap<usize, Option<(usize, usize)>> = HashMap::new();
    for path in paths.iter() {
        for position in 1..path.nodes.len().saturating_sub(1) {
            let window = (path.nodes[position - 1], path.nodes[position + 1]);
            windows
                .entry(path.nodes[position])
                .and_modify(|entry| {
                    if *entry != Some(window) {
                        *entry = None;
                    }
                })
                .or_insert(Some(window));
        }
    }

    let collapsible = |vertex: usize| windows.get(&vertex).copied().flatten();

    // Deterministic pick: the first collapsible interior vertex in route
    // order.
    let mut seed = None;
    'search: for path in paths.iter() {
        for position in 1..path.nodes.len().saturating_sub(1) {
            let vertex = path.nodes[position];
            if let Some(window) = collapsible(vertex) {
                seed = Some((vertex, window));
                break 'search;
            }
        }
    }
    let Some((seed, (mut start, mut end))) = seed else {
        return false;
    };

    // Chain overlapping windows into the longest collapsible run.
    let mut interior = vec![seed];
    while let Some((_, next)) = collapsible(end) {
        interior.push(end);
        end = next;
    }
    while let Some((previous, _)) = collapsible(start) {
        interior.insert(0, start);
        start = previous;
    }

    for path in paths.iter_mut() {
        let Some(position) = path.nodes.iter().position(|&n| n == interior[0]) else {
            continue;
        };
        // Any route containing the first interior vertex contains the whole
        // run, since each window fixes both neighbors.
        let first = position - 1;
        let last = position + interior.len();
        let merged = Expr::min(path.exprs[first..last].to_vec());
        path.exprs.splice(first..last, [merged]);
        path.nodes.drain(first + 1..last);
    }
    true
}

/// Collapses one Wheatstone bridge: two equal-length routes whose node-paths
/// differ in exactly two adjacent, transposed positions, plus the two short
/// routes obtained by dropping either swapped vertex.
///
/// The diagonal only carries flow when the branch imbalance has the matching
/// sign; the emitted term is the exact max-flow of the bridge:
/// `min(A,C) + min(B,D) + max(0, min(A−C, D−B, E→)) + max(0, min(C−A, B−D, E←))`.
fn reduce_bridge(paths: &mut Vec<ComponentPath>) -> bool {
    for left in 0..paths.len() {
        for right in left + 1..paths.len() {
            let Some(i) = swapped_position(&paths[left], &paths[right]) else {
                continue;
            };

            let mut short_left_nodes = paths[left].nodes.clone();
            short_left_nodes.remove(i + 1);
            let mut short_right_nodes = paths[left].nodes.clone();
            short_right_nodes.remove(i);
            let Some(short_left) = paths.iter().position(|p| p.nodes == short_left_nodes)
            else {
                continue;
            };
            let Some(short_right) = paths.iter().position(|p| p.nodes == short_right_nodes)
            else {
                continue;
            };

            let a_in = paths[left].exprs[i - 1].clone();
            let diagonal_fwd = paths[left].exprs[i].clone();
            let d_out = paths[left].exprs[i + 1].clone();
            let b_in = paths[right].exprs[i - 1].clone();
            let diagonal_rev = paths[right].exprs[i].clone();
            let c_out = paths[right].exprs[i + 1].clone();

            // The four routes must agree outside the bridge window.
            let prefix = &paths[left].exprs[..i - 1];
            let suffix = &paths[left].exprs[i + 2..];
            let consistent = paths[right].exprs[..i - 1] == *prefix
                && paths[right].exprs[i + 2..] == *suffix
                && paths[short_left].exprs[..i - 1] == *prefix
                && paths[short_left].exprs[i + 1..] == *suffix
                && paths[short_right].exprs[..i - 1] == *prefix
                && paths[short_right].exprs[i + 1..] == *suffix
                && paths[short_left].exprs[i - 1] == a_in
                && paths[short_left].exprs[i] == c_out
                && paths[short_right].exprs[i - 1] == b_in
                && paths[short_right].exprs[i] == d_out;
            if !consistent {
                continue;
            }

            let straight = Expr::min(vec![a_in.clone(), c_out.clone()])
                + Expr::min(vec![b_in.clone(), d_out.clone()]);
            let forward = Expr::clamp_non_negative(Expr::min(vec![
                a_in.clone() - c_out.clone(),
                d_out.clone() - b_in.clone(),
                diagonal_fwd,
            ]));
            let reverse = Expr::clamp_non_negative(Expr::min(vec![
                c_out - a_in,
                b_in - d_out,
                diagonal_rev,
            ]));
            let bridge = straight + forward + reverse;

            let mut nodes = paths[left].nodes.clone();
            nodes.drain(i..=i + 1);
            let mut exprs = paths[left].exprs[..i - 1].to_vec();
            exprs.push(bridge);
            exprs.extend_from_slice(&paths[left].exprs[i + 2..]);

            let mut removed = [left, right, short_left, short_right];
            removed.sort_unstable();
            for &member in removed.iter().rev() {
                paths.remove(member);
            }
            paths.push(ComponentPath { nodes, exprs });
            return true;
        }
    }
    false
}

/// Returns the position of the swap when the two node-paths have equal
/// length and differ in exactly two adjacent positions with transposed
/// values.
fn swapped_position(p: &ComponentPath, q: &ComponentPath) -> Option<usize> {
    if p.nodes.len() != q.nodes.len() {
        return None;
    }
    let mut diffs = p
        .nodes
        .iter()
        .zip(&q.nodes)
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(i, _)| i);
    let (first, second) = (diffs.next()?, diffs.next()?);
    if diffs.next().is_some() {
        return None;
    }
    (second == first + 1
        && p.nodes[first] == q.nodes[second]
        && p.nodes[second] == q.nodes[first])
        .then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solve::paths::{component_leaf, enumerate_paths, source_leaf};
    use crate::test_utils::assert_close;
    use crate::{Behavior, Location, Measure, Network, Ugf};

    fn two_state() -> Ugf {
        Ugf::reduce(Measure::Power, vec![0.0, 1.0], vec![0.1, 0.9]).unwrap()
    }

    fn edge(from: usize, to: usize) -> Location {
        Location::Edge { from, to }
    }

    #[test]
    fn test_series_parallel_reduction() -> Result<(), Error> {
        let mut ntw = Network::new();
        ntw.add_source(0, Behavior::None);
        let a = ntw.add_component(edge(0, 1), Behavior::Ugf(two_state()))?;
        let b = ntw.add_component(edge(0, 1), Behavior::Ugf(two_state()))?;
        let c = ntw.add_component(edge(1, 2), Behavior::Ugf(two_state()))?;
        ntw.add_user(2);

        let expr = reduce_to_structure(enumerate_paths(&ntw, 2))?;
        assert_eq!(
            expr,
            Expr::min(vec![
                Expr::val(source_leaf(&ntw, 0)),
                Expr::val(component_leaf(a)) + Expr::val(component_leaf(b)),
                Expr::val(component_leaf(c)),
            ])
        );
        Ok(())
    }

    #[test]
    fn test_two_sources_merge() -> Result<(), Error> {
        let mut ntw = Network::new();
        ntw.add_source(1, Behavior::None);
        ntw.add_source(2, Behavior::None);
        let a = ntw.add_component(edge(1, 3), Behavior::Ugf(two_state()))?;
        let b = ntw.add_component(edge(2, 3), Behavior::Ugf(two_state()))?;
        ntw.add_user(3);

        let expr = reduce_to_structure(enumerate_paths(&ntw, 3))?;
        assert_eq!(
            expr,
            Expr::sum(vec![
                Expr::min(vec![
                    Expr::val(source_leaf(&ntw, 0)),
                    Expr::val(component_leaf(a)),
                ]),
                Expr::min(vec![
                    Expr::val(source_leaf(&ntw, 1)),
                    Expr::val(component_leaf(b)),
                ]),
            ])
        );
        Ok(())
    }

    #[test]
    fn test_shared_node_component_deduplicated() -> Result<(), Error> {
        // Two parallel edges reconverging on a vertex component: the
        // component appears once in the structure, not once per route.
        let mut ntw = Network::new();
        ntw.add_source(0, Behavior::None);
        let a = ntw.add_component(edge(0, 1), Behavior::Ugf(two_state()))?;
        let b = ntw.add_component(edge(0, 1), Behavior::Ugf(two_state()))?;
        let cap = ntw.add_component(Location::Node(1), Behavior::Ugf(two_state()))?;
        ntw.add_user(1);

        let expr = reduce_to_structure(enumerate_paths(&ntw, 1))?;
        assert_eq!(
            expr,
            Expr::min(vec![
                Expr::val(source_leaf(&ntw, 0)),
                Expr::val(component_leaf(a)) + Expr::val(component_leaf(b)),
                Expr::val(component_leaf(cap)),
            ])
        );
        Ok(())
    }

    #[test]
    fn test_bridge_collapses_to_max_flow() -> Result<(), Error> {
        let mut ntw = Network::new();
        ntw.add_source(1, Behavior::None);
        let a = ntw.add_component(edge(1, 2), Behavior::Ugf(two_state()))?;
        let b = ntw.add_component(edge(1, 3), Behavior::Ugf(two_state()))?;
        let c = ntw.add_component(edge(2, 4), Behavior::Ugf(two_state()))?;
        let d = ntw.add_component(edge(3, 4), Behavior::Ugf(two_state()))?;
        let (e_fwd, e_rev) = ntw.add_bidirectional_component(2, 3, two_state())?;
        ntw.add_user(4);

        let expr = reduce_to_structure(enumerate_paths(&ntw, 4))?;

        // Evaluate the collapsed expression against hand-computed max flows.
        let mut leaves = vec![0.0; ntw.num_components() + 1];
        let source = source_leaf(&ntw, 0);
        let mut check = |caps: [f64; 5], expected: f64| {
            leaves[component_leaf(a)] = caps[0];
            leaves[component_leaf(b)] = caps[1];
            leaves[component_leaf(c)] = caps[2];
            leaves[component_leaf(d)] = caps[3];
            leaves[component_leaf(e_fwd)] = caps[4];
            leaves[component_leaf(e_rev)] = caps[4];
            leaves[source] = f64::INFINITY;
            assert_close(expr.eval(&leaves), expected);
        };

        check([1.0, 1.0, 1.0, 1.0, 1.0], 2.0);
        check([1.0, 0.0, 0.0, 1.0, 1.0], 1.0); // only the crossing route
        check([1.0, 1.0, 1.0, 1.0, 0.0], 2.0); // bridge not needed
        check([0.0, 5.0, 5.0, 0.0, 3.0], 3.0); // reverse crossing, capped by E
        check([3.0, 2.0, 1.0, 4.0, 1.0], 4.0);
        check([5.0, 1.0, 1.0, 5.0, 10.0], 6.0);
        check([0.0, 0.0, 1.0, 1.0, 1.0], 0.0);
        Ok(())
    }

    #[test]
    fn test_bridge_tolerates_unconstrained_branches() -> Result<(), Error> {
        // Unbounded branch capacities make the bridge subtraction terms
        // indeterminate; `f64::min`/`f64::max` return the other argument
        // there, and the dominating straight term keeps the result exact.
        let mut ntw = Network::new();
        ntw.add_source(1, Behavior::None);
        let a = ntw.add_component(edge(1, 2), Behavior::Ugf(two_state()))?;
        let b = ntw.add_component(edge(1, 3), Behavior::Ugf(two_state()))?;
        let c = ntw.add_component(edge(2, 4), Behavior::Ugf(two_state()))?;
        let d = ntw.add_component(edge(3, 4), Behavior::Ugf(two_state()))?;
        let (e_fwd, e_rev) = ntw.add_bidirectional_component(2, 3, two_state())?;
        ntw.add_user(4);

        let expr = reduce_to_structure(enumerate_paths(&ntw, 4))?;
        let mut leaves = vec![0.0; ntw.num_components() + 1];
        leaves[source_leaf(&ntw, 0)] = f64::INFINITY;
        let mut check = |caps: [f64; 6], expected: f64| {
            leaves[component_leaf(a)] = caps[0];
            leaves[component_leaf(b)] = caps[1];
            leaves[component_leaf(c)] = caps[2];
            leaves[component_leaf(d)] = caps[3];
            leaves[component_leaf(e_fwd)] = caps[4];
            leaves[component_leaf(e_rev)] = caps[5];
            assert_eq!(expr.eval(&leaves), expected);
        };

        let inf = f64::INFINITY;
        // One fully unbounded side: delivery is unbounded too.
        check([inf, 1.0, inf, 5.0, 10.0, 10.0], inf);
        check([2.0, inf, 3.0, inf, 0.0, 0.0], inf);
        // One unbounded branch per side stays finite and exact.
        check([inf, 1.0, 1.0, inf, 0.0, 0.0], 2.0);
        check([inf, 1.0, 1.0, inf, 4.0, 4.0], 6.0);
        Ok(())
    }

    #[test]
    fn test_unsupported_topology_is_a_hard_error() -> Result<(), Error> {
        // Three branches with two diagonals into the middle one: outside the
        // series-parallel-bridge class.
        let mut ntw = Network::new();
        ntw.add_source(1, Behavior::None);
        for (from, to) in [(1, 2), (1, 3), (1, 4), (2, 5), (3, 5), (4, 5), (2, 3), (4, 3)] {
            ntw.add_component(edge(from, to), Behavior::Ugf(two_state()))?;
        }
        ntw.add_user(5);

        assert_eq!(
            reduce_to_structure(enumerate_paths(&ntw, 5)),
            Err(Error::unsupported_topology(
                "No parallel, series or bridge reduction applies to the remaining supply routes.",
            ))
        );
        Ok(())
    }

    #[test]
    fn test_empty_route_set_is_internal_error() {
        assert!(reduce_to_structure(Vec::new()).is_err());
    }
}
