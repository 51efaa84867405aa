// License: MIT
// Copyright © 2026 multistate-net contributors

/*!
# Multi-State Network Reliability Engine

This is a library for evaluating the delivered performance (power, flow, ...)
of a *multi-state network*: a directed multigraph of sources, components and
users, where every source and component is characterized by a discrete
probability distribution over its possible output levels.

For every user in the network, the engine computes the probability
distribution of the performance that user actually receives, accounting for
the topology (series, parallel and bridge connectivity), partial correlation
between elements, and nested sub-networks.

## The UGF

The common currency of the library is the [`Ugf`] (Universal Generating
Function): two parallel sequences of unique, sorted values and matching
probabilities over one scalar [`Measure`].  UGFs enter the network either
directly, from a solved state-transition diagram ([`SolvedStd`], the contract
with an external stochastic-process solver), or from the solved user of a
nested [`Network`].

## Building a network

A [`Network`] starts empty and is populated incrementally:

- [`add_component`][Network::add_component] places a component on a vertex or
  on an edge (parallel edges are allowed — every edge component gets its own
  multi-edge).
- [`add_source`][Network::add_source] and [`add_user`][Network::add_user]
  place sources and users on vertices.
- [`add_bidirectional_component`][Network::add_bidirectional_component] adds
  the two directions of one physical link as an evaluation-dependent pair.
- [`add_dependent_source`][Network::add_dependent_source] adds a fully
  correlated source (e.g. co-located wind turbines sharing one weather
  state).

## Solving

[`solve`] derives, per user, a structure function from the multigraph via
path enumeration and parallel/series/bridge reduction, evaluates it over the
joint probability space of all elements, and writes the resulting [`Ugf`]
back into the user record.  Nested sub-networks are solved bottom-up first.

Scalar summaries of a solved user (expected shortfall, availability) live in
the [`indices`] module.
*/

mod error;
pub use error::Error;

mod measure;
pub use measure::{Measure, MeasureRegistry};

mod ugf;
pub use ugf::Ugf;

mod stochastic;
pub use stochastic::SolvedStd;

mod network;
pub use network::{Behavior, Location, Network, NetworkRef};

mod solve;
pub use solve::{solve, solve_with};

pub mod indices;

#[cfg(test)]
pub(crate) mod test_utils;
