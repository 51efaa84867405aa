// License: MIT
// Copyright © 2026 multistate-net contributors

//! The solve orchestrator.
//!
//! Solving a network is a pipeline per user: enumerate the supply routes
//! ([`paths`]), reduce them to a structure function ([`reduction`]), weigh
//! the function over the joint probability space of all elements
//! ([`composition`]) and write the resulting UGF into the user record.
//! Nested sub-networks are solved first, innermost out, so that every
//! network reference resolves to a finished result.  Solving an
//! already-solved network is a no-op.

mod composition;
mod expr;
mod paths;
mod reduction;

use crate::{Behavior, Error, Measure, MeasureRegistry, Network, Ugf};

/// Solves the network with unbounded measure ceilings.
pub fn solve(ntw: &mut Network) -> Result<(), Error> {
    solve_with(ntw, &MeasureRegistry::new())
}

/// Solves the network, drawing the output of uncharacterized elements from
/// the given registry.
///
/// All nested sub-networks are solved first; sub-networks referenced from
/// several places are solved once.
pub fn solve_with(ntw: &mut Network, registry: &MeasureRegistry) -> Result<(), Error> {
    for subnetwork in ntw.collect_subnetworks()? {
        let mut subnetwork = subnetwork.borrow_mut();
        if !subnetwork.solved {
            solve_single(&mut subnetwork, registry)?;
        }
    }
    if !ntw.solved {
        solve_single(ntw, registry)?;
    }
    Ok(())
}

fn solve_single(ntw: &mut Network, registry: &MeasureRegistry) -> Result<(), Error> {
    let measure = detect_measure(ntw)?;
    let resolved = resolve_behaviors(ntw, measure, registry)?;
    let space = composition::build_space(ntw, &resolved)?;

    let mut results = Vec::with_capacity(ntw.users.len());
    for (index, user) in ntw.users.iter().enumerate() {
        let routes = paths::enumerate_paths(ntw, user.node);
        if routes.is_empty() {
            return Err(Error::topology(format!(
                "User {index} at vertex {} has no supply route.",
                user.node
            )));
        }
        let structure = reduction::reduce_to_structure(routes)?;
        tracing::debug!(user = index, structure = %structure, "derived structure function");

        results.push(space.evaluate(&structure, measure)?);
    }

    for (user, ugf) in ntw.users.iter_mut().zip(results) {
        user.ugf = Some(ugf);
    }
    ntw.solved = true;
    Ok(())
}

/// The single measure all characterized elements of the network agree on.
fn detect_measure(ntw: &Network) -> Result<Measure, Error> {
    let mut detected: Option<Measure> = None;
    for behavior in ntw.behaviors() {
        let measure = match behavior {
            Behavior::Ugf(ugf) => ugf.measure(),
            Behavior::Std(std) => std.measure(),
            Behavior::Network { network, user } => network.borrow().user_ugf(*user)?.measure(),
            Behavior::None => continue,
        };
        match detected {
            None => detected = Some(measure),
            Some(previous) if previous != measure => {
                return Err(Error::configuration(format!(
                    "Elements disagree on the measure: {previous} vs {measure}."
                )));
            }
            Some(_) => {}
        }
    }
    detected.ok_or_else(|| Error::configuration("No element defines a measure.".to_string()))
}

/// One UGF per leaf, components first, then sources.
fn resolve_behaviors(
    ntw: &Network,
    measure: Measure,
    registry: &MeasureRegistry,
) -> Result<Vec<Ugf>, Error> {
    ntw.behaviors()
        .map(|behavior| match behavior {
            Behavior::Ugf(ugf) => Ok(ugf.clone()),
            Behavior::Std(std) => Ugf::from_solved_std(std),
            Behavior::Network { network, user } => Ok(network.borrow().user_ugf(*user)?.clone()),
            Behavior::None => Ok(Ugf::unconstrained(measure, registry.ceiling(measure))),
        })
        .collect()
}
