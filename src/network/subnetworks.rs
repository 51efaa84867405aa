// License: MIT
// Copyright © 2026 multistate-net contributors

//! Discovery of nested sub-networks.
//!
//! Elements may be characterized by the solved output of another network.
//! Solving must therefore happen bottom-up: innermost networks first, so
//! that every reference resolves to an already-written user record.

use std::cell::RefCell;
use std::rc::Rc;

use crate::{Behavior, Error, Network, NetworkRef};

/// Nested network traversal.
impl Network {
    /// Walks all elements with a network reference transitively and returns
    /// the referenced networks in topological order, innermost first.
    ///
    /// Networks referenced from several places appear once (pointer
    /// identity).  A cyclic reference chain is a topology error.
    pub fn collect_subnetworks(&self) -> Result<Vec<NetworkRef>, Error> {
        let mut ordered = Vec::new();
        let mut in_progress = Vec::new();
        self.visit_subnetworks(&mut ordered, &mut in_progress)?;
        Ok(ordered)
    }

    fn visit_subnetworks(
        &self,
        ordered: &mut Vec<NetworkRef>,
        in_progress: &mut Vec<*const RefCell<Network>>,
    ) -> Result<(), Error> {
        for behavior in self.behaviors() {
            if let Behavior::Network { network, .. } = behavior {
                let ptr = Rc::as_ptr(network);
                if ordered.iter().any(|seen| Rc::as_ptr(seen) == ptr) {
                    continue;
                }
                if in_progress.contains(&ptr) {
                    return Err(Error::topology(
                        "Cyclic sub-network reference detected.",
                    ));
                }
                in_progress.push(ptr);
                network.borrow().visit_subnetworks(ordered, in_progress)?;
                in_progress.pop();
                ordered.push(network.clone());
            }
        }
        Ok(())
    }

    /// Iterates over the behaviors of all components and sources.
    pub(crate) fn behaviors(&self) -> impl Iterator<Item = &Behavior> {
        self.components
            .iter()
            .map(|component| &component.behavior)
            .chain(self.sources.iter().map(|source| &source.behavior))
    }
}
