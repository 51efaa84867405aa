// License: MIT
// Copyright © 2026 multistate-net contributors

//! Accessors for the registries and solved results of a [`Network`].

use crate::{Error, Network, Ugf};

/// Element and result retrieval.
impl Network {
    /// Returns `true` once [`solve`][crate::solve] has written results into
    /// the user records.
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// The number of component records.
    pub fn num_components(&self) -> usize {
        self.components.len()
    }

    /// The number of source records.
    pub fn num_sources(&self) -> usize {
        self.sources.len()
    }

    /// The number of user records.
    pub fn num_users(&self) -> usize {
        self.users.len()
    }

    /// The number of vertices the graph has grown to.
    pub fn num_vertices(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the solved output distribution of the user with the given
    /// index.
    ///
    /// Returns an error if the index is out of range or the network has not
    /// been solved yet.
    pub fn user_ugf(&self, user: usize) -> Result<&Ugf, Error> {
        let record = self.users.get(user).ok_or_else(|| {
            Error::element_not_found(format!("User with index {user} not found."))
        })?;
        record.ugf.as_ref().ok_or_else(|| {
            Error::configuration(format!(
                "User {user} has no result yet; the network is not solved."
            ))
        })
    }
}
