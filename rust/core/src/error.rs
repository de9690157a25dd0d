// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for scene-graph operations.

use crate::scene::NodeKey;

/// Result type alias for scene operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or querying a scene graph.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced node was not found in the arena.
    #[error("scene node not found: {0:?}")]
    NotFound(NodeKey),

    /// Attempted to attach a child to a node that has no child list.
    #[error("node {0:?} is not a container")]
    NotAContainer(NodeKey),
}
