// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Cutlist Core
//!
//! Scene-graph model for parametric cut-list generation.
//!
//! This crate provides the read-only assembly snapshot consumed by
//! [cutlist-engine](https://docs.rs/cutlist-engine):
//!
//! - **Scene graph**: arena-based node storage with stable
//!   [slotmap](https://docs.rs/slotmap) keys and structural parent links
//! - **Node kinds**: a tagged union over parts, containers and
//!   transform nodes
//! - **Profiles**: sketch edge lengths and geometric constraints
//! - **Units**: millimeter-native conversion tables for report output
//!
//! ## Quick Start
//!
//! ```rust
//! use cutlist_core::{Node, NodeKind, SceneGraph};
//!
//! let mut scene = SceneGraph::new();
//! let cabinet = scene.add_root(Node::new("Cabinet", NodeKind::Group { children: vec![] }));
//! let shelf = scene.add(Node::new(
//!     "Shelf",
//!     NodeKind::Box { width: 18.0, height: 400.0, length: 600.0 },
//! ));
//! scene.attach(cabinet, shelf).unwrap();
//!
//! assert_eq!(scene.roots().len(), 1);
//! assert_eq!(scene.group_label(shelf).as_deref(), Some("Cabinet"));
//! ```

pub mod error;
pub mod profile;
pub mod scene;
pub mod shape;
pub mod units;

pub use error::{Error, Result};
pub use profile::{Constraint, ConstraintKind, Profile};
pub use scene::{
    box_shape, ArrayKind, CloneTarget, CutRole, DepthMode, Node, NodeKey, NodeKind, SceneGraph,
    SubTransform,
};
pub use shape::{Appearance, Color, Grain, ShapeData};
pub use units::{format_rounded, AreaUnit, LengthUnit};
