// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cut-list engine: scans a [`cutlist_core::SceneGraph`] assembly and
//! aggregates part dimensions into a bill of materials.
//!
//! The scan walks the root object list, expands transform nodes
//! (arrays, mirrors, patterns, clones, links) into logical instances,
//! canonicalizes every instance's dimensions into an order-independent
//! key and accumulates quantity, area and edge totals per key. The
//! result renders into any [`report::ReportSink`].
//!
//! ```
//! use cutlist_core::{Node, NodeKind, SceneGraph};
//! use cutlist_engine::{scan, ScanConfig};
//!
//! let mut scene = SceneGraph::new();
//! scene.add_root(Node::new(
//!     "Shelf",
//!     NodeKind::Box { width: 18.0, height: 400.0, length: 600.0 },
//! ));
//!
//! let agg = scan(&scene, &ScanConfig::default()).unwrap();
//! assert_eq!(agg.dimensions.len(), 1);
//! ```

pub mod aggregate;
pub mod config;
pub mod constraints;
pub mod edgeband;
pub mod error;
mod expand;
pub mod extract;
pub mod extras;
pub mod keys;
pub mod report;
mod scan;
pub mod visibility;

pub use aggregate::{
    Aggregates, ConstraintEntry, Diagnostics, DimensionEntry, EdgeBandRecord, EdgeTotals,
    ExtraEntry, ExtraValue, FaceTag, LengthHeader, ThicknessEntry,
};
pub use config::{CutContent, ReportMode, ScanConfig, SubReports, VisibilityPolicy};
pub use error::{Error, Result};
pub use extract::Extracted;
pub use keys::{canonicalize, Dim, DimensionKey};
pub use report::{write_cutlist, CellAddr, CellRange, ReportSink, Style};
pub use scan::scan;
