// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dimension extraction for part instances.
//!
//! Exact extractors read a part's defining parameters; the
//! approximation path falls back to bounding-box extents when no
//! exact extractor applies. Extraction faults never cross an instance
//! boundary: they become [`Extracted::Failed`] and the scan moves on.

use cutlist_core::{Node, NodeKind};

use crate::keys::axis_extent;

/// Outcome of a fault-isolated extraction step.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted<T> {
    Value(T),
    /// No extractor applies to this node kind; not an error.
    Skip,
    /// Expected data was missing or malformed; recorded as a
    /// diagnostic, instance skipped.
    Failed(String),
}

/// Reads the three characteristic lengths of a box part.
pub fn box_dimensions(node: &Node) -> Extracted<[f64; 3]> {
    match node.kind {
        NodeKind::Box {
            width,
            height,
            length,
        } => Extracted::Value([width, height, length]),
        _ => Extracted::Skip,
    }
}

/// Reads an extruded part's dimensions: the first two profile edge
/// lengths plus the extrusion length.
pub fn extrusion_dimensions(node: &Node) -> Extracted<[f64; 3]> {
    match &node.kind {
        NodeKind::Extrusion {
            profile, length, ..
        } => {
            let (Some(&e0), Some(&e1)) = (profile.edges.first(), profile.edges.get(1)) else {
                return Extracted::Failed(format!(
                    "{}: profile has fewer than two edges",
                    node.label
                ));
            };
            Extracted::Value([e0, e1, *length])
        }
        _ => Extracted::Skip,
    }
}

/// Bounding-box approximation: per-axis extents of the vertex cloud,
/// rounded to two decimals. Degenerate extents are rejected.
pub fn approximate_dimensions(node: &Node) -> Extracted<[f64; 3]> {
    let Some(shape) = &node.shape else {
        return Extracted::Failed(format!(
            "{}: no exact vertex values to calculate dimensions",
            node.label
        ));
    };
    let Some((min, max)) = shape.bounds() else {
        return Extracted::Failed(format!("{}: empty vertex cloud", node.label));
    };
    let dims = [
        round2(axis_extent(min[0], max[0])),
        round2(axis_extent(min[1], max[1])),
        round2(axis_extent(min[2], max[2])),
    ];
    if dims.iter().any(|&d| d <= 0.0) {
        return Extracted::Failed(format!(
            "{}: degenerate extent, dimensions not meaningful",
            node.label
        ));
    }
    Extracted::Value(dims)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
