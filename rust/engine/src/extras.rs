// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Auxiliary sub-reports: measurements, mounting points, construction
//! profiles, decorations and grain direction.
//!
//! Each producer recognizes its own node kind and writes rows into
//! the shared extras table; everything else is a no-op.

use cutlist_core::{format_rounded, Grain, LengthUnit, Node, NodeKey, NodeKind, SceneGraph};

use crate::aggregate::{Aggregates, ExtraEntry, ExtraValue};
use crate::config::ScanConfig;

/// Runs every enabled producer against one node.
pub fn collect(scene: &SceneGraph, key: NodeKey, config: &ScanConfig, agg: &mut Aggregates) {
    let node = &scene[key];
    let toggles = &config.reports;
    if toggles.measurements {
        measurement(node, agg);
    }
    if toggles.mounting {
        mounting(node, config.dimension_unit, agg);
    }
    if toggles.profiles {
        profile_frame(node, config.dimension_unit, agg);
    }
    if toggles.decorations {
        decoration(node, agg);
    }
    if toggles.grain {
        grain_direction(node, agg);
    }
}

/// Named distance measurements, grouped per measurement group.
/// Repeats under the same group append to the listing.
fn measurement(node: &Node, agg: &mut Aggregates) {
    let NodeKind::Measurement {
        group,
        name,
        distance,
    } = &node.kind
    else {
        return;
    };

    let key = format!("Measurements, {group}");
    let mut names = Vec::new();
    let mut values = Vec::new();
    if let Some(existing) = agg.extras.get(&key) {
        names.clone_from(&existing.names);
        values.clone_from(&existing.values);
    }
    names.push(name.clone());
    values.push(ExtraValue::Float(*distance));

    agg.record_extra(
        key,
        ExtraEntry {
            quantity: 1,
            names,
            values,
        },
        true,
    );
}

/// Mounting points: cylinders (dowels, screws) keyed by detail text
/// plus diameter × height.
fn mounting(node: &Node, unit: LengthUnit, agg: &mut Aggregates) {
    let NodeKind::Cylinder {
        radius,
        height,
        detail,
    } = &node.kind
    else {
        return;
    };

    let diameter = 2.0 * radius;
    let key = format!(
        "Mounting, {detail}, {} x {}",
        format_rounded(diameter, 1),
        unit.format(*height)
    );
    agg.record_extra(
        key,
        ExtraEntry {
            quantity: 1,
            names: vec!["Diameter".into(), "Length".into()],
            values: vec![ExtraValue::Float(diameter), ExtraValue::Length(*height)],
        },
        false,
    );
}

/// Construction profile frames: wall thickness plus sorted outer
/// dimensions.
fn profile_frame(node: &Node, unit: LengthUnit, agg: &mut Aggregates) {
    let NodeKind::ProfileFrame { wall, dims } = &node.kind else {
        return;
    };

    let mut sorted = *dims;
    sorted.sort_by(f64::total_cmp);
    let sizes = format!(
        "{} {u} x {} {u} x {} {u}",
        unit.format(sorted[0]),
        unit.format(sorted[1]),
        unit.format(sorted[2]),
        u = unit.symbol()
    );
    let key = format!("Construction profile, {} x {sizes}", unit.format(*wall));
    agg.record_extra(
        key,
        ExtraEntry {
            quantity: 1,
            names: vec!["Thickness".into(), "Sizes".into()],
            values: vec![ExtraValue::Length(*wall), ExtraValue::Text(sizes)],
        },
        false,
    );
}

/// Edge decorations: fillets and chamfers keyed by their parameters.
fn decoration(node: &Node, agg: &mut Aggregates) {
    match &node.kind {
        NodeKind::Fillet { radius } => {
            let key = format!("Fillet, {}", format_rounded(*radius, 2));
            agg.record_extra(
                key,
                ExtraEntry {
                    quantity: 1,
                    names: vec!["Radius".into()],
                    values: vec![ExtraValue::Length(*radius)],
                },
                false,
            );
        }
        NodeKind::Chamfer { size, size2 } => {
            let key = format!(
                "Chamfer, {} x {}",
                format_rounded(*size, 2),
                format_rounded(*size2, 2)
            );
            agg.record_extra(
                key,
                ExtraEntry {
                    quantity: 1,
                    names: vec!["Size 1".into(), "Size 2".into()],
                    values: vec![ExtraValue::Length(*size), ExtraValue::Length(*size2)],
                },
                false,
            );
        }
        _ => {}
    }
}

/// Grain direction markers, one row per labeled part, one column per
/// marked face.
fn grain_direction(node: &Node, agg: &mut Aggregates) {
    let Some(grain) = &node.grain else {
        return;
    };

    let mut names = Vec::new();
    let mut values = Vec::new();
    for (slot, g) in grain.iter().enumerate() {
        let text = match g {
            Grain::Unspecified => continue,
            Grain::Horizontal => "horizontal",
            Grain::Vertical => "vertical",
        };
        names.push(format!("Face{}", slot + 1));
        values.push(ExtraValue::Text(text.into()));
    }
    if names.is_empty() {
        return;
    }

    let key = format!("Grain direction, {}", node.label);
    agg.record_extra(
        key,
        ExtraEntry {
            quantity: 1,
            names,
            values,
        },
        false,
    );
}
