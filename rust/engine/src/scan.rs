// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scan driver: walks the assembly, gates every instance, extracts
//! dimensions and hands each node to the transformation expander.
//!
//! All traversal state lives in [`ScanContext`] and is threaded
//! through by mutable reference. Reference cycles are caught with a
//! path set: a node may legitimately be visited many times (array
//! bases are), but never while it is still on the active path.

use rustc_hash::FxHashSet;
use tracing::{info, warn};

use cutlist_core::{NodeKey, NodeKind, SceneGraph};

use crate::aggregate::Aggregates;
use crate::config::{ReportMode, ScanConfig};
use crate::error::{Error, Result};
use crate::extract::{self, Extracted};
use crate::keys::{area_mm2, canonicalize, edge_mm, DimensionKey};
use crate::{constraints, edgeband, expand, extras, visibility};

/// Recursion ceiling; deeper assemblies are truncated with a
/// diagnostic note.
const MAX_DEPTH: usize = 64;

/// Placeholder group qualifier for parts outside any group.
const NO_GROUP: &str = "[...]";

/// How a node list reached the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListKind {
    /// The assembly's root object list.
    Main,
    /// A container's children or a transform's referenced set.
    Nested,
}

/// How a single instance reached the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Caller {
    /// Came through a gated scan list.
    Listed,
    /// Referenced directly by a transform multiplier.
    Referenced,
}

/// Mutable traversal state for one scan.
pub(crate) struct ScanContext<'a> {
    pub(crate) scene: &'a SceneGraph,
    pub(crate) config: &'a ScanConfig,
    pub(crate) agg: Aggregates,
    /// Top-level object of the current root iteration.
    root: NodeKey,
    /// Keys on the active traversal path.
    path: FxHashSet<NodeKey>,
    depth: usize,
}

impl ScanContext<'_> {
    fn enter(&mut self, key: NodeKey) -> bool {
        if self.depth >= MAX_DEPTH {
            self.agg
                .diagnostics
                .note(format!("depth limit at {}", self.scene[key].label));
            return false;
        }
        if !self.path.insert(key) {
            let label = &self.scene[key].label;
            warn!(%label, "reference cycle truncated");
            self.agg
                .diagnostics
                .note(format!("reference cycle at {label}"));
            return false;
        }
        self.depth += 1;
        true
    }

    fn leave(&mut self, key: NodeKey) {
        self.path.remove(&key);
        self.depth -= 1;
    }
}

/// Scans a whole assembly and returns the accumulated tables.
///
/// The only hard error is an empty scene; per-instance faults are
/// isolated into [`Aggregates::diagnostics`] and the scan continues.
pub fn scan(scene: &SceneGraph, config: &ScanConfig) -> Result<Aggregates> {
    if scene.is_empty() {
        return Err(Error::EmptyDocument);
    }

    let roots = scene.roots().to_vec();
    let mut ctx = ScanContext {
        scene,
        config,
        agg: Aggregates::default(),
        root: roots.first().copied().unwrap_or_default(),
        path: FxHashSet::default(),
        depth: 0,
    };

    info!(objects = scene.len(), mode = ?config.mode, "scanning assembly");
    scan_list(&mut ctx, &roots, ListKind::Main);
    info!(
        keys = ctx.agg.dimensions.len(),
        skipped = ctx.agg.diagnostics.skipped,
        failed = ctx.agg.diagnostics.failed,
        "scan finished"
    );
    Ok(ctx.agg)
}

/// Walks one node list, gating each entry before extraction and
/// expansion.
///
/// The report opt-out and the cut-branch filter prune the whole
/// subtree; the visibility policy only withholds the instance itself,
/// so children are still judged individually.
pub(crate) fn scan_list(ctx: &mut ScanContext<'_>, list: &[NodeKey], kind: ListKind) {
    for &key in list {
        if kind == ListKind::Main {
            ctx.root = key;
        }
        if !visibility::bom_included(ctx.scene, key) {
            continue;
        }
        if !visibility::cut_branch_allowed(ctx.scene, key, ctx.config.cut_content) {
            continue;
        }
        if !ctx.enter(key) {
            continue;
        }
        if visibility::include(ctx.scene, key, ctx.root, ctx.config.visibility) {
            select_part(ctx, key, Caller::Listed);
        }
        expand::apply(ctx, key);
        ctx.leave(key);
    }
}

/// Registers one logical instance: mode dispatch, extraction,
/// aggregation, sub-reports.
pub(crate) fn select_part(ctx: &mut ScanContext<'_>, key: NodeKey, caller: Caller) {
    let scene = ctx.scene;
    let node = &scene[key];

    match ctx.config.mode {
        ReportMode::Constraints => {
            if matches!(node.kind, NodeKind::Extrusion { .. } | NodeKind::Hole { .. }) {
                constraints::record_named(scene, key, ctx.config.mode, &mut ctx.agg);
            }
        }
        ReportMode::PadsAllConstraints => {
            if matches!(node.kind, NodeKind::Extrusion { .. }) {
                constraints::record_all(scene, key, &mut ctx.agg);
            }
        }
        ReportMode::Approximation => {
            if approximable(&node.kind) {
                approximate(ctx, key);
            }
        }
        mode => match &node.kind {
            NodeKind::Box { .. } => {
                let extracted = extract::box_dimensions(node);
                finish_part(ctx, key, extracted);
            }
            NodeKind::Extrusion { pocket, .. } if !pocket => {
                let extracted = extract::extrusion_dimensions(node);
                finish_part(ctx, key, extracted);
            }
            NodeKind::Hole { .. } if mode == ReportMode::DetailedHoles => {
                constraints::record_named(scene, key, mode, &mut ctx.agg);
            }
            NodeKind::Unsupported => {
                ctx.agg.diagnostics.skipped += 1;
            }
            _ => {}
        },
    }

    extras::collect(scene, key, ctx.config, &mut ctx.agg);

    // Transform targets bypass the scan lists, so structure referenced
    // this way recurses from here.
    if caller == Caller::Referenced {
        match &node.kind {
            NodeKind::Group { children }
            | NodeKind::LinkGroup { children }
            | NodeKind::Body { children } => {
                let children = children.clone();
                scan_list(ctx, &children, ListKind::Nested);
            }
            NodeKind::Compound { links } => {
                let links = links.clone();
                scan_list(ctx, &links, ListKind::Nested);
            }
            NodeKind::Cut { base, tool } => {
                let pair = [*base, *tool];
                scan_list(ctx, &pair, ListKind::Nested);
            }
            NodeKind::Clone { .. } => expand::expand_clone(ctx, key),
            _ => {}
        }
    }
}

fn approximable(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Box { .. }
            | NodeKind::Extrusion { pocket: false, .. }
            | NodeKind::Cylinder { .. }
            | NodeKind::Unsupported
    )
}

/// Aggregates one exactly-extracted instance.
fn finish_part(ctx: &mut ScanContext<'_>, key: NodeKey, extracted: Extracted<[f64; 3]>) {
    let dims = match extracted {
        Extracted::Value(dims) => dims,
        Extracted::Skip => {
            ctx.agg.diagnostics.skipped += 1;
            return;
        }
        Extracted::Failed(message) => {
            warn!(%message, "extraction failed");
            ctx.agg.diagnostics.failed += 1;
            ctx.agg.diagnostics.note(message);
            return;
        }
    };

    let scene = ctx.scene;
    let node = &scene[key];
    let mode = ctx.config.mode;
    let sorted = canonicalize(dims[0], dims[1], dims[2]);

    let label = mode.wants_label().then(|| node.label.clone());
    let group = mode
        .wants_group()
        .then(|| scene.group_label(key).unwrap_or_else(|| NO_GROUP.to_string()));
    let dim_key = DimensionKey::new(sorted, label, group);

    ctx.agg.record_part(dim_key.clone(), area_mm2(sorted));

    if visibility::edge_counted(scene, key, ctx.config.visibility) {
        ctx.agg.record_edge_total(edge_mm(sorted));
        match edgeband::classify(node, sorted, &ctx.config.edgeband_code) {
            Extracted::Value(outcome) => {
                ctx.agg
                    .record_edgeband(dim_key, outcome.faces, outcome.banded_mm);
            }
            Extracted::Skip => {}
            Extracted::Failed(message) => {
                warn!(%message, "edge-band classification failed");
                ctx.agg.diagnostics.failed += 1;
                ctx.agg.diagnostics.note(message);
            }
        }
    }
}

/// Bounding-box fallback for the approximation report: quantity only,
/// always qualified by group.
fn approximate(ctx: &mut ScanContext<'_>, key: NodeKey) {
    let scene = ctx.scene;
    let node = &scene[key];
    match extract::approximate_dimensions(node) {
        Extracted::Value(dims) => {
            let sorted = canonicalize(dims[0], dims[1], dims[2]);
            let group = scene.group_label(key).unwrap_or_default();
            ctx.agg
                .record_approximation(DimensionKey::new(sorted, None, Some(group)));
        }
        Extracted::Skip => {
            ctx.agg.diagnostics.skipped += 1;
        }
        Extracted::Failed(message) => {
            warn!(%message, "approximation failed");
            ctx.agg.diagnostics.failed += 1;
            ctx.agg.diagnostics.note(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutlist_core::Node;

    fn panel(label: &str) -> Node {
        Node::new(
            label,
            NodeKind::Box {
                width: 18.0,
                height: 400.0,
                length: 600.0,
            },
        )
    }

    #[test]
    fn empty_scene_is_an_error() {
        let scene = SceneGraph::new();
        assert!(matches!(
            scan(&scene, &ScanConfig::default()),
            Err(Error::EmptyDocument)
        ));
    }

    #[test]
    fn single_panel_registers_one_key() {
        let mut scene = SceneGraph::new();
        scene.add_root(panel("Shelf"));
        let agg = scan(&scene, &ScanConfig::default()).unwrap();

        assert_eq!(agg.dimensions.len(), 1);
        let (key, entry) = agg.dimensions.iter().next().unwrap();
        assert_eq!(key.to_string(), "18:400:600");
        assert_eq!(entry.quantity, 1);
        assert_eq!(entry.area_mm2, 240_000.0);
    }

    #[test]
    fn unsupported_nodes_count_as_skipped() {
        let mut scene = SceneGraph::new();
        scene.add_root(panel("Shelf"));
        scene.add_root(Node::new("Blob", NodeKind::Unsupported));
        let agg = scan(&scene, &ScanConfig::default()).unwrap();

        assert_eq!(agg.dimensions.len(), 1);
        assert_eq!(agg.diagnostics.skipped, 1);
    }

    #[test]
    fn self_referential_link_is_truncated() {
        let mut scene = SceneGraph::new();
        let group = scene.add_root(Node::new("G", NodeKind::Group { children: vec![] }));
        let link = scene.add(Node::new("L", NodeKind::Link { target: group }));
        scene.attach(group, link).unwrap();

        let agg = scan(&scene, &ScanConfig::default()).unwrap();
        assert!(agg
            .diagnostics
            .notes
            .iter()
            .any(|n| n.contains("reference cycle")));
    }

    #[test]
    fn malformed_extrusion_is_isolated() {
        let mut scene = SceneGraph::new();
        scene.add_root(Node::new(
            "Broken",
            NodeKind::Extrusion {
                profile: cutlist_core::Profile {
                    edges: vec![400.0],
                    constraints: vec![],
                },
                length: 18.0,
                pocket: false,
            },
        ));
        scene.add_root(panel("Shelf"));

        let agg = scan(&scene, &ScanConfig::default()).unwrap();
        assert_eq!(agg.diagnostics.failed, 1);
        assert_eq!(agg.dimensions.len(), 1);
    }
}
