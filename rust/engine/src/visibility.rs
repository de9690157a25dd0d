// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Visibility resolution: which instances take part in a scan.
//!
//! Three independent gates run before any extractor touches a node:
//! the per-instance report override, the configured visibility
//! policy, and the boolean-cut branch filter.

use cutlist_core::{CutRole, NodeKey, NodeKind, SceneGraph};

use crate::config::{CutContent, VisibilityPolicy};

/// Per-instance opt-out: an explicit `bom = false` override always
/// excludes the instance, regardless of policy.
pub fn bom_included(scene: &SceneGraph, key: NodeKey) -> bool {
    scene.node(key).map_or(false, |n| n.bom != Some(false))
}

/// Resolves the configured visibility policy for one instance.
///
/// `root` is the top-level object of the current scan iteration, used
/// by the root-inherit short-circuit.
pub fn include(scene: &SceneGraph, key: NodeKey, root: NodeKey, policy: VisibilityPolicy) -> bool {
    let node = match scene.node(key) {
        Some(n) => n,
        None => return false,
    };

    match policy {
        VisibilityPolicy::Off | VisibilityPolicy::EdgeExempt => true,
        VisibilityPolicy::Simple => node.visible,
        VisibilityPolicy::ParentInherit => parent_visible(scene, key),
        VisibilityPolicy::RootInherit => root_inherited(scene, key, root),
    }
}

/// Edge-exempt rule: hidden instances keep quantity and area but do
/// not contribute to edge totals.
pub fn edge_counted(scene: &SceneGraph, key: NodeKey, policy: VisibilityPolicy) -> bool {
    if policy != VisibilityPolicy::EdgeExempt {
        return true;
    }
    scene.node(key).map_or(false, |n| n.visible)
}

/// Cut-branch filter: when only one side of a boolean cut is
/// reported, the other side's child is dropped.
pub fn cut_branch_allowed(scene: &SceneGraph, key: NodeKey, content: CutContent) -> bool {
    match (content, scene.cut_role(key)) {
        (CutContent::BaseOnly, Some(CutRole::Tool)) => false,
        (CutContent::ToolOnly, Some(CutRole::Base)) => false,
        _ => true,
    }
}

fn parent_visible(scene: &SceneGraph, key: NodeKey) -> bool {
    let container = scene
        .ancestors(key)
        .find(|&k| scene[k].kind.is_container());
    match container {
        Some(k) => scene[k].visible,
        // No structural container: default include.
        None => true,
    }
}

fn root_inherited(scene: &SceneGraph, key: NodeKey, root: NodeKey) -> bool {
    // Visible scan root short-circuits the whole check.
    if scene.node(root).map_or(false, |n| n.visible) {
        return true;
    }
    if scene[key].visible {
        return true;
    }
    // Hidden instance: excluded only when the nearest qualifying
    // container is hidden too.
    let container = scene.ancestors(key).find(|&k| {
        matches!(
            scene[k].kind,
            NodeKind::LinkGroup { .. }
                | NodeKind::Compound { .. }
                | NodeKind::Cut { .. }
                | NodeKind::Group { .. }
                | NodeKind::Body { .. }
        )
    });
    match container {
        Some(k) => scene[k].visible,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutlist_core::Node;

    fn panel() -> NodeKind {
        NodeKind::Box {
            width: 18.0,
            height: 400.0,
            length: 600.0,
        }
    }

    #[test]
    fn off_policy_includes_hidden() {
        let mut scene = SceneGraph::new();
        let part = scene.add_root(Node::new("P", panel()).hidden());
        assert!(include(&scene, part, part, VisibilityPolicy::Off));
        assert!(!include(&scene, part, part, VisibilityPolicy::Simple));
    }

    #[test]
    fn bom_override_wins() {
        let mut scene = SceneGraph::new();
        let part = scene.add_root(Node::new("P", panel()).with_bom(false));
        assert!(!bom_included(&scene, part));
        let kept = scene.add_root(Node::new("Q", panel()));
        assert!(bom_included(&scene, kept));
    }

    #[test]
    fn edge_exempt_includes_but_drops_edges() {
        let mut scene = SceneGraph::new();
        let part = scene.add_root(Node::new("P", panel()).hidden());
        assert!(include(&scene, part, part, VisibilityPolicy::EdgeExempt));
        assert!(!edge_counted(&scene, part, VisibilityPolicy::EdgeExempt));
        assert!(edge_counted(&scene, part, VisibilityPolicy::Off));
    }

    #[test]
    fn parent_inherit_follows_container() {
        let mut scene = SceneGraph::new();
        let group = scene.add_root(Node::new("G", NodeKind::Group { children: vec![] }).hidden());
        let part = scene.add(Node::new("P", panel()));
        scene.attach(group, part).unwrap();

        assert!(!include(&scene, part, group, VisibilityPolicy::ParentInherit));

        // No container: default include.
        let loose = scene.add_root(Node::new("L", panel()).hidden());
        assert!(include(&scene, loose, loose, VisibilityPolicy::ParentInherit));
    }

    #[test]
    fn root_inherit_short_circuits_on_visible_root() {
        let mut scene = SceneGraph::new();
        let group = scene.add_root(Node::new("G", NodeKind::Group { children: vec![] }));
        let part = scene.add(Node::new("P", panel()).hidden());
        scene.attach(group, part).unwrap();

        // Root visible: always include.
        assert!(include(&scene, part, group, VisibilityPolicy::RootInherit));
    }

    #[test]
    fn root_inherit_excludes_double_hidden() {
        let mut scene = SceneGraph::new();
        let group = scene.add_root(Node::new("G", NodeKind::Group { children: vec![] }).hidden());
        let hidden = scene.add(Node::new("P", panel()).hidden());
        let visible = scene.add(Node::new("Q", panel()));
        scene.attach(group, hidden).unwrap();
        scene.attach(group, visible).unwrap();

        assert!(!include(&scene, hidden, group, VisibilityPolicy::RootInherit));
        // Visible instance survives a hidden container.
        assert!(include(&scene, visible, group, VisibilityPolicy::RootInherit));
    }

    #[test]
    fn cut_filter_drops_other_branch() {
        let mut scene = SceneGraph::new();
        let base = scene.add(Node::new("Base", panel()));
        let tool = scene.add(Node::new("Tool", panel()));
        let _cut = scene.add_cut("Cut", base, tool).unwrap();

        assert!(cut_branch_allowed(&scene, base, CutContent::Both));
        assert!(cut_branch_allowed(&scene, tool, CutContent::Both));
        assert!(!cut_branch_allowed(&scene, tool, CutContent::BaseOnly));
        assert!(cut_branch_allowed(&scene, base, CutContent::BaseOnly));
        assert!(!cut_branch_allowed(&scene, base, CutContent::ToolOnly));
        assert!(cut_branch_allowed(&scene, tool, CutContent::ToolOnly));
    }
}
