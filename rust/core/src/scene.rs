// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based scene graph for parametric assemblies.
//!
//! Nodes are stored in a slot map and addressed by stable generational
//! keys. Structural containment (group/body/cut membership) is tracked
//! with parent links; transform nodes reference their originals by key
//! without owning them.

use nalgebra::Point3;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::profile::Profile;
use crate::shape::{Appearance, Grain, ShapeData};

new_key_type! {
    /// Key for a scene node.
    pub struct NodeKey;
}

/// Array layout of a draft array transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    /// Rectangular array with counts along each axis.
    Linear { x: u32, y: u32, z: u32 },
    /// Polar array with a total occurrence count.
    Polar { count: u32 },
}

impl ArrayKind {
    /// Total number of occurrences the array declares, base included.
    pub fn total(self) -> u32 {
        match self {
            ArrayKind::Linear { x, y, z } => x * y * z,
            ArrayKind::Polar { count } => count,
        }
    }
}

/// What a clone node resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneTarget {
    /// Clone of a whole group: traversal recurses into the group's children.
    Group(NodeKey),
    /// Clone of a single base feature.
    Feature(NodeKey),
    /// Clone of an explicit object list.
    Objects(Vec<NodeKey>),
}

/// Nested sub-transform of a multi-transform node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubTransform {
    Mirrored,
    LinearPattern { occurrences: u32 },
}

/// Depth specification of a drilled hole feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DepthMode {
    /// Fixed depth dimension, millimeters.
    Dimension(f64),
    /// Drilled through; no meaningful length header.
    ThroughAll,
}

/// Tagged union over all node kinds the scan understands.
///
/// Unknown design-tool objects map to `Unsupported`, which every
/// handler skips without error.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // --- leaf parts -----------------------------------------------------
    /// Parametric box solid with three characteristic lengths.
    Box { width: f64, height: f64, length: f64 },
    /// Extruded sketch profile (pad or pocket).
    Extrusion {
        profile: Profile,
        length: f64,
        pocket: bool,
    },
    /// Drilled hole / countersink feature.
    Hole {
        profile: Profile,
        depth: DepthMode,
        /// Feature this hole is drilled into, possibly another hole.
        base: Option<NodeKey>,
    },

    // --- structural containers ------------------------------------------
    /// Assembly part container.
    Group { children: Vec<NodeKey> },
    /// Group of links.
    LinkGroup { children: Vec<NodeKey> },
    /// Feature body container.
    Body { children: Vec<NodeKey> },
    /// Compound of linked objects.
    Compound { links: Vec<NodeKey> },
    /// Boolean cut exposing base and tool children.
    Cut { base: NodeKey, tool: NodeKey },

    // --- transforms ------------------------------------------------------
    /// Single mirror of a source object. A missing source is a no-op.
    Mirror { source: Option<NodeKey> },
    /// Linear or polar array over a base object.
    ArrayPattern { kind: ArrayKind, base: NodeKey },
    /// Clone resolving to a referenced set.
    Clone { target: CloneTarget },
    /// Mirrored feature with declared originals (may be empty when the
    /// mirror lives inside a multi-transform).
    MirroredFeature { originals: Vec<NodeKey> },
    /// Linear pattern with an occurrence count.
    LinearPattern {
        occurrences: u32,
        originals: Vec<NodeKey>,
    },
    /// Stacked mirror/linear-pattern transforms applied together.
    MultiTransform {
        sub_transforms: Vec<SubTransform>,
        originals: Vec<NodeKey>,
    },
    /// 1:1 alias of another object.
    Link { target: NodeKey },

    // --- auxiliary report producers --------------------------------------
    /// Mounting cylinder (dowel, screw); `detail` is free-form label text.
    Cylinder {
        radius: f64,
        height: f64,
        detail: String,
    },
    /// Rounded-edge decoration.
    Fillet { radius: f64 },
    /// Chamfered-edge decoration.
    Chamfer { size: f64, size2: f64 },
    /// Named distance measurement.
    Measurement {
        group: String,
        name: String,
        distance: f64,
    },
    /// Construction profile frame: wall thickness plus outer dimensions.
    ProfileFrame { wall: f64, dims: [f64; 3] },

    /// Anything the scan does not understand.
    Unsupported,
}

impl NodeKind {
    /// Children of a structural container, if this kind has any.
    pub fn children(&self) -> Option<&[NodeKey]> {
        match self {
            NodeKind::Group { children }
            | NodeKind::LinkGroup { children }
            | NodeKind::Body { children } => Some(children),
            NodeKind::Compound { links } => Some(links),
            _ => None,
        }
    }

    /// True for kinds that structurally contain other nodes.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            NodeKind::Group { .. }
                | NodeKind::LinkGroup { .. }
                | NodeKind::Body { .. }
                | NodeKind::Compound { .. }
                | NodeKind::Cut { .. }
        )
    }
}

/// Role of a node inside its parent boolean cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutRole {
    Base,
    Tool,
}

/// A single object of the assembly.
#[derive(Debug, Clone)]
pub struct Node {
    pub label: String,
    pub kind: NodeKind,
    /// Design-tool visibility flag.
    pub visible: bool,
    /// Per-instance report override: `Some(false)` forces exclusion
    /// from every report regardless of visibility policy.
    pub bom: Option<bool>,
    /// Nearest structural container, if any.
    pub parent: Option<NodeKey>,
    /// Raw shape data for approximation and edge-band measurement.
    pub shape: Option<ShapeData>,
    /// Shell color and per-face overrides.
    pub appearance: Option<Appearance>,
    /// Per-face grain direction markers.
    pub grain: Option<SmallVec<[Grain; 8]>>,
}

impl Node {
    /// Visible node with no shape or appearance data.
    pub fn new(label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            label: label.into(),
            kind,
            visible: true,
            bom: None,
            parent: None,
            shape: None,
            appearance: None,
            grain: None,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_bom(mut self, include: bool) -> Self {
        self.bom = Some(include);
        self
    }

    pub fn with_shape(mut self, shape: ShapeData) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = Some(appearance);
        self
    }

    pub fn with_grain(mut self, grain: impl IntoIterator<Item = Grain>) -> Self {
        self.grain = Some(grain.into_iter().collect());
        self
    }
}

/// The assembly snapshot handed to a scan.
///
/// Read-only from the engine's point of view; mutation happens only
/// while building the graph.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, Node>,
    roots: Vec<NodeKey>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node without attaching it anywhere.
    pub fn add(&mut self, node: Node) -> NodeKey {
        self.nodes.insert(node)
    }

    /// Adds a node to the document's root object list.
    pub fn add_root(&mut self, node: Node) -> NodeKey {
        let key = self.nodes.insert(node);
        self.roots.push(key);
        key
    }

    /// Marks an existing node as a root object.
    pub fn promote_root(&mut self, key: NodeKey) {
        self.roots.push(key);
    }

    /// Attaches `child` to a container node, recording the parent link.
    pub fn attach(&mut self, parent: NodeKey, child: NodeKey) -> Result<()> {
        if !self.nodes.contains_key(child) {
            return Err(Error::NotFound(child));
        }
        let parent_node = self.nodes.get_mut(parent).ok_or(Error::NotFound(parent))?;
        match &mut parent_node.kind {
            NodeKind::Group { children }
            | NodeKind::LinkGroup { children }
            | NodeKind::Body { children } => children.push(child),
            NodeKind::Compound { links } => links.push(child),
            _ => return Err(Error::NotAContainer(parent)),
        }
        self.nodes[child].parent = Some(parent);
        Ok(())
    }

    /// Creates a boolean cut over two existing nodes and records their
    /// parent links.
    pub fn add_cut(&mut self, label: impl Into<String>, base: NodeKey, tool: NodeKey) -> Result<NodeKey> {
        if !self.nodes.contains_key(base) {
            return Err(Error::NotFound(base));
        }
        if !self.nodes.contains_key(tool) {
            return Err(Error::NotFound(tool));
        }
        let cut = self.nodes.insert(Node::new(label, NodeKind::Cut { base, tool }));
        self.nodes[base].parent = Some(cut);
        self.nodes[tool].parent = Some(cut);
        Ok(cut)
    }

    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walks parent links from nearest to farthest ancestor.
    pub fn ancestors(&self, key: NodeKey) -> Ancestors<'_> {
        Ancestors {
            scene: self,
            next: self.nodes.get(key).and_then(|n| n.parent),
        }
    }

    /// Role of `key` inside its parent cut, if its parent is a cut.
    pub fn cut_role(&self, key: NodeKey) -> Option<CutRole> {
        let parent = self.nodes.get(key)?.parent?;
        match &self.nodes.get(parent)?.kind {
            NodeKind::Cut { base, tool } => {
                if *base == key {
                    Some(CutRole::Base)
                } else if *tool == key {
                    Some(CutRole::Tool)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Group qualifier for report keys: the label of the grandparent
    /// container when one exists, otherwise the nearest container's.
    pub fn group_label(&self, key: NodeKey) -> Option<String> {
        let mut containers = self
            .ancestors(key)
            .filter(|&k| self.nodes[k].kind.is_container());
        let nearest = containers.next()?;
        let label = match containers.next() {
            Some(grandparent) => self.nodes[grandparent].label.clone(),
            None => self.nodes[nearest].label.clone(),
        };
        if label.is_empty() {
            None
        } else {
            Some(label)
        }
    }
}

impl std::ops::Index<NodeKey> for SceneGraph {
    type Output = Node;

    fn index(&self, key: NodeKey) -> &Node {
        &self.nodes[key]
    }
}

/// Iterator over a node's structural ancestors, nearest first.
pub struct Ancestors<'a> {
    scene: &'a SceneGraph,
    next: Option<NodeKey>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        let current = self.next?;
        self.next = self.scene.nodes.get(current).and_then(|n| n.parent);
        Some(current)
    }
}

/// Convenience constructor for box shape data: the eight corner
/// vertices plus six face perimeters of an axis-aligned box.
pub fn box_shape(width: f64, height: f64, length: f64) -> ShapeData {
    let (w, h, l) = (width, height, length);
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(l, 0.0, 0.0),
        Point3::new(l, w, 0.0),
        Point3::new(0.0, w, 0.0),
        Point3::new(0.0, 0.0, h),
        Point3::new(l, 0.0, h),
        Point3::new(l, w, h),
        Point3::new(0.0, w, h),
    ];
    let face_perimeters = smallvec::smallvec![
        2.0 * (l + h),
        2.0 * (l + h),
        2.0 * (w + h),
        2.0 * (w + h),
        2.0 * (l + w),
        2.0 * (l + w),
    ];
    ShapeData {
        vertices,
        face_perimeters,
    }
}
