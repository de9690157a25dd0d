// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw shape and appearance data attached to scene nodes.

use nalgebra::Point3;
use smallvec::SmallVec;

/// RGBA color as exposed by the design tool's view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }
}

/// Per-face grain direction marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grain {
    /// No marker on this face.
    Unspecified,
    Horizontal,
    Vertical,
}

/// Shell color plus per-face overrides.
///
/// A face whose color differs from the shell color is a candidate
/// edge-band or decorative surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub shell: Color,
    pub faces: SmallVec<[Color; 8]>,
}

impl Appearance {
    /// Uniform appearance: a single shell color, no face overrides.
    pub fn uniform(shell: Color) -> Self {
        Self {
            shell,
            faces: smallvec::smallvec![shell],
        }
    }

    /// True when at least one face differs from the shell color.
    pub fn has_overrides(&self) -> bool {
        self.faces.len() != 1
    }
}

/// Vertex cloud and per-face perimeters of a node's computed shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeData {
    pub vertices: Vec<Point3<f64>>,
    /// Perimeter of each face, millimeters, indexed by face slot.
    pub face_perimeters: SmallVec<[f64; 8]>,
}

impl ShapeData {
    /// Axis-aligned bounds as (min, max) per axis, or `None` for an
    /// empty vertex cloud.
    pub fn bounds(&self) -> Option<([f64; 3], [f64; 3])> {
        let first = self.vertices.first()?;
        let mut min = [first.x, first.y, first.z];
        let mut max = min;
        for v in &self.vertices[1..] {
            let p = [v.x, v.y, v.z];
            for axis in 0..3 {
                if p[axis] < min[axis] {
                    min[axis] = p[axis];
                }
                if p[axis] > max[axis] {
                    max[axis] = p[axis];
                }
            }
        }
        Some((min, max))
    }
}
