// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Edge-band detection from per-face color overrides.
//!
//! A face painted differently from the shell is either a banded edge
//! or a decorative surface. The matcher decides by geometry: for a
//! sheet part, an edge face's perimeter is 2 × (thickness + edge
//! length), so `(perimeter − 2 × thickness) / 2` recovers the edge
//! length and must round to one of the two non-thickness dimensions.

use cutlist_core::Node;
use smallvec::SmallVec;

use crate::aggregate::{EdgeBandRecord, FaceTag, NOT_AN_EDGE};
use crate::extract::Extracted;

/// Per-instance classification result.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeBandOutcome {
    /// Sum of measured lengths over faces classified as edges, mm.
    pub banded_mm: f64,
    /// One record per face slot.
    pub faces: SmallVec<[EdgeBandRecord; 8]>,
}

/// Classifies every overridden face of `node`.
///
/// `sorted` are the instance's canonical dimensions; `code` is the
/// active edge-band code recorded on classified faces. Skips nodes
/// without overrides.
pub fn classify(node: &Node, sorted: [f64; 3], code: &str) -> Extracted<EdgeBandOutcome> {
    let Some(appearance) = &node.appearance else {
        return Extracted::Skip;
    };
    if !appearance.has_overrides() {
        return Extracted::Skip;
    }
    let Some(shape) = &node.shape else {
        return Extracted::Failed(format!("{}: face colors without shape data", node.label));
    };

    let thickness = sorted[0];
    let mut faces: SmallVec<[EdgeBandRecord; 8]> = SmallVec::new();
    let mut banded_mm = 0.0;

    for (slot, &face_color) in appearance.faces.iter().enumerate() {
        if face_color == appearance.shell {
            faces.push(EdgeBandRecord::default());
            continue;
        }

        let Some(&perimeter) = shape.face_perimeters.get(slot) else {
            return Extracted::Failed(format!(
                "{}: no perimeter for overridden face {slot}",
                node.label
            ));
        };

        let measured = (perimeter - 2.0 * thickness) / 2.0;
        let is_edge =
            measured.round() == sorted[1].round() || measured.round() == sorted[2].round();

        if is_edge {
            banded_mm += measured;
            faces.push(EdgeBandRecord {
                tag: FaceTag::Edge,
                length_mm: measured,
                code: code.to_string(),
            });
        } else {
            faces.push(EdgeBandRecord {
                tag: FaceTag::Surface,
                length_mm: NOT_AN_EDGE,
                code: code.to_string(),
            });
        }
    }

    Extracted::Value(EdgeBandOutcome { banded_mm, faces })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::canonicalize;
    use cutlist_core::{box_shape, Appearance, Color, Node, NodeKind};
    use smallvec::smallvec;

    const BOARD: Color = Color::rgb(200, 180, 140);
    const BAND: Color = Color::rgb(255, 255, 255);

    fn panel_with_faces(faces: SmallVec<[Color; 8]>) -> Node {
        Node::new(
            "Shelf",
            NodeKind::Box {
                width: 18.0,
                height: 400.0,
                length: 600.0,
            },
        )
        .with_shape(box_shape(18.0, 400.0, 600.0))
        .with_appearance(Appearance {
            shell: BOARD,
            faces,
        })
    }

    #[test]
    fn uniform_color_skips() {
        let node = panel_with_faces(smallvec![BOARD]);
        let sorted = canonicalize(18.0, 400.0, 600.0);
        assert_eq!(classify(&node, sorted, "PL55 PVC"), Extracted::Skip);
    }

    #[test]
    fn edge_face_is_detected() {
        // Face slot 2 has perimeter 2*(18+400): a true edge of length 400.
        let node = panel_with_faces(smallvec![BOARD, BOARD, BAND, BOARD, BOARD, BOARD]);
        let sorted = canonicalize(18.0, 400.0, 600.0);

        let Extracted::Value(outcome) = classify(&node, sorted, "PL55 PVC") else {
            panic!("expected classification");
        };
        assert_eq!(outcome.banded_mm, 400.0);
        assert_eq!(outcome.faces[2].tag, FaceTag::Edge);
        assert_eq!(outcome.faces[2].length_mm, 400.0);
        assert_eq!(outcome.faces[2].code, "PL55 PVC");
        // Untouched faces keep the default record.
        assert_eq!(outcome.faces[0].tag, FaceTag::None);
    }

    #[test]
    fn surface_override_gets_sentinel() {
        // Slot 0 is a big face, perimeter 2*(600+400).
        let node = panel_with_faces(smallvec![BAND, BOARD, BOARD, BOARD, BOARD, BOARD]);
        let sorted = canonicalize(18.0, 400.0, 600.0);

        let Extracted::Value(outcome) = classify(&node, sorted, "PL55 PVC") else {
            panic!("expected classification");
        };
        // (2000 - 36) / 2 = 982 matches neither 400 nor 600.
        assert_eq!(outcome.banded_mm, 0.0);
        assert_eq!(outcome.faces[0].tag, FaceTag::Surface);
        assert_eq!(outcome.faces[0].length_mm, NOT_AN_EDGE);
    }

    #[test]
    fn missing_perimeter_is_a_fault() {
        let mut node = panel_with_faces(smallvec![BOARD, BOARD, BAND, BOARD, BOARD, BOARD]);
        node.shape.as_mut().unwrap().face_perimeters.truncate(2);
        let sorted = canonicalize(18.0, 400.0, 600.0);
        assert!(matches!(
            classify(&node, sorted, "x"),
            Extracted::Failed(_)
        ));
    }
}
