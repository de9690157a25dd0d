// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Constraint extraction for the constraint report modes.
//!
//! Design tools store sketch constraint names with two legacy
//! separator encodings (a repeated digit or an underscore); a
//! double separator run stands for ", " and a single one for " ".

use cutlist_core::{Constraint, DepthMode, Node, NodeKey, NodeKind, SceneGraph};

use crate::aggregate::{Aggregates, ConstraintEntry, ConstraintValue, LengthHeader};
use crate::config::ReportMode;
use crate::keys::Dim;

/// Placeholder marker for unnamed constraints in the all-constraints
/// listing.
pub const UNNAMED: &str = "-";

/// Decodes a legacy-encoded constraint name into readable text.
///
/// Applied in fixed order: `"00"` → `", "`, `"0"` → `" "`, `"__"` →
/// `", "`, `"_"` → `" "`.
pub fn decode_name(name: &str) -> String {
    name.replace("00", ", ")
        .replace('0', " ")
        .replace("__", ", ")
        .replace('_', " ")
}

fn typed(c: &Constraint) -> ConstraintValue {
    ConstraintValue {
        name: if c.is_unnamed() {
            UNNAMED.to_string()
        } else {
            decode_name(&c.name)
        },
        kind: c.kind,
        value: c.value,
    }
}

/// Type-specific length header for a constraint listing.
fn length_header(node: &Node) -> Option<LengthHeader> {
    match &node.kind {
        NodeKind::Extrusion { length, pocket, .. } if !pocket => {
            Some(LengthHeader::Extrusion(*length))
        }
        NodeKind::Hole { depth, .. } => match depth {
            DepthMode::Dimension(d) => Some(LengthHeader::HoleDepth(*d)),
            DepthMode::ThroughAll => None,
        },
        _ => None,
    }
}

/// Named-only policy: lists constraints that carry a name, dedupes by
/// instance label. Nodes with no named constraints are skipped.
pub fn record_named(scene: &SceneGraph, key: NodeKey, mode: ReportMode, agg: &mut Aggregates) {
    let node = &scene[key];
    let profile = match &node.kind {
        NodeKind::Extrusion { profile, .. } => profile,
        NodeKind::Hole { profile, .. } => profile,
        _ => return,
    };

    let pairs: Vec<ConstraintValue> = profile
        .constraints
        .iter()
        .filter(|c| !c.is_unnamed())
        .map(typed)
        .collect();
    if pairs.is_empty() {
        return;
    }

    let entry = ConstraintEntry {
        quantity: 1,
        label: node.label.clone(),
        length: length_header(node),
        pairs,
    };
    let is_new = agg.record_constraints(node.label.clone(), entry);

    // Detailed-holes mode lists each hole under the part it is
    // drilled into; follow the base chain past stacked holes. A
    // repeat collapsed by the dedup gate is not re-listed.
    if is_new && mode == ReportMode::DetailedHoles {
        if let NodeKind::Hole {
            base: Some(host), ..
        } = &node.kind
        {
            let mut host = *host;
            while let NodeKind::Hole {
                base: Some(next), ..
            } = &scene[host].kind
            {
                host = *next;
            }
            agg.record_hole_host(scene[host].label.clone(), node.label.clone());
        }
    }
}

/// All-constraints policy: lists every nonzero constraint, named or
/// not, deduped by (group, sorted values, length) so geometrically
/// identical instances collapse regardless of naming.
pub fn record_all(scene: &SceneGraph, key: NodeKey, agg: &mut Aggregates) {
    let node = &scene[key];
    let NodeKind::Extrusion { profile, length, .. } = &node.kind else {
        return;
    };

    let pairs: Vec<ConstraintValue> = profile
        .constraints
        .iter()
        .filter(|c| c.value != 0.0)
        .map(typed)
        .collect();
    if pairs.is_empty() {
        return;
    }

    let mut sorted_values: Vec<Dim> = pairs.iter().map(|p| Dim::from_mm(p.value)).collect();
    sorted_values.sort();
    let values_part = sorted_values
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(":");
    let group = scene.group_label(key).unwrap_or_default();
    let dedup_key = format!("{group}:{values_part}:{}", Dim::from_mm(*length));

    let entry = ConstraintEntry {
        quantity: 1,
        label: node.label.clone(),
        length: Some(LengthHeader::Extrusion(*length)),
        pairs,
    };
    agg.record_constraints(dedup_key, entry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutlist_core::{Node, Profile};

    fn pad(label: &str, constraints: Vec<Constraint>, length: f64) -> Node {
        Node::new(
            label,
            NodeKind::Extrusion {
                profile: Profile {
                    edges: vec![400.0, 600.0],
                    constraints,
                },
                length,
                pocket: false,
            },
        )
    }

    #[test]
    fn digit_encoding_decodes() {
        assert_eq!(decode_name("Side00left0panel"), "Side, left panel");
    }

    #[test]
    fn underscore_encoding_decodes() {
        assert_eq!(decode_name("Side__left_panel"), "Side, left panel");
    }

    #[test]
    fn named_only_skips_unnamed() {
        let mut scene = SceneGraph::new();
        let key = scene.add_root(pad(
            "Front",
            vec![
                Constraint::dimension("", 100.0),
                Constraint::dimension("Width", 400.0),
            ],
            18.0,
        ));
        let mut agg = Aggregates::default();
        record_named(&scene, key, ReportMode::Constraints, &mut agg);

        let entry = agg.constraints.get(&"Front".to_string()).unwrap();
        assert_eq!(entry.pairs.len(), 1);
        assert_eq!(entry.pairs[0].name, "Width");
        assert_eq!(entry.length, Some(LengthHeader::Extrusion(18.0)));
    }

    #[test]
    fn named_only_requires_a_name() {
        let mut scene = SceneGraph::new();
        let key = scene.add_root(pad("Anon", vec![Constraint::dimension("", 5.0)], 18.0));
        let mut agg = Aggregates::default();
        record_named(&scene, key, ReportMode::Constraints, &mut agg);
        assert!(agg.constraints.is_empty());
    }

    #[test]
    fn hole_depth_header_only_for_fixed_depth() {
        let mut scene = SceneGraph::new();
        let fixed = scene.add_root(Node::new(
            "Pilot",
            NodeKind::Hole {
                profile: Profile::default().with_constraint(Constraint::dimension("R", 2.5)),
                depth: DepthMode::Dimension(30.0),
                base: None,
            },
        ));
        let through = scene.add_root(Node::new(
            "Through",
            NodeKind::Hole {
                profile: Profile::default().with_constraint(Constraint::dimension("R", 4.0)),
                depth: DepthMode::ThroughAll,
                base: None,
            },
        ));
        let mut agg = Aggregates::default();
        record_named(&scene, fixed, ReportMode::Constraints, &mut agg);
        record_named(&scene, through, ReportMode::Constraints, &mut agg);

        assert_eq!(
            agg.constraints.get(&"Pilot".to_string()).unwrap().length,
            Some(LengthHeader::HoleDepth(30.0))
        );
        assert_eq!(agg.constraints.get(&"Through".to_string()).unwrap().length, None);
    }

    #[test]
    fn repeated_holes_list_their_host_once() {
        let mut scene = SceneGraph::new();
        let side = scene.add_root(pad(
            "Side",
            vec![Constraint::dimension("Width", 400.0)],
            18.0,
        ));
        let hole = scene.add_root(Node::new(
            "Dowel hole",
            NodeKind::Hole {
                profile: Profile::default().with_constraint(Constraint::dimension("R", 4.0)),
                depth: DepthMode::Dimension(12.0),
                base: Some(side),
            },
        ));

        let mut agg = Aggregates::default();
        for _ in 0..3 {
            record_named(&scene, hole, ReportMode::DetailedHoles, &mut agg);
        }

        // Quantity counts every instance; the host listing does not.
        assert_eq!(
            agg.constraints.get(&"Dowel hole".to_string()).unwrap().quantity,
            3
        );
        let hosts: Vec<_> = agg.hole_hosts.iter().collect();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].1, &vec!["Dowel hole".to_string()]);
    }

    #[test]
    fn all_constraints_collapse_identical_geometry() {
        let mut scene = SceneGraph::new();
        let a = scene.add_root(pad(
            "Left",
            vec![
                Constraint::dimension("Width", 400.0),
                Constraint::dimension("", 720.0),
            ],
            18.0,
        ));
        // Same values in another order, different naming.
        let b = scene.add_root(pad(
            "Right",
            vec![
                Constraint::dimension("", 720.0),
                Constraint::dimension("W", 400.0),
            ],
            18.0,
        ));
        let mut agg = Aggregates::default();
        record_all(&scene, a, &mut agg);
        record_all(&scene, b, &mut agg);

        assert_eq!(agg.constraints.len(), 1);
        let (_, entry) = agg.constraints.iter().next().unwrap();
        assert_eq!(entry.quantity, 2);
        // Unnamed constraints keep the placeholder marker.
        assert!(entry.pairs.iter().any(|p| p.name == UNNAMED));
    }

    #[test]
    fn all_constraints_drop_zero_values() {
        let mut scene = SceneGraph::new();
        let key = scene.add_root(pad(
            "Front",
            vec![
                Constraint::dimension("Zero", 0.0),
                Constraint::dimension("Width", 400.0),
            ],
            18.0,
        ));
        let mut agg = Aggregates::default();
        record_all(&scene, key, &mut agg);
        let (_, entry) = agg.constraints.iter().next().unwrap();
        assert_eq!(entry.pairs.len(), 1);
    }
}
