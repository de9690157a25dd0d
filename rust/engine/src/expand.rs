// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transformation expansion: how many extra logical instances a node
//! implies, and where traversal continues.
//!
//! One exhaustive match routes every node kind to its handler; kinds
//! without structural or transform semantics fall through to a no-op
//! arm. Multipliers re-invoke the per-instance pipeline for the
//! referenced base parts without recomputing any geometry.

use cutlist_core::{CloneTarget, NodeKey, NodeKind, SubTransform};
use tracing::debug;

use crate::scan::{scan_list, select_part, Caller, ListKind, ScanContext};

/// Offers one scanned node to the structure and transform handlers.
pub(crate) fn apply(ctx: &mut ScanContext<'_>, key: NodeKey) {
    let scene = ctx.scene;
    match &scene[key].kind {
        // Structural containers expose their children to the traversal.
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

        // Transform nodes add extra logical instances.
        NodeKind::Mirror { source } => {
            // One extra instance; an unset source is a no-op.
            if let Some(source) = *source {
                select_part(ctx, source, Caller::Referenced);
            }
        }
        NodeKind::ArrayPattern { .. } => expand_array(ctx, key, false),
        NodeKind::Clone { .. } => expand_clone(ctx, key),
        NodeKind::MirroredFeature { originals } => {
            // Empty originals mean the mirror lives inside a
            // multi-transform; skip without error.
            if let Some(&original) = originals.first() {
                select_part(ctx, original, Caller::Referenced);
            }
        }
        NodeKind::LinearPattern {
            occurrences,
            originals,
        } => {
            if *occurrences == 0 {
                return;
            }
            // Only one original is supported; the base instance comes
            // from the normal scan of the original itself.
            if let Some(&original) = originals.first() {
                for _ in 0..occurrences - 1 {
                    select_part(ctx, original, Caller::Referenced);
                }
            }
        }
        NodeKind::MultiTransform {
            sub_transforms,
            originals,
        } => {
            let extra = multi_transform_multiplier(sub_transforms);
            let originals = originals.clone();
            debug!(extra, originals = originals.len(), "multi-transform expansion");
            for _ in 0..extra {
                for &original in &originals {
                    select_part(ctx, original, Caller::Referenced);
                }
            }
        }
        NodeKind::Link { target } => {
            // 1:1 alias: exactly one pass over the target.
            let target = *target;
            select_part(ctx, target, Caller::Referenced);
        }

        // Leaf parts and auxiliary kinds carry no expansion.
        _ => {}
    }
}

/// Array expansion. `self_mode` marks an array referenced by another
/// array: the inner pass must include the base instance as well, so
/// the multiplier is the full count rather than count − 1.
fn expand_array(ctx: &mut ScanContext<'_>, key: NodeKey, self_mode: bool) {
    let scene = ctx.scene;
    let NodeKind::ArrayPattern { kind, base } = &scene[key].kind else {
        return;
    };
    let (kind, base) = (*kind, *base);

    let mut multiplier = kind.total().saturating_sub(1);
    if self_mode {
        multiplier += 1;
    }

    match &scene[base].kind {
        // Array over array: recurse with self semantics.
        NodeKind::ArrayPattern { .. } => {
            for _ in 0..multiplier {
                expand_array(ctx, base, true);
            }
        }
        // Array over a compound of links: the multiplier applies to
        // every link independently.
        NodeKind::Compound { links } => {
            let links = links.clone();
            for link in links {
                for _ in 0..multiplier {
                    select_part(ctx, link, Caller::Referenced);
                }
            }
        }
        _ => {
            for _ in 0..multiplier {
                select_part(ctx, base, Caller::Referenced);
            }
        }
    }
}

/// Clone expansion: not a multiplier, a full traversal over the
/// referenced set.
pub(crate) fn expand_clone(ctx: &mut ScanContext<'_>, key: NodeKey) {
    let scene = ctx.scene;
    let NodeKind::Clone { target } = &scene[key].kind else {
        return;
    };
    match target {
        CloneTarget::Group(group) => {
            let children: Vec<NodeKey> = scene[*group]
                .kind
                .children()
                .map(|c| c.to_vec())
                .unwrap_or_default();
            scan_list(ctx, &children, ListKind::Nested);
        }
        CloneTarget::Feature(feature) => {
            let feature = *feature;
            scan_list(ctx, &[feature], ListKind::Nested);
        }
        CloneTarget::Objects(objects) => {
            let objects = objects.clone();
            scan_list(ctx, &objects, ListKind::Nested);
        }
    }
}

/// Combined multiplier of stacked sub-transforms: each nested mirror
/// doubles the instance count (it mirrors the already-transformed
/// result), linear occurrences sum. Returns total − 1.
fn multi_transform_multiplier(sub_transforms: &[SubTransform]) -> u32 {
    let mut mirrors = 0u32;
    let mut linear = 0u32;
    for sub in sub_transforms {
        match sub {
            SubTransform::Mirrored => mirrors += 1,
            SubTransform::LinearPattern { occurrences } => linear += occurrences,
        }
    }
    if linear == 0 {
        linear = 1;
    }
    (2u32.pow(mirrors) * linear).saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutlist_core::ArrayKind;

    #[test]
    fn multi_transform_multiplier_cases() {
        // Two mirrors and one linear pattern of 3: 2^2 * 3 - 1 = 11.
        let subs = vec![
            SubTransform::Mirrored,
            SubTransform::Mirrored,
            SubTransform::LinearPattern { occurrences: 3 },
        ];
        assert_eq!(multi_transform_multiplier(&subs), 11);

        // Mirrors only: 2^1 - 1 = 1.
        assert_eq!(multi_transform_multiplier(&[SubTransform::Mirrored]), 1);

        // Linear only: occurrences - 1.
        assert_eq!(
            multi_transform_multiplier(&[SubTransform::LinearPattern { occurrences: 4 }]),
            3
        );

        // No sub-transforms: no extra instances.
        assert_eq!(multi_transform_multiplier(&[]), 0);
    }

    #[test]
    fn array_totals() {
        assert_eq!(ArrayKind::Linear { x: 2, y: 3, z: 1 }.total(), 6);
        assert_eq!(ArrayKind::Polar { count: 5 }.total(), 5);
    }
}
