// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Aggregation database: the mutable accumulator tables a scan fills
//! and the report builder consumes.
//!
//! All tables are increment-only. Iteration order is insertion order,
//! because traversal order decides which qualifier ends up on a shared
//! key and the report must stay stable run to run.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::hash::Hash;

use cutlist_core::ConstraintKind;

use crate::keys::{Dim, DimensionKey};

/// Hash map that remembers insertion order of keys.
#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    map: FxHashMap<K, V>,
    order: Vec<K>,
}

impl<K: Eq + Hash + Clone, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            map: FxHashMap::default(),
            order: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> OrderedMap<K, V> {
    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    /// Returns the value for `key`, inserting `default()` first when
    /// the key is new.
    pub fn get_or_insert_with(&mut self, key: &K, default: impl FnOnce() -> V) -> &mut V {
        if !self.map.contains_key(key) {
            self.order.push(key.clone());
            self.map.insert(key.clone(), default());
        }
        self.map.get_mut(key).expect("key just inserted")
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.order.iter().map(|k| (k, &self.map[k]))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }
}

/// Per-key quantity and cumulative area.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DimensionEntry {
    pub quantity: u32,
    pub area_mm2: f64,
}

/// Per-thickness quantity and cumulative area; ignores qualifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThicknessEntry {
    pub quantity: u32,
    pub area_mm2: f64,
}

/// Global edge-length totals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeTotals {
    pub total_mm: f64,
    pub banded_mm: f64,
}

impl EdgeTotals {
    /// Edge length without banding. Never negative: banded edges are
    /// a subset of all edges.
    pub fn unbanded_mm(&self) -> f64 {
        self.total_mm - self.banded_mm
    }
}

/// Classification of one face slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaceTag {
    /// Face color matches the shell; not an override.
    #[default]
    None,
    /// True edge face carrying edge-banding.
    Edge,
    /// Decorative override on a large surface, not an edge.
    Surface,
}

/// Sentinel length for overrides that are not true edges.
pub const NOT_AN_EDGE: f64 = -1.0;

/// Per-face edge-band record of an instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeBandRecord {
    pub tag: FaceTag,
    /// Measured edge length, or [`NOT_AN_EDGE`] for surfaces.
    pub length_mm: f64,
    /// Veneer / edge-band code, empty for unclassified faces.
    pub code: String,
}

/// Length header of a constraint listing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LengthHeader {
    /// Extrusion length of a pad.
    Extrusion(f64),
    /// Configured depth of a drilled hole with a fixed dimension.
    HoleDepth(f64),
}

/// A decoded (name, typed value) constraint pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintValue {
    pub name: String,
    pub kind: ConstraintKind,
    pub value: f64,
}

/// One row of a constraint report.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintEntry {
    pub quantity: u32,
    pub label: String,
    pub length: Option<LengthHeader>,
    pub pairs: Vec<ConstraintValue>,
}

/// Typed value of an auxiliary sub-report entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtraValue {
    /// Millimeter length rendered with the dimension unit.
    Length(f64),
    /// Fractional value rendered with one decimal.
    Float(f64),
    /// Free-form text.
    Text(String),
}

/// One row of the auxiliary sub-report table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtraEntry {
    pub quantity: u32,
    pub names: Vec<String>,
    pub values: Vec<ExtraValue>,
}

/// Scan diagnostics: per-instance faults that were isolated rather
/// than propagated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    /// Instances skipped because no extractor applies.
    pub skipped: u32,
    /// Instances whose extractor failed on malformed data.
    pub failed: u32,
    pub notes: Vec<String>,
}

impl Diagnostics {
    pub fn note(&mut self, message: impl Into<String>) {
        self.notes.push(message.into());
    }
}

/// Everything a scan accumulates; owned by the top-level scan call
/// and handed to the report builder afterwards.
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    /// Main table: canonical key → quantity, cumulative area.
    pub dimensions: OrderedMap<DimensionKey, DimensionEntry>,
    /// Secondary table keyed by thickness alone.
    pub thickness: OrderedMap<Dim, ThicknessEntry>,
    /// Global edge totals.
    pub edges: EdgeTotals,
    /// Per-key face records; re-insertion overwrites (last write wins,
    /// by traversal order).
    pub edge_faces: FxHashMap<DimensionKey, SmallVec<[EdgeBandRecord; 8]>>,
    /// Constraint report rows, keyed by dedup key.
    pub constraints: OrderedMap<String, ConstraintEntry>,
    /// Detailed-holes mode: host part label → hole labels.
    pub hole_hosts: OrderedMap<String, Vec<String>>,
    /// Auxiliary sub-report rows.
    pub extras: OrderedMap<String, ExtraEntry>,
    pub diagnostics: Diagnostics,
}

impl Aggregates {
    /// Registers one part instance in the dimension and thickness
    /// tables: new keys start at quantity 1, repeats increment and
    /// accumulate area.
    pub fn record_part(&mut self, key: DimensionKey, area_mm2: f64) {
        let thickness = key.thickness();
        let entry = self
            .dimensions
            .get_or_insert_with(&key, DimensionEntry::default);
        entry.quantity += 1;
        entry.area_mm2 += area_mm2;

        let entry = self
            .thickness
            .get_or_insert_with(&thickness, ThicknessEntry::default);
        entry.quantity += 1;
        entry.area_mm2 += area_mm2;
    }

    /// Registers an approximated instance: quantity only, no exact
    /// area is known.
    pub fn record_approximation(&mut self, key: DimensionKey) {
        let entry = self
            .dimensions
            .get_or_insert_with(&key, DimensionEntry::default);
        entry.quantity += 1;
    }

    /// Adds to the running total edge length.
    pub fn record_edge_total(&mut self, edge_mm: f64) {
        self.edges.total_mm += edge_mm;
    }

    /// Records per-face classification for a key and adds the banded
    /// share to the banded total. Overwrites any earlier face records
    /// for the same key.
    pub fn record_edgeband(
        &mut self,
        key: DimensionKey,
        faces: SmallVec<[EdgeBandRecord; 8]>,
        banded_mm: f64,
    ) {
        self.edges.banded_mm += banded_mm;
        self.edge_faces.insert(key, faces);
    }

    /// Inserts a constraint row, or bumps its quantity when the dedup
    /// key repeats. Returns true when the row is new.
    pub fn record_constraints(&mut self, dedup_key: String, entry: ConstraintEntry) -> bool {
        if self.constraints.contains_key(&dedup_key) {
            self.constraints
                .get_or_insert_with(&dedup_key, || unreachable!())
                .quantity += 1;
            return false;
        }
        self.constraints.get_or_insert_with(&dedup_key, || entry);
        true
    }

    /// Appends a hole label under its host part.
    pub fn record_hole_host(&mut self, host: String, hole_label: String) {
        self.hole_hosts
            .get_or_insert_with(&host, Vec::new)
            .push(hole_label);
    }

    /// Inserts an auxiliary row, or bumps quantity on a repeated key.
    /// With `update` set, a repeat also replaces names and values
    /// (measurement lists grow this way).
    pub fn record_extra(&mut self, key: String, entry: ExtraEntry, update: bool) {
        if self.extras.contains_key(&key) {
            let existing = self.extras.get_or_insert_with(&key, || unreachable!());
            existing.quantity += 1;
            if update {
                existing.names = entry.names;
                existing.values = entry.values;
            }
            return;
        }
        self.extras.get_or_insert_with(&key, || ExtraEntry {
            quantity: 1,
            ..entry
        });
    }
}
