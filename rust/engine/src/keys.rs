// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical grouping keys for aggregation.
//!
//! Dimensions are canonicalized by sorting the three characteristic
//! lengths ascending, so any permutation of (W, H, L) groups under the
//! same key. The smallest dimension is the sheet thickness by domain
//! convention (sheet goods are always thinnest across the board); area
//! and edge length are derived from the two larger dimensions only.

use std::fmt;

/// Fixed-point dimension in hundredths of a millimeter.
///
/// Keys must hash and compare exactly; raw floats are rounded once,
/// here, and never re-rounded downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dim(i64);

impl Dim {
    pub fn from_mm(mm: f64) -> Self {
        Self((mm * 100.0).round() as i64)
    }

    pub fn mm(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let whole = (self.0 / 100).abs();
        let frac = self.0.abs() % 100;
        if frac == 0 {
            write!(f, "{sign}{whole}")
        } else if frac % 10 == 0 {
            write!(f, "{sign}{whole}.{}", frac / 10)
        } else {
            write!(f, "{sign}{whole}.{frac:02}")
        }
    }
}

/// Sorts three raw lengths ascending. Total ordering: a NaN sorts
/// after every number instead of panicking, and the resulting key is
/// rejected downstream like any other degenerate dimension.
pub fn canonicalize(w: f64, h: f64, l: f64) -> [f64; 3] {
    let mut dims = [w, h, l];
    dims.sort_by(f64::total_cmp);
    dims
}

/// Thickness: the smallest of the sorted triple.
pub fn thickness(sorted: [f64; 3]) -> f64 {
    sorted[0]
}

/// Sheet face area: product of the two larger dimensions, mm².
pub fn area_mm2(sorted: [f64; 3]) -> f64 {
    sorted[1] * sorted[2]
}

/// Sheet perimeter used for edge-banding totals: 2 × (d1 + d2), mm.
pub fn edge_mm(sorted: [f64; 3]) -> f64 {
    2.0 * (sorted[1] + sorted[2])
}

/// Axis extent from a (min, max) pair.
///
/// Historically derived through a six-case sign split; every case
/// reduces to the same subtraction, so only the subtraction remains.
pub fn axis_extent(min: f64, max: f64) -> f64 {
    max - min
}

/// Order-independent grouping key: sorted dimensions plus optional
/// label/group qualifiers chosen by the report mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DimensionKey {
    dims: [Dim; 3],
    label: Option<String>,
    group: Option<String>,
}

impl DimensionKey {
    pub fn new(sorted: [f64; 3], label: Option<String>, group: Option<String>) -> Self {
        Self {
            dims: [
                Dim::from_mm(sorted[0]),
                Dim::from_mm(sorted[1]),
                Dim::from_mm(sorted[2]),
            ],
            label,
            group,
        }
    }

    /// Thickness component of the key.
    pub fn thickness(&self) -> Dim {
        self.dims[0]
    }

    /// The two non-thickness dimensions, ascending.
    pub fn face_dims(&self) -> [Dim; 2] {
        [self.dims[1], self.dims[2]]
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }
}

impl fmt::Display for DimensionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.dims[0], self.dims[1], self.dims[2])?;
        if let Some(label) = &self.label {
            write!(f, ":{label}")?;
        }
        if let Some(group) = &self.group {
            write!(f, ":{group}")?;
        }
        Ok(())
    }
}
