// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sketch profiles and their geometric constraints.
//!
//! An extruded part is defined by a 2D profile (ordered edge lengths)
//! swept along an extrusion length. The profile also carries the named
//! geometric constraints used by the constraint report modes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Value category of a geometric constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConstraintKind {
    /// Linear dimension, millimeters.
    Dimension,
    /// Angular dimension, degrees.
    Angle,
}

/// A single geometric constraint of a sketch profile.
///
/// `name` may be empty (unnamed constraint) and may use one of the
/// legacy separator encodings decoded by the engine's constraint
/// extractor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Constraint {
    pub name: String,
    pub kind: ConstraintKind,
    pub value: f64,
}

impl Constraint {
    /// Named linear dimension constraint.
    pub fn dimension(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            kind: ConstraintKind::Dimension,
            value,
        }
    }

    /// Named angle constraint.
    pub fn angle(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            kind: ConstraintKind::Angle,
            value,
        }
    }

    /// True when this constraint carries no user-given name.
    pub fn is_unnamed(&self) -> bool {
        self.name.is_empty()
    }
}

/// A 2D sketch profile: ordered edge lengths plus constraints.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Profile {
    /// Ordered edge lengths, millimeters. The dimension extractor
    /// reads the first two as the sheet face dimensions.
    pub edges: Vec<f64>,
    pub constraints: Vec<Constraint>,
}

impl Profile {
    /// Rectangular profile with the two given edge lengths.
    pub fn rectangle(a: f64, b: f64) -> Self {
        Self {
            edges: vec![a, b, a, b],
            constraints: Vec::new(),
        }
    }

    /// Adds a constraint and returns the profile (builder style).
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}
