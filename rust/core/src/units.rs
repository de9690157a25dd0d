// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit conversion and formatting for report values.
//!
//! The model is millimeter-native. Reports may request meters or
//! inches for lengths and square meters / square millimeters / square
//! inches for areas; each unit carries its own rounding convention.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inches per millimeter.
const IN_PER_MM: f64 = 0.039_370_078_7;
/// Square inches per square millimeter.
const IN2_PER_MM2: f64 = 0.001_550_003_1;

/// Length unit for dimension and edge columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LengthUnit {
    #[default]
    Mm,
    M,
    In,
}

impl LengthUnit {
    /// Converts a millimeter value to this unit.
    pub fn convert(self, mm: f64) -> f64 {
        match self {
            LengthUnit::Mm => mm,
            LengthUnit::M => mm * 0.001,
            LengthUnit::In => mm * IN_PER_MM,
        }
    }

    /// Formats a millimeter value: integers for millimeters, three
    /// decimals (trailing zeros trimmed) otherwise.
    pub fn format(self, mm: f64) -> String {
        match self {
            LengthUnit::Mm => format!("{}", self.convert(mm).round() as i64),
            LengthUnit::M | LengthUnit::In => format_rounded(self.convert(mm), 3),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Mm => "mm",
            LengthUnit::M => "m",
            LengthUnit::In => "in",
        }
    }
}

/// Area unit for the area column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AreaUnit {
    Mm2,
    #[default]
    M2,
    In2,
}

impl AreaUnit {
    /// Converts a square-millimeter value to this unit.
    pub fn convert(self, mm2: f64) -> f64 {
        match self {
            AreaUnit::Mm2 => mm2,
            AreaUnit::M2 => mm2 * 1e-6,
            AreaUnit::In2 => mm2 * IN2_PER_MM2,
        }
    }

    /// Formats a square-millimeter value: integers for mm², six
    /// decimals (trailing zeros trimmed) otherwise.
    pub fn format(self, mm2: f64) -> String {
        match self {
            AreaUnit::Mm2 => format!("{}", self.convert(mm2).round() as i64),
            AreaUnit::M2 | AreaUnit::In2 => format_rounded(self.convert(mm2), 6),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            AreaUnit::Mm2 => "mm2",
            AreaUnit::M2 => "m2",
            AreaUnit::In2 => "in2",
        }
    }
}

/// Rounds to `decimals` places and trims trailing zeros, so 0.400000
/// prints as "0.4" and 240000.0 mm² prints as "0.24" m².
pub fn format_rounded(value: f64, decimals: u32) -> String {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    let mut s = format!("{:.*}", decimals as usize, rounded);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}
