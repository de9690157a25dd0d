// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scan configuration surface.
//!
//! Everything the settings dialog can choose is captured here; the
//! engine itself never reads global state.

use cutlist_core::{AreaUnit, LengthUnit};
use serde::{Deserialize, Serialize};

/// Report layout / content selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportMode {
    /// Quantity first, grouped purely by canonical dimensions.
    #[default]
    Quantity,
    /// One row per part label.
    Name,
    /// Grouped by the owning group's label.
    Group,
    /// Name rows extended with per-face edge-band columns.
    EdgeExtended,
    /// Edge-band plus drilled-hole details.
    DetailedHoles,
    /// Named-constraint listing instead of dimensions.
    Constraints,
    /// All-constraint listing for extruded parts.
    PadsAllConstraints,
    /// Bounding-box approximation of needed material.
    Approximation,
}

impl ReportMode {
    /// Key qualifier: append the instance label.
    pub fn wants_label(self) -> bool {
        matches!(
            self,
            ReportMode::Name | ReportMode::EdgeExtended | ReportMode::DetailedHoles
        )
    }

    /// Key qualifier: append the owning group's label.
    pub fn wants_group(self) -> bool {
        matches!(self, ReportMode::Group | ReportMode::DetailedHoles)
    }

    /// Constraint modes replace the dimension extractors entirely.
    pub fn is_constraint_mode(self) -> bool {
        matches!(self, ReportMode::Constraints | ReportMode::PadsAllConstraints)
    }
}

/// Visibility policy applied to every scanned instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisibilityPolicy {
    /// Include everything.
    #[default]
    Off,
    /// Exclude instances whose own visibility flag is off.
    Simple,
    /// Include everything, but hidden instances do not contribute to
    /// edge totals.
    EdgeExempt,
    /// Inherit visibility from the nearest structural container.
    ParentInherit,
    /// Hidden instances are excluded only when the nearest qualifying
    /// container is hidden too.
    RootInherit,
}

/// Which branch of a boolean cut is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CutContent {
    /// Report both base and tool.
    #[default]
    Both,
    BaseOnly,
    ToolOnly,
}

/// Independently combinable sub-report toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubReports {
    pub measurements: bool,
    pub mounting: bool,
    pub profiles: bool,
    pub decorations: bool,
    pub grain: bool,
    pub thickness_summary: bool,
    pub edgeband_info: bool,
}

impl Default for SubReports {
    fn default() -> Self {
        Self {
            measurements: true,
            mounting: true,
            profiles: true,
            decorations: false,
            grain: true,
            thickness_summary: true,
            edgeband_info: true,
        }
    }
}

/// Full configuration consumed by [`crate::scan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    pub mode: ReportMode,
    pub visibility: VisibilityPolicy,
    pub cut_content: CutContent,
    /// Unit for the dimension columns.
    pub dimension_unit: LengthUnit,
    /// Unit for edge-length totals.
    pub edge_unit: LengthUnit,
    /// Unit for the area column.
    pub area_unit: AreaUnit,
    /// Edge-band / veneer code recorded for classified edge faces.
    pub edgeband_code: String,
    pub reports: SubReports,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            mode: ReportMode::default(),
            visibility: VisibilityPolicy::default(),
            cut_content: CutContent::default(),
            dimension_unit: LengthUnit::Mm,
            edge_unit: LengthUnit::M,
            area_unit: AreaUnit::M2,
            edgeband_code: "PL55 PVC".to_string(),
            reports: SubReports::default(),
        }
    }
}

impl ScanConfig {
    /// Configuration for a given report mode, defaults elsewhere.
    pub fn with_mode(mode: ReportMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualifier_selection_per_mode() {
        assert!(!ReportMode::Quantity.wants_label());
        assert!(ReportMode::Name.wants_label());
        assert!(ReportMode::DetailedHoles.wants_label());
        assert!(ReportMode::DetailedHoles.wants_group());
        assert!(ReportMode::Group.wants_group());
        assert!(!ReportMode::Group.wants_label());
    }

    #[test]
    fn constraint_modes() {
        assert!(ReportMode::Constraints.is_constraint_mode());
        assert!(ReportMode::PadsAllConstraints.is_constraint_mode());
        assert!(!ReportMode::Approximation.is_constraint_mode());
    }
}
