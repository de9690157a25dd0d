// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Report rendering against an abstract spreadsheet sink.
//!
//! The writer never touches a file format; it emits cell values,
//! merges and styles through [`ReportSink`], so the same layout works
//! for a spreadsheet document, a CSV shim or a test recorder.

use std::fmt;

use cutlist_core::{format_rounded, Color, ConstraintKind};

use crate::aggregate::{Aggregates, ExtraValue, LengthHeader};
use crate::config::{ReportMode, ScanConfig};

/// One spreadsheet cell, column letter plus 1-based row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAddr {
    pub col: char,
    pub row: u32,
}

impl CellAddr {
    pub fn new(col: char, row: u32) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for CellAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.col, self.row)
    }
}

/// Inclusive rectangular cell range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub from: CellAddr,
    pub to: CellAddr,
}

impl CellRange {
    pub fn new(from: CellAddr, to: CellAddr) -> Self {
        Self { from, to }
    }

    /// Full-width range over one row.
    fn row(row: u32) -> Self {
        Self::new(CellAddr::new('A', row), CellAddr::new('G', row))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.from, self.to)
    }
}

/// Cell text style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Bold,
}

/// Output abstraction for report writers.
pub trait ReportSink {
    fn set_cell(&mut self, addr: CellAddr, value: &str);
    fn merge_range(&mut self, range: CellRange);
    fn set_style(&mut self, range: CellRange, style: Style);
    fn set_background(&mut self, range: CellRange, color: Color);
    fn set_column_width(&mut self, col: char, width: u32);
}

const HEADER_BG: Color = Color::rgb(222, 222, 222);

/// Renders the accumulated tables into `sink`.
///
/// Layout follows the active report mode: dimension modes get the
/// quantity table plus optional thickness and edge sections,
/// constraint modes get the constraint listing. Auxiliary sub-report
/// rows always come last.
pub fn write_cutlist(agg: &Aggregates, config: &ScanConfig, sink: &mut dyn ReportSink) {
    for (col, width) in [
        ('A', 70),
        ('B', 140),
        ('C', 80),
        ('D', 20),
        ('E', 80),
        ('F', 80),
        ('G', 100),
    ] {
        sink.set_column_width(col, width);
    }

    let mut row = if config.mode.is_constraint_mode() {
        write_constraints(agg, config, sink)
    } else {
        write_dimensions(agg, config, sink)
    };

    if config.mode == ReportMode::DetailedHoles && !agg.hole_hosts.is_empty() {
        row = write_hole_hosts(agg, sink, row);
    }

    write_extras(agg, config, sink, row);
}

fn header(sink: &mut dyn ReportSink, row: u32) {
    sink.set_style(CellRange::row(row), Style::Bold);
    sink.set_background(CellRange::row(row), HEADER_BG);
}

/// Dimension-mode body. Returns the next free row.
fn write_dimensions(agg: &Aggregates, config: &ScanConfig, sink: &mut dyn ReportSink) -> u32 {
    let unit = config.dimension_unit;

    sink.set_cell(CellAddr::new('A', 1), "Quantity");
    if config.mode.wants_label()
        || config.mode.wants_group()
        || config.mode == ReportMode::Approximation
    {
        sink.set_cell(CellAddr::new('B', 1), "Name");
    }
    sink.set_cell(CellAddr::new('C', 1), "Dimensions");
    sink.merge_range(CellRange::new(CellAddr::new('C', 1), CellAddr::new('E', 1)));
    sink.set_cell(CellAddr::new('F', 1), "Thickness");
    sink.set_cell(
        CellAddr::new('G', 1),
        &format!("Area {}", config.area_unit.symbol()),
    );
    header(sink, 1);

    let mut row = 2;
    for (key, entry) in agg.dimensions.iter() {
        let [d1, d2] = key.face_dims();
        sink.set_cell(CellAddr::new('A', row), &format!("{} x", entry.quantity));
        let qualifier: Vec<&str> = key.label().into_iter().chain(key.group()).collect();
        if !qualifier.is_empty() {
            sink.set_cell(CellAddr::new('B', row), &qualifier.join(", "));
        }
        sink.set_cell(CellAddr::new('C', row), &unit.format(d1.mm()));
        sink.set_cell(CellAddr::new('D', row), "x");
        sink.set_cell(CellAddr::new('E', row), &unit.format(d2.mm()));
        sink.set_cell(CellAddr::new('F', row), &unit.format(key.thickness().mm()));
        if entry.area_mm2 > 0.0 {
            sink.set_cell(
                CellAddr::new('G', row),
                &config.area_unit.format(entry.area_mm2),
            );
        }
        row += 1;
    }
    row += 1;

    if config.reports.thickness_summary && !agg.thickness.is_empty() {
        sink.set_cell(CellAddr::new('A', row), "Thickness");
        sink.set_cell(
            CellAddr::new('G', row),
            &format!("Area {}", config.area_unit.symbol()),
        );
        header(sink, row);
        row += 1;
        for (thickness, entry) in agg.thickness.iter() {
            sink.set_cell(CellAddr::new('A', row), &format!("{} x", entry.quantity));
            sink.set_cell(CellAddr::new('F', row), &unit.format(thickness.mm()));
            sink.set_cell(
                CellAddr::new('G', row),
                &config.area_unit.format(entry.area_mm2),
            );
            row += 1;
        }
        row += 1;
    }

    if config.reports.edgeband_info {
        let edges = &agg.edges;
        let edge_unit = config.edge_unit;
        sink.set_cell(CellAddr::new('A', row), "Edge size");
        header(sink, row);
        row += 1;
        for (name, mm) in [
            ("Total", edges.total_mm),
            ("Edgeband", edges.banded_mm),
            ("Raw", edges.unbanded_mm()),
        ] {
            sink.set_cell(CellAddr::new('A', row), name);
            sink.set_cell(
                CellAddr::new('C', row),
                &format!("{} {}", edge_unit.format(mm), edge_unit.symbol()),
            );
            row += 1;
        }
        row += 1;
    }

    row
}

/// Constraint-mode body. Returns the next free row.
fn write_constraints(agg: &Aggregates, config: &ScanConfig, sink: &mut dyn ReportSink) -> u32 {
    let unit = config.dimension_unit;

    sink.set_cell(CellAddr::new('A', 1), "Quantity");
    sink.set_cell(CellAddr::new('B', 1), "Name");
    sink.set_cell(CellAddr::new('C', 1), "Length");
    sink.set_cell(CellAddr::new('D', 1), "Constraints");
    sink.merge_range(CellRange::new(CellAddr::new('D', 1), CellAddr::new('G', 1)));
    header(sink, 1);

    let mut row = 2;
    for (_, entry) in agg.constraints.iter() {
        sink.set_cell(CellAddr::new('A', row), &format!("{} x", entry.quantity));
        sink.set_cell(CellAddr::new('B', row), &entry.label);
        match entry.length {
            Some(LengthHeader::Extrusion(mm)) => {
                sink.set_cell(CellAddr::new('C', row), &unit.format(mm));
            }
            Some(LengthHeader::HoleDepth(mm)) => {
                sink.set_cell(CellAddr::new('C', row), &format!("depth {}", unit.format(mm)));
            }
            None => {}
        }
        let pairs: Vec<String> = entry
            .pairs
            .iter()
            .map(|p| match p.kind {
                ConstraintKind::Dimension => {
                    format!("{} = {} {}", p.name, unit.format(p.value), unit.symbol())
                }
                ConstraintKind::Angle => {
                    format!("{} = {}°", p.name, format_rounded(p.value, 1))
                }
            })
            .collect();
        sink.set_cell(CellAddr::new('D', row), &pairs.join("; "));
        row += 1;
    }
    row + 1
}

/// Detailed-holes section: one row per host part.
fn write_hole_hosts(agg: &Aggregates, sink: &mut dyn ReportSink, mut row: u32) -> u32 {
    sink.set_cell(CellAddr::new('A', row), "Holes");
    header(sink, row);
    row += 1;
    for (host, holes) in agg.hole_hosts.iter() {
        sink.set_cell(CellAddr::new('A', row), host);
        sink.set_cell(CellAddr::new('C', row), &holes.join(", "));
        row += 1;
    }
    row + 1
}

/// Auxiliary sub-report rows (measurements, mounting, profiles,
/// decorations, grain).
fn write_extras(agg: &Aggregates, config: &ScanConfig, sink: &mut dyn ReportSink, mut row: u32) {
    if agg.extras.is_empty() {
        return;
    }

    sink.set_cell(CellAddr::new('A', row), "Additional reports");
    header(sink, row);
    row += 1;

    for (key, entry) in agg.extras.iter() {
        sink.set_cell(CellAddr::new('A', row), &format!("{} x", entry.quantity));
        sink.set_cell(CellAddr::new('B', row), key);
        let details: Vec<String> = entry
            .names
            .iter()
            .zip(&entry.values)
            .map(|(name, value)| {
                let rendered = match value {
                    ExtraValue::Length(mm) => format!(
                        "{} {}",
                        config.dimension_unit.format(*mm),
                        config.dimension_unit.symbol()
                    ),
                    ExtraValue::Float(v) => format_rounded(*v, 1),
                    ExtraValue::Text(text) => text.clone(),
                };
                format!("{name}: {rendered}")
            })
            .collect();
        if !details.is_empty() {
            sink.set_cell(CellAddr::new('C', row), &details.join("; "));
        }
        row += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{ConstraintEntry, ConstraintValue, ExtraEntry};
    use crate::keys::{canonicalize, DimensionKey};
    use rustc_hash::FxHashMap;

    /// Sink that records everything for assertions.
    #[derive(Default)]
    struct Recorder {
        cells: FxHashMap<String, String>,
        merges: Vec<String>,
        bold_rows: Vec<String>,
    }

    impl ReportSink for Recorder {
        fn set_cell(&mut self, addr: CellAddr, value: &str) {
            self.cells.insert(addr.to_string(), value.to_string());
        }

        fn merge_range(&mut self, range: CellRange) {
            self.merges.push(range.to_string());
        }

        fn set_style(&mut self, range: CellRange, _style: Style) {
            self.bold_rows.push(range.to_string());
        }

        fn set_background(&mut self, _range: CellRange, _color: Color) {}

        fn set_column_width(&mut self, _col: char, _width: u32) {}
    }

    fn cell<'a>(rec: &'a Recorder, addr: &str) -> &'a str {
        rec.cells
            .get(addr)
            .unwrap_or_else(|| panic!("no cell {addr}"))
    }

    #[test]
    fn quantity_layout() {
        let mut agg = Aggregates::default();
        let key = DimensionKey::new(canonicalize(18.0, 400.0, 600.0), None, None);
        agg.record_part(key.clone(), 240_000.0);
        agg.record_part(key, 240_000.0);

        let mut rec = Recorder::default();
        write_cutlist(&agg, &ScanConfig::default(), &mut rec);

        assert_eq!(cell(&rec, "A1"), "Quantity");
        assert!(rec.merges.contains(&"C1:E1".to_string()));
        assert_eq!(cell(&rec, "A2"), "2 x");
        assert_eq!(cell(&rec, "C2"), "400");
        assert_eq!(cell(&rec, "D2"), "x");
        assert_eq!(cell(&rec, "E2"), "600");
        assert_eq!(cell(&rec, "F2"), "18");
        // Two panels of 0.24 m² each.
        assert_eq!(cell(&rec, "G2"), "0.48");
    }

    #[test]
    fn thickness_summary_follows_main_table() {
        let mut agg = Aggregates::default();
        agg.record_part(
            DimensionKey::new(canonicalize(18.0, 400.0, 600.0), None, None),
            240_000.0,
        );
        agg.record_part(
            DimensionKey::new(canonicalize(12.0, 300.0, 500.0), None, None),
            150_000.0,
        );

        let mut rec = Recorder::default();
        write_cutlist(&agg, &ScanConfig::default(), &mut rec);

        // Main rows 2-3, blank 4, summary header row 5.
        assert_eq!(cell(&rec, "A5"), "Thickness");
        assert_eq!(cell(&rec, "F6"), "18");
        assert_eq!(cell(&rec, "G6"), "0.24");
        assert_eq!(cell(&rec, "F7"), "12");
    }

    #[test]
    fn edge_totals_render_in_meters() {
        let mut agg = Aggregates::default();
        agg.record_part(
            DimensionKey::new(canonicalize(18.0, 400.0, 600.0), None, None),
            240_000.0,
        );
        agg.record_edge_total(2_000.0);

        let mut config = ScanConfig::default();
        config.reports.thickness_summary = false;
        let mut rec = Recorder::default();
        write_cutlist(&agg, &config, &mut rec);

        assert_eq!(cell(&rec, "A4"), "Edge size");
        assert_eq!(cell(&rec, "A5"), "Total");
        assert_eq!(cell(&rec, "C5"), "2 m");
        assert_eq!(cell(&rec, "A7"), "Raw");
    }

    #[test]
    fn constraint_layout() {
        let mut agg = Aggregates::default();
        agg.record_constraints(
            "Front".into(),
            ConstraintEntry {
                quantity: 1,
                label: "Front".into(),
                length: Some(LengthHeader::Extrusion(18.0)),
                pairs: vec![
                    ConstraintValue {
                        name: "Width".into(),
                        kind: ConstraintKind::Dimension,
                        value: 400.0,
                    },
                    ConstraintValue {
                        name: "Slope".into(),
                        kind: ConstraintKind::Angle,
                        value: 45.0,
                    },
                ],
            },
        );

        let mut rec = Recorder::default();
        write_cutlist(
            &agg,
            &ScanConfig::with_mode(ReportMode::Constraints),
            &mut rec,
        );

        assert_eq!(cell(&rec, "B2"), "Front");
        assert_eq!(cell(&rec, "C2"), "18");
        assert_eq!(cell(&rec, "D2"), "Width = 400 mm; Slope = 45°");
    }

    #[test]
    fn extras_come_last() {
        let mut agg = Aggregates::default();
        agg.record_part(
            DimensionKey::new(canonicalize(18.0, 400.0, 600.0), None, None),
            240_000.0,
        );
        agg.record_extra(
            "Mounting, wood, 8 x 35".into(),
            ExtraEntry {
                quantity: 1,
                names: vec!["Diameter".into()],
                values: vec![ExtraValue::Float(8.0)],
            },
            false,
        );

        let mut config = ScanConfig::default();
        config.reports.thickness_summary = false;
        config.reports.edgeband_info = false;
        let mut rec = Recorder::default();
        write_cutlist(&agg, &config, &mut rec);

        assert_eq!(cell(&rec, "A4"), "Additional reports");
        assert_eq!(cell(&rec, "B5"), "Mounting, wood, 8 x 35");
        assert_eq!(cell(&rec, "C5"), "Diameter: 8");
    }
}
