//! The three fixed output schemas and the row-to-cells projections.

use crate::model::{MemberForceRow, NodalDisplacementRow};
use crate::writer::{Cell, Column, Schema};

const fn plain(name: &'static str) -> Column {
    Column { name, unit: None }
}

const fn unit(name: &'static str, unit: &'static str) -> Column {
    Column {
        name,
        unit: Some(unit),
    }
}

/// Workbook sheet name for the member force extraction.
pub const MEMBER_FORCES_SHEET: &str = "Member Forces";

/// 14-column sheet layout. Values stay in native units; no units row.
pub fn member_forces_sheet_schema() -> Schema {
    Schema::new(vec![
        plain("Name"),
        plain("Type"),
        plain("Section"),
        plain("Total Length"),
        plain("Span"),
        plain("Span Length"),
        plain("Load Case"),
        plain("Position"),
        plain("Fx"),
        plain("Fy"),
        plain("Fz"),
        plain("Mxx"),
        plain("Myy"),
        plain("Mzz"),
    ])
}

/// 16-column CSV layout in kip/feet with a units row.
pub fn member_forces_csv_schema() -> Schema {
    Schema::new(vec![
        plain("Guid"),
        plain("Name"),
        plain("Type"),
        plain("Section"),
        plain("Material"),
        unit("TotalLength", "[ft]"),
        plain("Span"),
        unit("SpanLength", "[ft]"),
        plain("Position"),
        plain("LoadCase"),
        unit("Axial", "[kip]"),
        unit("ShearMajor", "[kip]"),
        unit("ShearMinor", "[kip]"),
        unit("Torsion", "[kip-ft]"),
        unit("MomentMajor", "[kip-ft]"),
        unit("MomentMinor", "[kip-ft]"),
    ])
}

/// 8-column nodal deflection CSV layout: translations in inches, rotations
/// in radians.
pub fn nodal_displacements_schema() -> Schema {
    Schema::new(vec![
        plain("NodeIndex"),
        plain("LoadCase"),
        unit("Mx", "[in]"),
        unit("My", "[in]"),
        unit("Mz", "[in]"),
        unit("Rx", "[rad]"),
        unit("Ry", "[rad]"),
        unit("Rz", "[rad]"),
    ])
}

/// Sheet projection. The Fx..Mzz column mapping is historical and is kept
/// as-is: Fy carries the minor-axis shear and Fz the major-axis shear.
pub fn member_sheet_cells(row: &MemberForceRow) -> Vec<Cell> {
    vec![
        Cell::Text(row.name.clone()),
        Cell::Text(row.member_type.clone()),
        Cell::Text(row.section.clone()),
        Cell::Float(row.total_length),
        Cell::Int(row.span as i64),
        Cell::Float(row.span_length),
        Cell::Text(row.loadcase.clone()),
        Cell::Float(row.position),
        Cell::Float(row.forces.axial),
        Cell::Float(row.forces.shear_minor),
        Cell::Float(row.forces.shear_major),
        Cell::Float(row.forces.torsion),
        Cell::Float(row.forces.moment_major),
        Cell::Float(row.forces.moment_minor),
    ]
}

pub fn member_csv_cells(row: &MemberForceRow) -> Vec<Cell> {
    vec![
        Cell::Text(row.guid.to_string()),
        Cell::Text(row.name.clone()),
        Cell::Text(row.member_type.clone()),
        Cell::Text(row.section.clone()),
        Cell::Text(row.material.clone()),
        Cell::Float(row.total_length),
        Cell::Int(row.span as i64),
        Cell::Float(row.span_length),
        Cell::Float(row.position),
        Cell::Text(row.loadcase.clone()),
        Cell::Float(row.forces.axial),
        Cell::Float(row.forces.shear_major),
        Cell::Float(row.forces.shear_minor),
        Cell::Float(row.forces.torsion),
        Cell::Float(row.forces.moment_major),
        Cell::Float(row.forces.moment_minor),
    ]
}

pub fn nodal_csv_cells(row: &NodalDisplacementRow) -> Vec<Cell> {
    vec![
        Cell::Int(row.node_index as i64),
        Cell::Text(row.loadcase.clone()),
        Cell::Float(row.mx),
        Cell::Float(row.my),
        Cell::Float(row.mz),
        Cell::Float(row.rx),
        Cell::Float(row.ry),
        Cell::Float(row.rz),
    ]
}
