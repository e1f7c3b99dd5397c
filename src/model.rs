//! Read-only snapshots of the external application's object model, plus the
//! flattened output rows produced by the traversals. Nothing here is mutated
//! after it has been fetched or emitted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PLACEHOLDER_LOADCASE_NAME;

/// Analysis type requested from the solver. Only the first-order linear
/// results are extracted; the other variants exist because the remoting API
/// accepts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisType {
    FirstOrderLinear,
    FirstOrderNonLinear,
    SecondOrderLinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadingValueKind {
    Force,
    Moment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadingDirection {
    Axial,
    Major,
    Minor,
}

/// Result flavour requested per loading query. Base is the unfactored result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadingResultKind {
    Base,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceInfo {
    pub pid: u32,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub path: std::path::PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverModelId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsId(pub u32);

/// Opaque handle to a member/loadcase loading result held by the remote
/// application. Obtained once per combination and reused for every sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadingRef(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loadcase {
    pub id: Uuid,
    pub name: String,
}

impl Loadcase {
    /// The model carries an empty placeholder loadcase whose name is the
    /// sentinel `"0 "`. It holds no real loading data and is excluded from
    /// every output. The sentinel's origin is unclear; treat this as a filter
    /// policy, not a domain rule.
    pub fn is_placeholder(&self) -> bool {
        self.name == PLACEHOLDER_LOADCASE_NAME
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberInfo {
    pub id: Uuid,
    pub name: String,
    pub member_type: String,
    pub span_count: usize,
}

/// One span of a member. Lengths are in the application's native unit
/// (millimetres). Span indices are 0-based and contiguous within a member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpanInfo {
    pub index: usize,
    pub length: f64,
    pub section: String,
    pub material: String,
}

/// Raw nodal displacement record as returned by the solver: translations in
/// native length units, rotations in radians.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodalDisplacement {
    pub node_index: u32,
    pub mx: f64,
    pub my: f64,
    pub mz: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}

/// The six force/moment components sampled at one position, already converted
/// to the output unit system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceSet {
    pub axial: f64,
    pub shear_major: f64,
    pub shear_minor: f64,
    pub torsion: f64,
    pub moment_major: f64,
    pub moment_minor: f64,
}

/// One flattened output row for a (member, span, loadcase, position) tuple.
/// Lengths are already in the target unit system; `position` is the ratio
/// along the span, not an absolute length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberForceRow {
    pub guid: Uuid,
    pub name: String,
    pub member_type: String,
    pub section: String,
    pub material: String,
    pub total_length: f64,
    pub span: usize,
    pub span_length: f64,
    pub position: f64,
    pub loadcase: String,
    pub forces: ForceSet,
}

/// One flattened output row for a (node, loadcase) tuple. Translations are
/// converted to the output length unit; rotations stay in radians.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodalDisplacementRow {
    pub node_index: u32,
    pub loadcase: String,
    pub mx: f64,
    pub my: f64,
    pub mz: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}
