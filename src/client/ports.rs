//! Narrow query interface onto the external analysis application. The
//! application's document/model/solver objects are never modelled here; the
//! trait exposes only the queries the extraction pipeline needs, so tests can
//! swap in an in-memory model.

use uuid::Uuid;

use crate::error::Result;
use crate::model::{
    AnalysisType, DocumentInfo, InstanceInfo, Loadcase, LoadingDirection, LoadingRef,
    LoadingResultKind, LoadingValueKind, MemberInfo, NodalDisplacement, ResultsId, SolverModelId,
    SpanInfo,
};

/// Read-only remoting queries against a running analysis application.
///
/// All methods are independent sequential calls; the pipeline awaits each one
/// before issuing the next, so implementations never see concurrent requests.
#[allow(async_fn_in_trait)]
pub trait ModelApi {
    /// Application instances reachable on the local machine.
    async fn running_instances(&self) -> Result<Vec<InstanceInfo>>;

    /// The document currently open in the instance, if any.
    async fn active_document(&self) -> Result<Option<DocumentInfo>>;

    /// Whether the document contains a structural model.
    async fn has_model(&self) -> Result<bool>;

    /// Solver models available for the given analysis type.
    async fn solver_models(&self, analysis: AnalysisType) -> Result<Vec<SolverModelId>>;

    /// Results of a solver model, if it has been solved.
    async fn solver_results(&self, solver: SolverModelId) -> Result<Option<ResultsId>>;

    /// Identifiers of the loadcases the solver actually solved.
    async fn solved_loading(&self, results: ResultsId) -> Result<Vec<Uuid>>;

    /// Every loadcase defined in the model, in model order.
    async fn loadcases(&self) -> Result<Vec<Loadcase>>;

    /// Every member in the model, in model order.
    async fn members(&self) -> Result<Vec<MemberInfo>>;

    /// The spans of a member, in index order.
    async fn spans(&self, member: Uuid) -> Result<Vec<SpanInfo>>;

    /// Open the loading result for a member/loadcase combination. `None`
    /// means the provider has no result for the pair; the combination is
    /// skipped, not treated as fatal.
    async fn open_loading(
        &self,
        member: Uuid,
        loadcase: Uuid,
        analysis: AnalysisType,
        result_kind: LoadingResultKind,
    ) -> Result<Option<LoadingRef>>;

    /// Candidate values of one force/moment component at an absolute position
    /// along a span. More than one candidate can come back at a discontinuity
    /// (approached from either side).
    async fn loading_values(
        &self,
        loading: LoadingRef,
        kind: LoadingValueKind,
        direction: LoadingDirection,
        span: usize,
        position: f64,
    ) -> Result<Vec<f64>>;

    /// Full nodal displacement set for one solved loadcase.
    async fn nodal_displacements(
        &self,
        results: ResultsId,
        loadcase: Uuid,
    ) -> Result<Vec<NodalDisplacement>>;
}
