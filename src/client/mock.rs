//! In-memory stand-in for the remote application, used by unit tests across
//! the crate. Implements `ModelApi` over plain maps and records the positions
//! the sampler asks for.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

use crate::client::ports::ModelApi;
use crate::error::Result;
use crate::model::{
    AnalysisType, DocumentInfo, InstanceInfo, Loadcase, LoadingDirection, LoadingRef,
    LoadingResultKind, LoadingValueKind, MemberInfo, NodalDisplacement, ResultsId, SolverModelId,
    SpanInfo,
};

type ComponentKey = (u64, LoadingValueKind, LoadingDirection);

#[derive(Default)]
pub struct MockModel {
    pub instances: Vec<InstanceInfo>,
    pub document: Option<DocumentInfo>,
    pub model_present: bool,
    pub solver_models: Vec<SolverModelId>,
    pub results: Option<ResultsId>,
    pub solved: Vec<Uuid>,
    pub loadcases: Vec<Loadcase>,
    pub members: Vec<MemberInfo>,
    pub spans: HashMap<Uuid, Vec<SpanInfo>>,
    pub loadings: HashMap<(Uuid, Uuid), LoadingRef>,
    pub component_values: HashMap<ComponentKey, Vec<f64>>,
    pub displacements: HashMap<Uuid, Vec<NodalDisplacement>>,
    pub queried_positions: Mutex<Vec<(u64, usize, f64)>>,
    next_loading: Mutex<u64>,
}

impl MockModel {
    /// Empty model: no instance, no document, nothing solved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fully discovered model with a document in `doc_dir` and one solved
    /// first-order-linear solver model, ready for loadcases and members.
    pub fn solved(doc_dir: &Path) -> Self {
        Self {
            instances: vec![InstanceInfo {
                pid: 4242,
                version: "24.1".to_string(),
            }],
            document: Some(DocumentInfo {
                path: doc_dir.join("Model.tsmd"),
            }),
            model_present: true,
            solver_models: vec![SolverModelId(1)],
            results: Some(ResultsId(1)),
            ..Self::default()
        }
    }

    pub fn add_loadcase(&mut self, name: &str, solved: bool) -> Uuid {
        let id = Uuid::new_v4();
        self.loadcases.push(Loadcase {
            id,
            name: name.to_string(),
        });
        if solved {
            self.solved.push(id);
        }
        id
    }

    pub fn add_member(&mut self, name: &str, member_type: &str, spans: Vec<SpanInfo>) -> Uuid {
        let id = Uuid::new_v4();
        self.members.push(MemberInfo {
            id,
            name: name.to_string(),
            member_type: member_type.to_string(),
            span_count: spans.len(),
        });
        self.spans.insert(id, spans);
        id
    }

    pub fn span(index: usize, length: f64) -> SpanInfo {
        SpanInfo {
            index,
            length,
            section: "UB 305x165x40".to_string(),
            material: "S355".to_string(),
        }
    }

    /// Register a loading result for a member/loadcase pair with the same
    /// candidate list for all six components.
    pub fn set_uniform_loading(
        &mut self,
        member: Uuid,
        loadcase: Uuid,
        candidates: Vec<f64>,
    ) -> LoadingRef {
        let loading = self.alloc_loading(member, loadcase);
        for kind in [LoadingValueKind::Force, LoadingValueKind::Moment] {
            for direction in [
                LoadingDirection::Axial,
                LoadingDirection::Major,
                LoadingDirection::Minor,
            ] {
                self.component_values
                    .insert((loading.0, kind, direction), candidates.clone());
            }
        }
        loading
    }

    pub fn set_component(
        &mut self,
        loading: LoadingRef,
        kind: LoadingValueKind,
        direction: LoadingDirection,
        candidates: Vec<f64>,
    ) {
        self.component_values
            .insert((loading.0, kind, direction), candidates);
    }

    pub fn alloc_loading(&mut self, member: Uuid, loadcase: Uuid) -> LoadingRef {
        let mut next = self.next_loading.lock().unwrap();
        *next += 1;
        let loading = LoadingRef(*next);
        self.loadings.insert((member, loadcase), loading);
        loading
    }

    pub fn positions_queried(&self) -> Vec<(u64, usize, f64)> {
        self.queried_positions.lock().unwrap().clone()
    }
}

impl ModelApi for MockModel {
    async fn running_instances(&self) -> Result<Vec<InstanceInfo>> {
        Ok(self.instances.clone())
    }

    async fn active_document(&self) -> Result<Option<DocumentInfo>> {
        Ok(self.document.clone())
    }

    async fn has_model(&self) -> Result<bool> {
        Ok(self.model_present)
    }

    async fn solver_models(&self, _analysis: AnalysisType) -> Result<Vec<SolverModelId>> {
        Ok(self.solver_models.clone())
    }

    async fn solver_results(&self, _solver: SolverModelId) -> Result<Option<ResultsId>> {
        Ok(self.results)
    }

    async fn solved_loading(&self, _results: ResultsId) -> Result<Vec<Uuid>> {
        Ok(self.solved.clone())
    }

    async fn loadcases(&self) -> Result<Vec<Loadcase>> {
        Ok(self.loadcases.clone())
    }

    async fn members(&self) -> Result<Vec<MemberInfo>> {
        Ok(self.members.clone())
    }

    async fn spans(&self, member: Uuid) -> Result<Vec<SpanInfo>> {
        Ok(self.spans.get(&member).cloned().unwrap_or_default())
    }

    async fn open_loading(
        &self,
        member: Uuid,
        loadcase: Uuid,
        _analysis: AnalysisType,
        _result_kind: LoadingResultKind,
    ) -> Result<Option<LoadingRef>> {
        Ok(self.loadings.get(&(member, loadcase)).copied())
    }

    async fn loading_values(
        &self,
        loading: LoadingRef,
        kind: LoadingValueKind,
        direction: LoadingDirection,
        span: usize,
        position: f64,
    ) -> Result<Vec<f64>> {
        self.queried_positions
            .lock()
            .unwrap()
            .push((loading.0, span, position));
        Ok(self
            .component_values
            .get(&(loading.0, kind, direction))
            .cloned()
            .unwrap_or_default())
    }

    async fn nodal_displacements(
        &self,
        _results: ResultsId,
        loadcase: Uuid,
    ) -> Result<Vec<NodalDisplacement>> {
        Ok(self.displacements.get(&loadcase).cloned().unwrap_or_default())
    }
}
