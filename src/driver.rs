//! Orchestrates one extraction end to end: discover the solved model, walk
//! it, and write the output file next to the open document.
//!
//! Every missing link in the discovery chain is a clean "nothing to extract"
//! outcome, not an error. The application being closed, the model unsolved,
//! or the model empty are all normal states to find it in.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::client::ModelApi;
use crate::config::Config;
use crate::error::Result;
use crate::model::{AnalysisType, Loadcase, MemberInfo, ResultsId};
use crate::sampler::ResultSampler;
use crate::traversal::{MemberTraversal, NodalTraversal, SkippedCombination};
use crate::traversal::member::MemberProgress;
use crate::units::{UnitConverter, MM_TO_IN};
use crate::writer::schemas::{
    member_csv_cells, member_forces_csv_schema, member_forces_sheet_schema, member_sheet_cells,
    nodal_csv_cells, nodal_displacements_schema, MEMBER_FORCES_SHEET,
};
use crate::writer::{CsvTable, WorkbookTable};

/// What to extract and into which file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionTarget {
    /// Member internal forces, native units, xlsx workbook.
    MemberForcesWorkbook,
    /// Member internal forces, kip/ft, delimited text.
    MemberForcesCsv,
    /// Nodal deflections, inches and radians, delimited text.
    NodalDisplacements,
}

impl ExtractionTarget {
    pub fn label(&self) -> &'static str {
        match self {
            ExtractionTarget::MemberForcesWorkbook => "member-forces-workbook",
            ExtractionTarget::MemberForcesCsv => "member-forces-csv",
            ExtractionTarget::NodalDisplacements => "nodal-displacements",
        }
    }
}

/// Result of a completed extraction run.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub target: &'static str,
    pub output_path: PathBuf,
    pub rows_written: usize,
    pub members: usize,
    pub loadcases: usize,
    pub skipped: Vec<SkippedCombination>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Either a finished extraction or the reason there was nothing to do.
#[derive(Debug)]
pub enum ExtractionOutcome {
    Completed(ExtractionReport),
    /// Discovery stopped early. Reported as a single diagnostic line and a
    /// zero exit code.
    NothingToExtract(&'static str),
}

pub const NO_INSTANCES: &str = "No running instances of the analysis application found!";
pub const NO_DOCUMENT: &str = "No document was found in the application instance!";
pub const NO_MODEL: &str = "No model was found in the document!";
pub const NO_SOLVER_MODELS: &str =
    "No solver models found for the first order linear analysis type!";
pub const NO_RESULTS: &str = "No results found for the first order linear analysis type!";
pub const NO_SOLVED_IDS: &str = "No solved loading ids found!";
pub const NO_SOLVED_LOADCASES: &str = "No solved loadcases found!";
pub const NO_MEMBERS: &str = "No members found in the model!";

/// Everything discovery has to establish before a traversal can start.
struct SolvedModel {
    document_dir: PathBuf,
    results: ResultsId,
    solved_loadcases: Vec<Loadcase>,
    members: Vec<MemberInfo>,
}

pub struct ExtractionDriver<'a, A: ModelApi> {
    api: &'a A,
    config: &'a Config,
}

impl<'a, A: ModelApi> ExtractionDriver<'a, A> {
    pub fn new(api: &'a A, config: &'a Config) -> Self {
        Self { api, config }
    }

    pub async fn run(
        &self,
        target: ExtractionTarget,
        progress: Option<&dyn Fn(&MemberProgress)>,
    ) -> Result<ExtractionOutcome> {
        let started_at = Utc::now();
        let started = std::time::Instant::now();

        let model = match self.discover().await? {
            Ok(model) => model,
            Err(message) => return Ok(ExtractionOutcome::NothingToExtract(message)),
        };

        let output_path = self.output_path(target, &model);

        let (rows_written, members, loadcases, skipped) = match target {
            ExtractionTarget::MemberForcesWorkbook | ExtractionTarget::MemberForcesCsv => {
                if model.members.is_empty() {
                    return Ok(ExtractionOutcome::NothingToExtract(NO_MEMBERS));
                }
                self.extract_member_forces(target, &model, &output_path, progress)
                    .await?
            }
            ExtractionTarget::NodalDisplacements => {
                self.extract_nodal_displacements(&model, &output_path).await?
            }
        };

        Ok(ExtractionOutcome::Completed(ExtractionReport {
            target: target.label(),
            output_path,
            rows_written,
            members,
            loadcases,
            skipped,
            started_at,
            duration_ms: started.elapsed().as_millis() as u64,
        }))
    }

    /// Walk the discovery chain. `Err` carries the diagnostic for the first
    /// missing link.
    async fn discover(&self) -> Result<std::result::Result<SolvedModel, &'static str>> {
        if self.api.running_instances().await?.is_empty() {
            return Ok(Err(NO_INSTANCES));
        }

        let Some(document) = self.api.active_document().await? else {
            return Ok(Err(NO_DOCUMENT));
        };

        if !self.api.has_model().await? {
            return Ok(Err(NO_MODEL));
        }

        let solver_models = self
            .api
            .solver_models(AnalysisType::FirstOrderLinear)
            .await?;
        let Some(&solver) = solver_models.first() else {
            return Ok(Err(NO_SOLVER_MODELS));
        };

        let Some(results) = self.api.solver_results(solver).await? else {
            return Ok(Err(NO_RESULTS));
        };

        let solved_ids = self.api.solved_loading(results).await?;
        if solved_ids.is_empty() {
            return Ok(Err(NO_SOLVED_IDS));
        }

        // Model order is preserved; the solved id set only filters.
        let solved_loadcases: Vec<Loadcase> = self
            .api
            .loadcases()
            .await?
            .into_iter()
            .filter(|lc| solved_ids.contains(&lc.id))
            .collect();
        if solved_loadcases.is_empty() {
            return Ok(Err(NO_SOLVED_LOADCASES));
        }

        let members = self.api.members().await?;

        let document_dir = document
            .path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Ok(SolvedModel {
            document_dir,
            results,
            solved_loadcases,
            members,
        }))
    }

    fn output_path(&self, target: ExtractionTarget, model: &SolvedModel) -> PathBuf {
        let dir = self
            .config
            .output
            .directory
            .clone()
            .unwrap_or_else(|| model.document_dir.clone());

        let filename = match target {
            ExtractionTarget::MemberForcesWorkbook => &self.config.output.workbook_filename,
            ExtractionTarget::MemberForcesCsv => &self.config.output.member_csv_filename,
            ExtractionTarget::NodalDisplacements => &self.config.output.nodal_csv_filename,
        };

        dir.join(filename)
    }

    async fn extract_member_forces(
        &self,
        target: ExtractionTarget,
        model: &SolvedModel,
        output_path: &PathBuf,
        progress: Option<&dyn Fn(&MemberProgress)>,
    ) -> Result<(usize, usize, usize, Vec<SkippedCombination>)> {
        let (converter, step) = match target {
            ExtractionTarget::MemberForcesWorkbook => {
                (UnitConverter::native(), self.config.extraction.workbook_step)
            }
            _ => (UnitConverter::kip_feet(), self.config.extraction.csv_step),
        };

        let traversal = MemberTraversal::new(
            self.api,
            ResultSampler::new(self.api, converter),
            AnalysisType::FirstOrderLinear,
            step,
        );

        let mut rows = Vec::new();
        let stats = traversal
            .run(
                &model.members,
                &model.solved_loadcases,
                |row| rows.push(row),
                progress,
            )
            .await?;

        match target {
            ExtractionTarget::MemberForcesWorkbook => {
                let mut table =
                    WorkbookTable::new(MEMBER_FORCES_SHEET, member_forces_sheet_schema())?;
                for row in &rows {
                    table.append_row(member_sheet_cells(row))?;
                }
                table.finalize(output_path)?;
            }
            _ => {
                let mut table = CsvTable::new(member_forces_csv_schema());
                for row in &rows {
                    table.append_row(member_csv_cells(row));
                }
                table.finalize(output_path)?;
            }
        }

        Ok((stats.rows, stats.members, stats.loadcases, stats.skipped))
    }

    async fn extract_nodal_displacements(
        &self,
        model: &SolvedModel,
        output_path: &PathBuf,
    ) -> Result<(usize, usize, usize, Vec<SkippedCombination>)> {
        let traversal = NodalTraversal::new(self.api, model.results, MM_TO_IN);

        let mut table = CsvTable::new(nodal_displacements_schema());
        let stats = traversal
            .run(&model.solved_loadcases, |row| {
                table.append_row(nodal_csv_cells(&row));
            })
            .await?;
        table.finalize(output_path)?;

        Ok((stats.rows, stats.members, stats.loadcases, stats.skipped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockModel;
    use crate::model::{DocumentInfo, InstanceInfo, SolverModelId};
    use tempfile::TempDir;
    use uuid::Uuid;

    async fn run(mock: &MockModel, target: ExtractionTarget) -> ExtractionOutcome {
        let config = Config::default();
        let driver = ExtractionDriver::new(mock, &config);
        driver.run(target, None).await.unwrap()
    }

    fn expect_nothing(outcome: ExtractionOutcome) -> &'static str {
        match outcome {
            ExtractionOutcome::NothingToExtract(message) => message,
            other => panic!("expected early exit, got {:?}", other),
        }
    }

    fn expect_report(outcome: ExtractionOutcome) -> ExtractionReport {
        match outcome {
            ExtractionOutcome::Completed(report) => report,
            other => panic!("expected completed run, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_discovery_chain_messages_in_order() {
        let mut mock = MockModel::new();
        let target = ExtractionTarget::MemberForcesWorkbook;

        assert_eq!(expect_nothing(run(&mock, target).await), NO_INSTANCES);

        mock.instances.push(InstanceInfo {
            pid: 1,
            version: "24.1".to_string(),
        });
        assert_eq!(expect_nothing(run(&mock, target).await), NO_DOCUMENT);

        mock.document = Some(DocumentInfo {
            path: "/tmp/Model.tsmd".into(),
        });
        assert_eq!(expect_nothing(run(&mock, target).await), NO_MODEL);

        mock.model_present = true;
        assert_eq!(expect_nothing(run(&mock, target).await), NO_SOLVER_MODELS);

        mock.solver_models.push(SolverModelId(1));
        assert_eq!(expect_nothing(run(&mock, target).await), NO_RESULTS);

        mock.results = Some(ResultsId(1));
        assert_eq!(expect_nothing(run(&mock, target).await), NO_SOLVED_IDS);

        mock.solved.push(Uuid::new_v4());
        assert_eq!(
            expect_nothing(run(&mock, target).await),
            NO_SOLVED_LOADCASES
        );
    }

    #[tokio::test]
    async fn test_no_members_exits_cleanly_for_member_targets() {
        let dir = TempDir::new().unwrap();
        let mut mock = MockModel::solved(dir.path());
        mock.add_loadcase("Dead", true);

        assert_eq!(
            expect_nothing(run(&mock, ExtractionTarget::MemberForcesWorkbook).await),
            NO_MEMBERS
        );
        assert_eq!(
            expect_nothing(run(&mock, ExtractionTarget::MemberForcesCsv).await),
            NO_MEMBERS
        );
    }

    #[tokio::test]
    async fn test_nodal_target_runs_without_members() {
        let dir = TempDir::new().unwrap();
        let mut mock = MockModel::solved(dir.path());
        mock.add_loadcase("Dead", true);

        let report = expect_report(run(&mock, ExtractionTarget::NodalDisplacements).await);
        assert_eq!(report.rows_written, 0);
        assert!(report.output_path.exists());
    }

    #[tokio::test]
    async fn test_workbook_written_next_to_document() {
        let dir = TempDir::new().unwrap();
        let mut mock = MockModel::solved(dir.path());
        let dead = mock.add_loadcase("Dead", true);
        let member = mock.add_member("B1", "Beam", vec![MockModel::span(0, 3_048.0)]);
        mock.set_uniform_loading(member, dead, vec![1_000.0]);

        let report = expect_report(run(&mock, ExtractionTarget::MemberForcesWorkbook).await);

        assert_eq!(report.target, "member-forces-workbook");
        assert_eq!(
            report.output_path,
            dir.path().join("MemberForceExtraction.xlsx")
        );
        assert!(report.output_path.exists());
        // Default workbook step 0.25 gives 5 positions per span/loadcase.
        assert_eq!(report.rows_written, 5);
        assert_eq!(report.members, 1);
        assert_eq!(report.loadcases, 1);
        assert!(report.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_csv_target_uses_csv_step_and_filename() {
        let dir = TempDir::new().unwrap();
        let mut mock = MockModel::solved(dir.path());
        let dead = mock.add_loadcase("Dead", true);
        let member = mock.add_member("B1", "Beam", vec![MockModel::span(0, 3_048.0)]);
        mock.set_uniform_loading(member, dead, vec![1_000.0]);

        let report = expect_report(run(&mock, ExtractionTarget::MemberForcesCsv).await);

        assert_eq!(report.output_path, dir.path().join("MemberForces.csv"));
        // Default csv step 0.1 gives 11 positions.
        assert_eq!(report.rows_written, 11);

        let content = std::fs::read_to_string(&report.output_path).unwrap();
        // Header, units row, 11 data rows.
        assert_eq!(content.lines().count(), 13);
    }

    #[tokio::test]
    async fn test_output_directory_override() {
        let doc_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        let mut mock = MockModel::solved(doc_dir.path());
        mock.add_loadcase("Dead", true);

        let mut config = Config::default();
        config.output.directory = Some(out_dir.path().to_path_buf());
        let driver = ExtractionDriver::new(&mock, &config);
        let outcome = driver
            .run(ExtractionTarget::NodalDisplacements, None)
            .await
            .unwrap();

        let report = expect_report(outcome);
        assert_eq!(
            report.output_path,
            out_dir.path().join("NodalDisplacements.csv")
        );
        assert!(report.output_path.exists());
    }

    #[tokio::test]
    async fn test_skipped_combinations_reported() {
        let dir = TempDir::new().unwrap();
        let mut mock = MockModel::solved(dir.path());
        let dead = mock.add_loadcase("Dead", true);
        mock.add_member("B1", "Beam", vec![MockModel::span(0, 3_048.0)]);
        let loaded = mock.add_member("B2", "Beam", vec![MockModel::span(0, 3_048.0)]);
        mock.set_uniform_loading(loaded, dead, vec![1.0]);

        let report = expect_report(run(&mock, ExtractionTarget::MemberForcesCsv).await);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].member, "B1");
    }
}
