//! Member force traversal: members in model order, spans in index order,
//! solved loadcases in model order, position ratios from 0.0 to exactly 1.0.
//! Each tuple yields one output row through the sampler.

use crate::client::ModelApi;
use crate::error::Result;
use crate::model::{AnalysisType, Loadcase, LoadingResultKind, MemberForceRow, MemberInfo};
use crate::sampler::ResultSampler;
use crate::traversal::{position_ratios, SkippedCombination, TraversalStats};

/// Per-member progress notification for the caller's progress bar.
#[derive(Debug, Clone)]
pub struct MemberProgress {
    pub members_processed: usize,
    pub members_total: usize,
    pub rows: usize,
    pub current_member: String,
}

pub struct MemberTraversal<'a, A: ModelApi> {
    api: &'a A,
    sampler: ResultSampler<'a, A>,
    analysis: AnalysisType,
    step: f64,
}

impl<'a, A: ModelApi> MemberTraversal<'a, A> {
    pub fn new(
        api: &'a A,
        sampler: ResultSampler<'a, A>,
        analysis: AnalysisType,
        step: f64,
    ) -> Self {
        Self {
            api,
            sampler,
            analysis,
            step,
        }
    }

    /// Walk all members and push one row per (member, span, loadcase, ratio)
    /// into `sink`. Combinations without a loading result are recorded in the
    /// stats and skipped; they contribute no rows.
    pub async fn run<F>(
        &self,
        members: &[MemberInfo],
        solved_loadcases: &[Loadcase],
        mut sink: F,
        progress: Option<&dyn Fn(&MemberProgress)>,
    ) -> Result<TraversalStats>
    where
        F: FnMut(MemberForceRow),
    {
        let ratios = position_ratios(self.step);
        let converter = *self.sampler.converter();
        let mut stats = TraversalStats {
            loadcases: solved_loadcases
                .iter()
                .filter(|lc| !lc.is_placeholder())
                .count(),
            ..TraversalStats::default()
        };

        for member in members {
            let spans = self.api.spans(member.id).await?;

            // Total length covers every span and is computed once per member.
            let total_native: f64 = spans.iter().map(|s| s.length).sum();
            let total_length = converter.length(total_native);

            for span in &spans {
                let span_length = converter.length(span.length);

                for loadcase in solved_loadcases {
                    if loadcase.is_placeholder() {
                        continue;
                    }

                    let loading = self
                        .api
                        .open_loading(
                            member.id,
                            loadcase.id,
                            self.analysis,
                            LoadingResultKind::Base,
                        )
                        .await?;

                    let Some(loading) = loading else {
                        stats.skipped.push(SkippedCombination {
                            member: member.name.clone(),
                            loadcase: loadcase.name.clone(),
                        });
                        continue;
                    };

                    for &ratio in &ratios {
                        let forces = self
                            .sampler
                            .sample(loading, span.index, span.length, ratio)
                            .await?;

                        sink(MemberForceRow {
                            guid: member.id,
                            name: member.name.clone(),
                            member_type: member.member_type.clone(),
                            section: span.section.clone(),
                            material: span.material.clone(),
                            total_length,
                            span: span.index,
                            span_length,
                            position: ratio,
                            loadcase: loadcase.name.clone(),
                            forces,
                        });
                        stats.rows += 1;
                    }
                }
            }

            stats.members += 1;
            if let Some(callback) = progress {
                callback(&MemberProgress {
                    members_processed: stats.members,
                    members_total: members.len(),
                    rows: stats.rows,
                    current_member: member.name.clone(),
                });
            }
        }

        Ok(stats)
    }
}
