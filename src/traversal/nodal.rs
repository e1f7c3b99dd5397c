//! Nodal deflection traversal: one displacement query per solved loadcase,
//! one row per returned record. No per-position sampling.

use crate::client::ModelApi;
use crate::error::Result;
use crate::model::{Loadcase, NodalDisplacementRow, ResultsId};
use crate::traversal::TraversalStats;

pub struct NodalTraversal<'a, A: ModelApi> {
    api: &'a A,
    results: ResultsId,
    /// Factor applied to the three translations; rotations stay in radians.
    displacement_factor: f64,
}

impl<'a, A: ModelApi> NodalTraversal<'a, A> {
    pub fn new(api: &'a A, results: ResultsId, displacement_factor: f64) -> Self {
        Self {
            api,
            results,
            displacement_factor,
        }
    }

    /// One row per (solved non-placeholder loadcase, displacement record),
    /// loadcases in model order, records in the order the provider returns
    /// them.
    pub async fn run<F>(&self, solved_loadcases: &[Loadcase], mut sink: F) -> Result<TraversalStats>
    where
        F: FnMut(NodalDisplacementRow),
    {
        let mut stats = TraversalStats::default();

        for loadcase in solved_loadcases {
            if loadcase.is_placeholder() {
                continue;
            }

            let displacements = self
                .api
                .nodal_displacements(self.results, loadcase.id)
                .await?;

            for record in displacements {
                sink(NodalDisplacementRow {
                    node_index: record.node_index,
                    loadcase: loadcase.name.clone(),
                    mx: record.mx * self.displacement_factor,
                    my: record.my * self.displacement_factor,
                    mz: record.mz * self.displacement_factor,
                    rx: record.rx,
                    ry: record.ry,
                    rz: record.rz,
                });
                stats.rows += 1;
            }

            stats.loadcases += 1;
        }

        Ok(stats)
    }
}
