//! Samples the six force/moment components for one member span position.

use crate::client::ModelApi;
use crate::error::Result;
use crate::model::{ForceSet, LoadingDirection, LoadingRef, LoadingValueKind};
use crate::units::UnitConverter;

/// Queries the loading result provider at absolute positions along a span and
/// reduces each component's candidate values to a single sample.
pub struct ResultSampler<'a, A: ModelApi> {
    api: &'a A,
    converter: UnitConverter,
}

impl<'a, A: ModelApi> ResultSampler<'a, A> {
    pub fn new(api: &'a A, converter: UnitConverter) -> Self {
        Self { api, converter }
    }

    pub fn converter(&self) -> &UnitConverter {
        &self.converter
    }

    /// Sample all six components at `ratio` (0 = span start, 1 = span end).
    /// `span_length` is in native units.
    pub async fn sample(
        &self,
        loading: LoadingRef,
        span: usize,
        span_length: f64,
        ratio: f64,
    ) -> Result<ForceSet> {
        // The provider returns all-zero values at the exact span end, so the
        // last sample points are pulled back by one native length unit. This
        // is a workaround for the provider, not a property of members;
        // remove it here if the provider gets fixed.
        let mut position = ratio * span_length;
        if ratio > 0.9 {
            position = (position - 1.0).max(0.0);
        }

        let axial = self
            .component(loading, LoadingValueKind::Force, LoadingDirection::Axial, span, position)
            .await?;
        let shear_major = self
            .component(loading, LoadingValueKind::Force, LoadingDirection::Major, span, position)
            .await?;
        let shear_minor = self
            .component(loading, LoadingValueKind::Force, LoadingDirection::Minor, span, position)
            .await?;
        let torsion = self
            .component(loading, LoadingValueKind::Moment, LoadingDirection::Axial, span, position)
            .await?;
        let moment_major = self
            .component(loading, LoadingValueKind::Moment, LoadingDirection::Major, span, position)
            .await?;
        let moment_minor = self
            .component(loading, LoadingValueKind::Moment, LoadingDirection::Minor, span, position)
            .await?;

        Ok(ForceSet {
            axial: self.converter.force(axial),
            shear_major: self.converter.force(shear_major),
            shear_minor: self.converter.force(shear_minor),
            torsion: self.converter.moment(torsion),
            moment_major: self.converter.moment(moment_major),
            moment_minor: self.converter.moment(moment_minor),
        })
    }

    async fn component(
        &self,
        loading: LoadingRef,
        kind: LoadingValueKind,
        direction: LoadingDirection,
        span: usize,
        position: f64,
    ) -> Result<f64> {
        let candidates = self
            .api
            .loading_values(loading, kind, direction, span, position)
            .await?;

        // A discontinuity yields one candidate per side; the maximum is the
        // established aggregation policy. No candidates reads as zero.
        Ok(candidates.into_iter().reduce(f64::max).unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockModel;
    use crate::units::{MM_TO_FT, N_TO_KIP};
    use uuid::Uuid;

    fn sampler_fixture(candidates: Vec<f64>) -> (MockModel, LoadingRef) {
        let mut mock = MockModel::new();
        let member = Uuid::new_v4();
        let loadcase = Uuid::new_v4();
        let loading = mock.set_uniform_loading(member, loadcase, candidates);
        (mock, loading)
    }

    #[tokio::test]
    async fn test_position_is_ratio_times_length() {
        let (mock, loading) = sampler_fixture(vec![1.0]);
        let sampler = ResultSampler::new(&mock, UnitConverter::native());

        sampler.sample(loading, 0, 10_000.0, 0.5).await.unwrap();

        for (_, span, position) in mock.positions_queried() {
            assert_eq!(span, 0);
            assert_eq!(position, 5_000.0);
        }
    }

    #[tokio::test]
    async fn test_end_of_span_pullback() {
        let (mock, loading) = sampler_fixture(vec![1.0]);
        let sampler = ResultSampler::new(&mock, UnitConverter::native());

        sampler.sample(loading, 0, 10_000.0, 1.0).await.unwrap();

        for (_, _, position) in mock.positions_queried() {
            assert!(position < 10_000.0);
            assert_eq!(position, 9_999.0);
        }
    }

    #[tokio::test]
    async fn test_pullback_never_goes_negative() {
        let (mock, loading) = sampler_fixture(vec![1.0]);
        let sampler = ResultSampler::new(&mock, UnitConverter::native());

        sampler.sample(loading, 0, 0.5, 1.0).await.unwrap();

        for (_, _, position) in mock.positions_queried() {
            assert!(position >= 0.0);
            assert!(position < 0.5);
        }
    }

    #[tokio::test]
    async fn test_no_pullback_below_threshold() {
        let (mock, loading) = sampler_fixture(vec![1.0]);
        let sampler = ResultSampler::new(&mock, UnitConverter::native());

        sampler.sample(loading, 0, 10_000.0, 0.9).await.unwrap();

        for (_, _, position) in mock.positions_queried() {
            assert_eq!(position, 9_000.0);
        }
    }

    #[tokio::test]
    async fn test_maximum_over_candidates() {
        let (mock, loading) = sampler_fixture(vec![1.0, -5.0, 3.0]);
        let sampler = ResultSampler::new(&mock, UnitConverter::native());

        let forces = sampler.sample(loading, 0, 1_000.0, 0.0).await.unwrap();

        // Maximum, not mean (-1/3) and not first (1.0).
        assert_eq!(forces.axial, 3.0);
        assert_eq!(forces.moment_minor, 3.0);
    }

    #[tokio::test]
    async fn test_empty_candidates_read_as_zero() {
        let (mock, loading) = sampler_fixture(vec![]);
        let sampler = ResultSampler::new(&mock, UnitConverter::native());

        let forces = sampler.sample(loading, 0, 1_000.0, 0.0).await.unwrap();
        assert_eq!(forces.axial, 0.0);
        assert_eq!(forces.torsion, 0.0);
    }

    #[tokio::test]
    async fn test_unit_conversion_per_physical_kind() {
        let (mock, loading) = sampler_fixture(vec![1_000.0]);
        let sampler = ResultSampler::new(&mock, UnitConverter::kip_feet());

        let forces = sampler.sample(loading, 0, 1_000.0, 0.0).await.unwrap();

        assert!((forces.axial - 1_000.0 * N_TO_KIP).abs() < 1e-12);
        assert!((forces.shear_major - 1_000.0 * N_TO_KIP).abs() < 1e-12);
        assert!((forces.moment_major - 1_000.0 * N_TO_KIP * MM_TO_FT).abs() < 1e-12);
        assert!((forces.torsion - 1_000.0 * N_TO_KIP * MM_TO_FT).abs() < 1e-12);
    }
}
