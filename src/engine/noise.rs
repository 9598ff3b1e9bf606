//! Simulated sensor jitter.
//!
//! Demo deployments without real meters want dashboards that move between
//! refreshes. That wobble is applied here, to a finished estimate, and
//! nowhere else. The estimator itself stays deterministic, and the RNG is
//! injected so tests can seed it.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::domain::Energy;
use crate::engine::estimator::ConsumptionEstimate;

/// Multiplicative jitter with a hard clamp at two standard deviations.
#[derive(Debug, Clone, Copy)]
pub struct NoiseDecorator {
    fraction: f64,
}

impl NoiseDecorator {
    /// `fraction` is the standard deviation of the jitter as a fraction of
    /// the estimated value, clamped to `0.0..=0.5`.
    pub fn new(fraction: f64) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 0.5),
        }
    }

    fn bound(&self) -> f64 {
        2.0 * self.fraction
    }

    /// Return a jittered copy of the estimate.
    ///
    /// One multiplier is drawn and applied to the total and every breakdown
    /// entry, and the cost is recomputed from the jittered energy, so the
    /// estimate's internal consistency (cost = energy * rate, breakdown sums
    /// to total) survives the wobble.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        estimate: &ConsumptionEstimate,
        rng: &mut R,
    ) -> ConsumptionEstimate {
        let multiplier = Normal::new(1.0, self.fraction)
            .map(|dist| dist.sample(rng))
            .unwrap_or(1.0)
            .clamp(1.0 - self.bound(), 1.0 + self.bound());

        let scale = |e: &Energy| Energy::kilowatt_hours(e.as_kilowatt_hours() * multiplier);

        let energy = scale(&estimate.energy);
        ConsumptionEstimate {
            horizon_hours: estimate.horizon_hours,
            energy,
            cost_eur: estimate.rate * energy,
            rate: estimate.rate,
            by_device: estimate
                .by_device
                .iter()
                .map(|(id, e)| (*id, scale(e)))
                .collect(),
            by_type: estimate
                .by_type
                .iter()
                .map(|(t, e)| (*t, scale(e)))
                .collect(),
        }
    }
}
