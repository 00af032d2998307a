use serde::{Deserialize, Serialize};

/// Base mutation probability, scaled down for fit candidates.
///
/// The engine hands every offspring's inherited normalized fitness to the
/// encoding, and encodings use this value object to turn it into an
/// effective probability: `rate * (1.0 - normalized_fitness)`. A candidate
/// ranked best in its population therefore does not mutate at all, while the
/// worst mutates at the full configured rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq))]
pub struct MutationRate {
    value: f64,
}

#[derive(Debug, thiserror::Error)]
#[error("mutation rate must be between 0.0 and 1.0, got: {0}")]
pub struct MutationRateOutOfRange(f64);

impl MutationRate {
    pub fn new(value: f64) -> Result<Self, MutationRateOutOfRange> {
        if !(0.0..=1.0).contains(&value) {
            return Err(MutationRateOutOfRange(value));
        }

        Ok(Self { value })
    }

    /// Effective probability for a candidate with the given normalized
    /// fitness. Out-of-range inputs are clamped rather than rejected since
    /// they can only arise from float noise in the normalization step.
    pub(crate) fn get(&self, normalized_fitness: f64) -> f64 {
        self.value * (1.0 - normalized_fitness.clamp(0.0, 1.0))
    }
}
