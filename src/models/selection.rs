use crate::models::{Candidate, Encoding};
use rand::Rng;
use tracing::instrument;

/// Normalized fitness assigned to every candidate when the whole population
/// scores identically. Best and worst are indistinguishable in that case, so
/// each candidate gets full weight and the roulette degenerates to uniform
/// sampling.
pub(crate) const EQUAL_FITNESS_FALLBACK: f64 = 1.0;

/// Rescales every candidate's fitness linearly to `[0.0, 1.0]` against the
/// population's extremes and writes it back onto the candidates. Returns the
/// sum of the normalized values, which the roulette uses as its wheel size.
#[instrument(level = "debug", skip(encoding, candidates), fields(num_candidates = candidates.len()))]
pub(crate) fn assign_normalized_fitness<E: Encoding>(
    encoding: &E,
    candidates: &mut [Candidate<E::Chromosome>],
) -> f64 {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for candidate in candidates.iter() {
        let fitness = candidate.fitness(encoding);
        min = min.min(fitness);
        max = max.max(fitness);
    }

    let range = max - min;
    let mut total = 0.0;
    for candidate in candidates.iter_mut() {
        let value = if range > 0.0 {
            (candidate.fitness(encoding) - min) / range
        } else {
            EQUAL_FITNESS_FALLBACK
        };
        candidate.set_normalized_fitness(value);
        total += value;
    }

    total
}

/// Performs a single roulette wheel spin over the candidates' normalized
/// fitness, returning the selected index.
///
/// The caller guarantees `candidates` is non-empty and `total` is the
/// positive sum of their normalized values. The final index is returned when
/// float accumulation undershoots the draw.
pub(crate) fn spin_roulette<C: Clone, R: Rng>(
    candidates: &[Candidate<C>],
    total: f64,
    rng: &mut R,
) -> usize {
    let draw = rng.random_range(0.0..total);
    let mut cumulative = 0.0;

    for (index, candidate) in candidates.iter().enumerate() {
        cumulative += candidate.normalized_fitness().unwrap_or(0.0);
        if cumulative > draw {
            return index;
        }
    }

    candidates.len() - 1
}
