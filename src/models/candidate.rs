use crate::models::Encoding;
use std::cell::OnceCell;

/// A chromosome plus the engine-side bookkeeping attached to it: a memoized
/// fitness score and the normalized fitness written by the selection pass.
///
/// Candidates are value-like. Cloning one (into the breeding pool) carries
/// the cached fitness along, so a chromosome is never re-scored just because
/// it was selected.
#[derive(Debug, Clone)]
pub struct Candidate<C> {
    chromosome: C,
    fitness: OnceCell<f64>,
    normalized_fitness: Option<f64>,
}

impl<C: Clone> Candidate<C> {
    pub(crate) fn new(chromosome: C) -> Self {
        Self {
            chromosome,
            fitness: OnceCell::new(),
            normalized_fitness: None,
        }
    }

    pub fn chromosome(&self) -> &C {
        &self.chromosome
    }

    pub fn into_chromosome(self) -> C {
        self.chromosome
    }

    /// Returns the fitness score, computing it on first access. The cell is
    /// only ever written here; the genes never change after construction, so
    /// the cached value stays valid for the candidate's lifetime.
    pub fn fitness<E>(&self, encoding: &E) -> f64
    where
        E: Encoding<Chromosome = C>,
    {
        *self
            .fitness
            .get_or_init(|| encoding.fitness(&self.chromosome))
    }

    /// Fitness rescaled to `[0.0, 1.0]` within the population this candidate
    /// was last ranked in. `None` until a selection pass has run.
    pub fn normalized_fitness(&self) -> Option<f64> {
        self.normalized_fitness
    }

    pub(crate) fn set_normalized_fitness(&mut self, value: f64) {
        self.normalized_fitness = Some(value);
    }
}
