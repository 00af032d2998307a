use crate::models::{assign_normalized_fitness, spin_roulette, Breeder, Candidate, Encoding};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info, instrument};

/// Sizing and termination parameters for a search run.
///
/// Degenerate values are accepted rather than rejected: a zero population
/// size seeds an empty population (and `run` reports it), and zero
/// generations returns the best seeded candidate without evolving.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub struct SearchConfig {
    /// Number of candidates held at all times once seeded.
    pub population_size: usize,
    /// Number of selection, reproduction, replacement cycles to run.
    pub max_generations: u32,
}

impl SearchConfig {
    pub fn new(population_size: usize, max_generations: u32) -> Self {
        Self {
            population_size,
            max_generations,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub enum SearchError {
    /// Selection and best/worst lookups require a seeded, non-empty
    /// population. Call `generate_initial_population` first.
    #[error("population is empty")]
    PopulationEmpty,
}

/// Generational genetic search over a pluggable chromosome encoding.
///
/// One instance owns one run: the population, the generation counter, and
/// the random source. Each generation draws a breeding pool by
/// roulette-wheel selection, breeds it pairwise, and merges the offspring
/// back in with elitist truncation, so the best candidate found so far is
/// never lost.
///
/// The engine is deliberately synchronous and single-threaded; concurrent
/// use of a single instance is not supported.
pub struct GeneticSearch<E: Encoding, R: Rng = StdRng> {
    encoding: E,
    config: SearchConfig,
    population: Vec<Candidate<E::Chromosome>>,
    generation: u32,
    rng: R,
}

impl<E: Encoding> GeneticSearch<E, StdRng> {
    /// Creates an engine with an OS-seeded random source.
    pub fn new(encoding: E, config: SearchConfig) -> Self {
        Self::with_rng(encoding, config, StdRng::from_os_rng())
    }
}

impl<E: Encoding, R: Rng> GeneticSearch<E, R> {
    /// Creates an engine with an injected random source, for reproducible
    /// runs and tests.
    pub fn with_rng(encoding: E, config: SearchConfig, rng: R) -> Self {
        let population = Vec::with_capacity(config.population_size);

        Self {
            encoding,
            config,
            population,
            generation: 0,
            rng,
        }
    }

    /// Fills the population with `population_size` seeded candidates,
    /// replacing whatever was there. Seeds carry no uniqueness guarantee.
    #[instrument(level = "debug", skip(self), fields(population_size = self.config.population_size))]
    pub fn generate_initial_population(&mut self) {
        let encoding = &self.encoding;
        let rng = &mut self.rng;
        self.population = (0..self.config.population_size)
            .map(|_| Candidate::new(encoding.seed(rng)))
            .collect();
    }

    /// Draws a breeding pool of `floor(2 * population_size / 3)` candidates
    /// by fitness-proportionate roulette, with replacement.
    ///
    /// Normalized fitness is recomputed for the whole population as a side
    /// effect. When every candidate scores identically the wheel weights are
    /// all equal, and when the total weight is zero selection falls back to
    /// uniform draws instead of dividing by zero.
    #[instrument(level = "debug", skip(self), fields(population_size = self.population.len()))]
    pub fn selection(&mut self) -> Result<Vec<Candidate<E::Chromosome>>, SearchError> {
        if self.population.is_empty() {
            return Err(SearchError::PopulationEmpty);
        }

        self.sort_population();
        let total = assign_normalized_fitness(&self.encoding, &mut self.population);

        let pool_size = 2 * self.population.len() / 3;
        let mut selected = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            let index = if total > 0.0 {
                spin_roulette(&self.population, total, &mut self.rng)
            } else {
                self.rng.random_range(0..self.population.len())
            };
            selected.push(self.population[index].clone());
        }

        Ok(selected)
    }

    /// Breeds the selected pool into offspring. Pairing is sequential, a
    /// trailing unpaired candidate is dropped, and pairs without a usable
    /// genome produce nothing.
    pub fn reproduction(
        &mut self,
        selected: &[Candidate<E::Chromosome>],
    ) -> Vec<Candidate<E::Chromosome>> {
        Breeder::new(&self.encoding).breed_batch(&mut self.rng, selected)
    }

    /// Merges offspring into the population, displacing the lowest-ranked
    /// incumbents. The best `population_size - offspring.len()` incumbents
    /// survive, so the previous best is only ever replaced by something
    /// strictly better.
    #[instrument(level = "debug", skip(self, offspring), fields(num_offspring = offspring.len()))]
    pub fn replace_worst_ranked(&mut self, offspring: Vec<Candidate<E::Chromosome>>) {
        self.sort_population();
        let keep = self.population.len().saturating_sub(offspring.len());
        self.population.truncate(keep);
        self.population.extend(offspring);
        self.sort_population();
        self.population.truncate(self.config.population_size);
    }

    /// Runs the full generational loop and returns the best chromosome.
    ///
    /// Seeds the population if that has not happened yet, then cycles
    /// selection, reproduction, and replacement `max_generations` times.
    /// An empty population after seeding (zero `population_size`) is the one
    /// fatal precondition and is reported rather than looped over.
    #[instrument(level = "info", skip(self), fields(population_size = self.config.population_size, max_generations = self.config.max_generations))]
    pub fn run(&mut self) -> Result<E::Chromosome, SearchError> {
        if self.population.is_empty() {
            self.generate_initial_population();
        }
        if self.population.is_empty() {
            return Err(SearchError::PopulationEmpty);
        }

        while self.generation < self.config.max_generations {
            let selected = self.selection()?;
            let offspring = self.reproduction(&selected);
            self.replace_worst_ranked(offspring);
            self.generation += 1;

            let best_fitness = self.best_candidate()?.fitness(&self.encoding);
            debug!(
                generation = self.generation,
                best_fitness, "generation complete"
            );
        }

        let best = self.best_candidate()?;
        info!(
            generations = self.generation,
            best_fitness = best.fitness(&self.encoding),
            "search complete"
        );

        Ok(best.chromosome().clone())
    }

    /// Highest-fitness candidate of the current population.
    pub fn best_candidate(&self) -> Result<&Candidate<E::Chromosome>, SearchError> {
        let encoding = &self.encoding;
        self.population
            .iter()
            .max_by(|a, b| {
                a.fitness(encoding)
                    .partial_cmp(&b.fitness(encoding))
                    .unwrap_or(Ordering::Equal)
            })
            .ok_or(SearchError::PopulationEmpty)
    }

    /// Lowest-fitness candidate of the current population.
    pub fn worst_candidate(&self) -> Result<&Candidate<E::Chromosome>, SearchError> {
        let encoding = &self.encoding;
        self.population
            .iter()
            .min_by(|a, b| {
                a.fitness(encoding)
                    .partial_cmp(&b.fitness(encoding))
                    .unwrap_or(Ordering::Equal)
            })
            .ok_or(SearchError::PopulationEmpty)
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn population(&self) -> &[Candidate<E::Chromosome>] {
        &self.population
    }

    pub fn encoding(&self) -> &E {
        &self.encoding
    }

    fn sort_population(&mut self) {
        let encoding = &self.encoding;
        self.population.sort_by(|a, b| {
            b.fitness(encoding)
                .partial_cmp(&a.fitness(encoding))
                .unwrap_or(Ordering::Equal)
        });
    }
}
