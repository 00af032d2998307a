use rand::Rng;

/// Capability contract a problem encoding must provide to the search engine.
///
/// An implementation owns whatever static configuration its domain needs (a
/// cost matrix, a genome length, an objective function) and is injected into
/// [`crate::GeneticSearch`] at construction. The engine never inspects
/// chromosomes directly; everything genome-shaped goes through this trait.
///
/// # Contract
///
/// - `seed` must return a domain-valid chromosome (e.g. a permutation that
///   covers every index exactly once).
/// - `fitness` must be a pure function of the chromosome's genes, with
///   higher values meaning better candidates. The engine memoizes the result
///   per candidate, so repeated calls for the same genes must agree.
/// - `mutate` perturbs a chromosome in place and must preserve domain
///   validity. `normalized_fitness` is the candidate's standing within the
///   current population, in `[0.0, 1.0]`; implementations are expected to
///   mutate fit candidates less (see [`crate::models::MutationRate`]).
/// - `reproduce` combines two parents into a new chromosome, or returns
///   `None` when the parents carry no usable genome. The engine filters
///   `None` offspring out before they reach the population.
pub trait Encoding {
    type Chromosome: Clone;

    /// Generates a random, domain-valid chromosome.
    fn seed<R: Rng>(&self, rng: &mut R) -> Self::Chromosome;

    /// Scores a chromosome. Pure in the genes, higher is better.
    fn fitness(&self, chromosome: &Self::Chromosome) -> f64;

    /// Perturbs a chromosome in place, biased by its normalized fitness.
    fn mutate<R: Rng>(
        &self,
        rng: &mut R,
        chromosome: &mut Self::Chromosome,
        normalized_fitness: f64,
    );

    /// Crosses two parents into one offspring, or `None` when either parent
    /// has no usable genome.
    fn reproduce<R: Rng>(
        &self,
        rng: &mut R,
        parent1: &Self::Chromosome,
        parent2: &Self::Chromosome,
    ) -> Option<Self::Chromosome>;
}
