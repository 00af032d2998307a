use crate::models::{Candidate, Encoding};
use rand::Rng;
use tracing::instrument;

/// Turns a breeding pool into offspring: sequential pairing, chromosome-level
/// crossover, then fitness-inverse mutation of each child.
pub(crate) struct Breeder<'a, E: Encoding> {
    encoding: &'a E,
}

impl<'a, E: Encoding> Breeder<'a, E> {
    pub(crate) fn new(encoding: &'a E) -> Self {
        Self { encoding }
    }

    fn breed_child<R: Rng>(
        &self,
        rng: &mut R,
        parent1: &Candidate<E::Chromosome>,
        parent2: &Candidate<E::Chromosome>,
    ) -> Option<Candidate<E::Chromosome>> {
        let mut chromosome = self
            .encoding
            .reproduce(rng, parent1.chromosome(), parent2.chromosome())?;

        // A fresh offspring has no rank of its own yet; the parents' mean
        // normalized fitness stands in for it when scaling mutation.
        let inherited = (parent1.normalized_fitness().unwrap_or(0.0)
            + parent2.normalized_fitness().unwrap_or(0.0))
            / 2.0;
        self.encoding.mutate(rng, &mut chromosome, inherited);

        Some(Candidate::new(chromosome))
    }

    /// Pairs the pool sequentially (0 with 1, 2 with 3, ...) and breeds one
    /// child per pair. A trailing unpaired candidate is dropped, and pairs
    /// whose crossover yields no usable genome are skipped.
    #[instrument(level = "debug", skip(self, rng, selected), fields(pool_size = selected.len()))]
    pub(crate) fn breed_batch<R: Rng>(
        &self,
        rng: &mut R,
        selected: &[Candidate<E::Chromosome>],
    ) -> Vec<Candidate<E::Chromosome>> {
        selected
            .chunks_exact(2)
            .filter_map(|pair| self.breed_child(rng, &pair[0], &pair[1]))
            .collect()
    }
}
