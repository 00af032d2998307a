use crate::models::{Encoding, MutationRate};
use rand::Rng;
use tracing::instrument;

/// Fixed-length binary encoding with a caller-supplied objective.
///
/// The objective closure scores a genome, higher is better. Crossover is
/// uniform (each position drawn from either parent with equal probability)
/// and mutation flips individual bits at a probability scaled down by the
/// candidate's normalized fitness.
pub struct BitStringEncoding<F> {
    length: usize,
    mutation_rate: MutationRate,
    objective: F,
}

impl<F> BitStringEncoding<F>
where
    F: Fn(&[bool]) -> f64,
{
    pub fn new(length: usize, mutation_rate: MutationRate, objective: F) -> Self {
        Self {
            length,
            mutation_rate,
            objective,
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl<F> Encoding for BitStringEncoding<F>
where
    F: Fn(&[bool]) -> f64,
{
    type Chromosome = Vec<bool>;

    #[instrument(level = "debug", skip(self, rng), fields(length = self.length))]
    fn seed<R: Rng>(&self, rng: &mut R) -> Self::Chromosome {
        (0..self.length).map(|_| rng.random_bool(0.5)).collect()
    }

    fn fitness(&self, chromosome: &Self::Chromosome) -> f64 {
        (self.objective)(chromosome)
    }

    fn mutate<R: Rng>(
        &self,
        rng: &mut R,
        chromosome: &mut Self::Chromosome,
        normalized_fitness: f64,
    ) {
        let probability = self.mutation_rate.get(normalized_fitness);
        for bit in chromosome.iter_mut() {
            if rng.random_range(0.0..1.0) < probability {
                *bit = !*bit;
            }
        }
    }

    fn reproduce<R: Rng>(
        &self,
        rng: &mut R,
        parent1: &Self::Chromosome,
        parent2: &Self::Chromosome,
    ) -> Option<Self::Chromosome> {
        if parent1.is_empty() || parent2.is_empty() || parent1.len() != parent2.len() {
            return None;
        }

        Some(
            parent1
                .iter()
                .zip(parent2.iter())
                .map(|(&a, &b)| if rng.random_bool(0.5) { a } else { b })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn ones_encoding(length: usize, rate: f64) -> BitStringEncoding<impl Fn(&[bool]) -> f64> {
        BitStringEncoding::new(length, MutationRate::new(rate).unwrap(), |bits: &[bool]| {
            bits.iter().filter(|&&b| b).count() as f64
        })
    }

    #[test]
    fn it_seeds_genomes_of_the_configured_length() {
        let encoding = ones_encoding(16, 0.1);
        let mut rng = StdRng::seed_from_u64(42);

        assert_eq!(encoding.seed(&mut rng).len(), 16);
    }

    #[test]
    fn it_scores_through_the_objective() {
        let encoding = ones_encoding(4, 0.1);

        assert_eq!(encoding.fitness(&vec![true, false, true, true]), 3.0);
        assert_eq!(encoding.fitness(&vec![false, false, false, false]), 0.0);
    }

    #[test]
    fn uniform_crossover_draws_every_gene_from_a_parent() {
        let encoding = ones_encoding(6, 0.1);
        let mut rng = StdRng::seed_from_u64(42);

        let parent1 = vec![true; 6];
        let parent2 = vec![false; 6];
        let child = encoding.reproduce(&mut rng, &parent1, &parent2).unwrap();

        assert_eq!(child.len(), 6);
        // Identical parents can only produce themselves
        let clone = encoding.reproduce(&mut rng, &parent1, &parent1).unwrap();
        assert_eq!(clone, parent1);
    }

    #[test]
    fn reproduce_rejects_unusable_parents() {
        let encoding = ones_encoding(3, 0.1);
        let mut rng = StdRng::seed_from_u64(42);

        assert!(encoding.reproduce(&mut rng, &vec![], &vec![true]).is_none());
        assert!(encoding
            .reproduce(&mut rng, &vec![true, false], &vec![true])
            .is_none());
    }

    #[test]
    fn full_rate_mutation_flips_every_bit_of_the_worst_candidate() {
        let encoding = ones_encoding(8, 1.0);
        let mut rng = StdRng::seed_from_u64(42);

        let mut genome = vec![false; 8];
        encoding.mutate(&mut rng, &mut genome, 0.0);

        assert_eq!(genome, vec![true; 8]);
    }

    #[test]
    fn the_best_candidate_never_mutates() {
        let encoding = ones_encoding(8, 1.0);
        let mut rng = StdRng::seed_from_u64(42);

        let mut genome = vec![false; 8];
        encoding.mutate(&mut rng, &mut genome, 1.0);

        assert_eq!(genome, vec![false; 8]);
    }
}
