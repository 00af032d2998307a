use crate::models::{Encoding, MutationRate};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Pairwise travel costs between cities. Owned by the encoding that uses it,
/// never shared as ambient state, and immutable once validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq))]
pub struct CostMatrix {
    costs: Vec<Vec<f64>>,
}

#[derive(Debug, thiserror::Error)]
pub enum CostMatrixError {
    #[error("cost matrix must be square: row {row} has {width} entries, expected {expected}")]
    NotSquare {
        row: usize,
        width: usize,
        expected: usize,
    },
}

impl CostMatrix {
    pub fn new(costs: Vec<Vec<f64>>) -> Result<Self, CostMatrixError> {
        let expected = costs.len();
        for (row, entries) in costs.iter().enumerate() {
            if entries.len() != expected {
                return Err(CostMatrixError::NotSquare {
                    row,
                    width: entries.len(),
                    expected,
                });
            }
        }

        Ok(Self { costs })
    }

    pub fn city_count(&self) -> usize {
        self.costs.len()
    }

    fn cost(&self, from: usize, to: usize) -> f64 {
        self.costs[from][to]
    }
}

/// Permutation encoding for tour problems: a chromosome visits every city
/// exactly once, and shorter tours score higher.
///
/// Crossover is order crossover (OX): a random segment of the first parent
/// is kept in place and the remaining cities fill in following the second
/// parent's visiting order, so offspring are always valid permutations.
/// Mutation swaps two positions, at a probability scaled down by the
/// candidate's normalized fitness.
#[derive(Debug, Clone)]
pub struct TourEncoding {
    matrix: CostMatrix,
    mutation_rate: MutationRate,
}

impl TourEncoding {
    pub fn new(matrix: CostMatrix, mutation_rate: MutationRate) -> Self {
        Self {
            matrix,
            mutation_rate,
        }
    }

    pub fn cost_matrix(&self) -> &CostMatrix {
        &self.matrix
    }
}

/// Order crossover over two equal-length permutations.
fn order_crossover<R: Rng>(rng: &mut R, parent1: &[usize], parent2: &[usize]) -> Vec<usize> {
    let n = parent1.len();
    let mut start = rng.random_range(0..n);
    let mut end = rng.random_range(0..n);
    if start > end {
        std::mem::swap(&mut start, &mut end);
    }

    let mut child = vec![usize::MAX; n];
    let mut used = vec![false; n];
    for i in start..=end {
        child[i] = parent1[i];
        used[parent1[i]] = true;
    }

    // Remaining slots take parent2's cities in visiting order
    let mut fill = parent2.iter().filter(|&&city| !used[city]);
    for slot in child.iter_mut() {
        if *slot == usize::MAX {
            // parent2 is a permutation of the same cities, so fill suffices
            if let Some(&city) = fill.next() {
                *slot = city;
            }
        }
    }

    child
}

impl Encoding for TourEncoding {
    type Chromosome = Vec<usize>;

    #[instrument(level = "debug", skip(self, rng), fields(city_count = self.matrix.city_count()))]
    fn seed<R: Rng>(&self, rng: &mut R) -> Self::Chromosome {
        let mut tour: Vec<usize> = (0..self.matrix.city_count()).collect();
        tour.shuffle(rng);
        tour
    }

    /// Negated sum of the sequential edge costs, so that higher is better.
    /// Tours of fewer than two cities have no edges and score zero.
    fn fitness(&self, chromosome: &Self::Chromosome) -> f64 {
        -chromosome
            .windows(2)
            .map(|edge| self.matrix.cost(edge[0], edge[1]))
            .sum::<f64>()
    }

    fn mutate<R: Rng>(
        &self,
        rng: &mut R,
        chromosome: &mut Self::Chromosome,
        normalized_fitness: f64,
    ) {
        if chromosome.len() < 2 {
            return;
        }

        if rng.random_range(0.0..1.0) < self.mutation_rate.get(normalized_fitness) {
            let i = rng.random_range(0..chromosome.len());
            let j = rng.random_range(0..chromosome.len());
            chromosome.swap(i, j);
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

        Some(order_crossover(rng, parent1, parent2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn three_city_encoding() -> TourEncoding {
        let matrix = CostMatrix::new(vec![
            vec![0.0, 10.0, 15.0],
            vec![10.0, 0.0, 20.0],
            vec![15.0, 20.0, 0.0],
        ])
        .unwrap();
        TourEncoding::new(matrix, MutationRate::new(0.3).unwrap())
    }

    fn assert_permutation(tour: &[usize], n: usize) {
        let mut seen = vec![false; n];
        for &city in tour {
            assert!(city < n, "city {city} out of range");
            assert!(!seen[city], "city {city} visited twice");
            seen[city] = true;
        }
        assert_eq!(tour.len(), n);
    }

    #[test]
    fn it_rejects_a_ragged_matrix() {
        let result = CostMatrix::new(vec![vec![0.0, 1.0], vec![1.0]]);
        assert!(matches!(
            result,
            Err(CostMatrixError::NotSquare {
                row: 1,
                width: 1,
                expected: 2,
            })
        ));
    }

    #[test]
    fn it_scores_sequential_edge_costs_negated() {
        let encoding = three_city_encoding();

        // Edges 0->1 and 1->2 cost 10 + 20
        assert_eq!(encoding.fitness(&vec![0, 1, 2]), -30.0);
        // Edges 0->2 and 2->1 cost 15 + 20
        assert_eq!(encoding.fitness(&vec![0, 2, 1]), -35.0);
    }

    #[test]
    fn a_single_city_tour_scores_zero() {
        let matrix = CostMatrix::new(vec![vec![0.0]]).unwrap();
        let encoding = TourEncoding::new(matrix, MutationRate::new(0.3).unwrap());

        assert_eq!(encoding.fitness(&vec![0]), 0.0);
    }

    #[test]
    fn it_seeds_valid_permutations() {
        let encoding = three_city_encoding();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            assert_permutation(&encoding.seed(&mut rng), 3);
        }
    }

    #[test]
    fn identical_parents_reproduce_themselves() {
        let encoding = three_city_encoding();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..10 {
            let child = encoding
                .reproduce(&mut rng, &vec![0, 1, 2], &vec![0, 1, 2])
                .unwrap();
            assert_eq!(child, vec![0, 1, 2]);
        }
    }

    #[test]
    fn reproduce_preserves_the_permutation_property() {
        let n = 8;
        let matrix = CostMatrix::new(vec![vec![1.0; n]; n]).unwrap();
        let encoding = TourEncoding::new(matrix, MutationRate::new(0.3).unwrap());
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let parent1 = encoding.seed(&mut rng);
            let parent2 = encoding.seed(&mut rng);
            let child = encoding.reproduce(&mut rng, &parent1, &parent2).unwrap();
            assert_permutation(&child, n);
        }
    }

    #[test]
    fn reproduce_rejects_unusable_parents() {
        let encoding = three_city_encoding();
        let mut rng = StdRng::seed_from_u64(42);

        assert!(encoding.reproduce(&mut rng, &vec![], &vec![0, 1, 2]).is_none());
        assert!(encoding.reproduce(&mut rng, &vec![0, 1, 2], &vec![]).is_none());
        assert!(encoding
            .reproduce(&mut rng, &vec![0, 1], &vec![0, 1, 2])
            .is_none());
    }

    #[test]
    fn mutate_preserves_the_permutation_property() {
        let n = 8;
        let matrix = CostMatrix::new(vec![vec![1.0; n]; n]).unwrap();
        // Full rate so every call mutates at normalized fitness zero
        let encoding = TourEncoding::new(matrix, MutationRate::new(1.0).unwrap());
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let mut tour = encoding.seed(&mut rng);
            encoding.mutate(&mut rng, &mut tour, 0.0);
            assert_permutation(&tour, n);
        }
    }

    #[test]
    fn the_best_candidate_never_mutates() {
        let encoding = TourEncoding::new(
            CostMatrix::new(vec![vec![1.0; 5]; 5]).unwrap(),
            MutationRate::new(1.0).unwrap(),
        );
        let mut rng = StdRng::seed_from_u64(42);

        let original = vec![0, 1, 2, 3, 4];
        let mut tour = original.clone();
        for _ in 0..20 {
            encoding.mutate(&mut rng, &mut tour, 1.0);
        }

        assert_eq!(tour, original);
    }

    #[test]
    fn mutate_leaves_trivial_tours_alone() {
        let matrix = CostMatrix::new(vec![vec![0.0]]).unwrap();
        let encoding = TourEncoding::new(matrix, MutationRate::new(1.0).unwrap());
        let mut rng = StdRng::seed_from_u64(42);

        let mut tour = vec![0];
        encoding.mutate(&mut rng, &mut tour, 0.0);
        assert_eq!(tour, vec![0]);
    }
}
