mod breeder;
mod candidate;
mod encoding;
mod rate;
mod selection;

pub use candidate::Candidate;
pub use encoding::Encoding;
pub use rate::{MutationRate, MutationRateOutOfRange};

pub(crate) use breeder::Breeder;
pub(crate) use selection::{assign_normalized_fitness, spin_roulette};
