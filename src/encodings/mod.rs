mod bitstring;
mod tour;

pub use bitstring::BitStringEncoding;
pub use tour::{CostMatrix, CostMatrixError, TourEncoding};
