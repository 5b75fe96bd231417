//! Traits at the algorithm seam

pub mod digestor;
pub mod implementation;

pub use digestor::Digestor;
pub use implementation::AlgorithmImplementation;
