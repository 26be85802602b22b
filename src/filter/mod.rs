pub mod filter;
pub mod liveness;
pub mod inversion;
