pub mod primality;
pub mod space;
pub mod worker;

// Re-export main types for easier access
pub use primality::is_prime;
pub use space::{partition, Partition, SearchSpace};
pub use worker::collect_primes;
