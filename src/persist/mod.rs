mod writer;

// Re-export main types for easier access
pub use writer::{write_primes, PersistError, WriteTicket, WriterPool};
