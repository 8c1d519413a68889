//! # Workers
//! src/workers/mod.rs
//!
//! Pool fijo de threads y la cola acotada que lo alimenta.

pub mod pool;
pub mod queue;

pub use pool::WorkerPool;
pub use queue::BoundedQueue;
