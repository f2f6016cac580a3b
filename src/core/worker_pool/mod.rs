//! Bounded concurrent execution of one chunk of work items
//!
//! Each item passes through the same safe points on every attempt: the
//! control signal, the shared rate limiter, the remote call, and the retry
//! policy. Items never share mutable state; only the limiter is contended.

mod pool;


pub use pool::WorkerPool;
