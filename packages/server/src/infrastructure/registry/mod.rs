//! Connection registry implementations.
//!
//! - `inmemory`: single-process map guarded by a mutex
//! - 将来的に: a registry partitioned per room

pub mod inmemory;

pub use inmemory::InMemoryConnectionRegistry;
