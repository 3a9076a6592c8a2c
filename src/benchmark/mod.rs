//! Benchmark registry and the per-game benchmark series
//!
//! Games are registered statically in `BenchmarkRegistry::with_builtin`.

pub mod cs2;
pub mod error;
pub mod registry;
pub mod types;


pub use cs2::Cs2Benchmark;
pub use error::{BenchmarkError, BenchmarkResult, RegistryError};
pub use registry::{BenchmarkFactory, BenchmarkRegistry};
pub use types::{Benchmark, BenchmarkConfig, RunRecord};
