pub mod args;
pub mod benchmark;
pub mod detection;
pub mod logging;
pub mod settings;
pub mod template_matching;

pub use benchmark::{Benchmark, BenchmarkRegistry};
pub use detection::ImageDetector;
pub use settings::{Cs2PresetAdapter, PresetAdapter};
