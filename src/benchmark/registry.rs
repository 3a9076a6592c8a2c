//! Statically populated map from game identifier to benchmark factory

use super::{
    cs2::Cs2Benchmark,
    error::{BenchmarkResult, RegistryError},
    types::Benchmark,
};
use std::collections::BTreeMap;

/// Builds a ready-to-run benchmark
pub type BenchmarkFactory = fn() -> BenchmarkResult<Box<dyn Benchmark>>;

#[derive(Debug, Clone, Default)]
pub struct BenchmarkRegistry {
    factories: BTreeMap<String, BenchmarkFactory>,
}

impl BenchmarkRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every benchmark shipped in this crate
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register("cs2", || {
            Ok(Box::new(Cs2Benchmark::from_env()?) as Box<dyn Benchmark>)
        });
        registry
    }

    /// Add or replace a factory; identifiers are case-insensitive
    pub fn register(&mut self, id: &str, factory: BenchmarkFactory) {
        let id = id.to_lowercase();
        if self.factories.insert(id.clone(), factory).is_some() {
            log::warn!("⚠️ Replacing benchmark registered as '{}'", id);
        }
    }

    /// Registered identifiers, sorted
    pub fn get_available(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    pub fn create(&self, id: &str) -> Result<Box<dyn Benchmark>, RegistryError> {
        let game = id.to_lowercase();
        let Some(factory) = self.factories.get(&game) else {
            log::error!("❌ No benchmark registered for game '{}'", id);
            return Err(RegistryError::Unsupported {
                game,
                available: self.get_available(),
            });
        };

        log::info!("🚀 Creating benchmark instance for {}", game);
        factory().map_err(|source| {
            log::error!("❌ Error creating benchmark for game '{}': {}", game, source);
            RegistryError::LoadFailed { game, source }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::{BenchmarkConfig, BenchmarkError, RunRecord};
    use std::time::Duration;

    struct Dummy {
        config: BenchmarkConfig,
    }

    impl Benchmark for Dummy {
        fn game_name(&self) -> &str {
            "Dummy"
        }

        fn config(&self) -> &BenchmarkConfig {
            &self.config
        }

        fn run_benchmark_series(
            &mut self,
            _run_count: u32,
            _cooldown: Duration,
        ) -> BenchmarkResult<Vec<RunRecord>> {
            Ok(Vec::new())
        }
    }

    fn dummy() -> BenchmarkResult<Box<dyn Benchmark>> {
        Ok(Box::new(Dummy {
            config: BenchmarkConfig {
                default_runs: Some(2),
                cooldown: None,
            },
        }))
    }

    fn broken() -> BenchmarkResult<Box<dyn Benchmark>> {
        Err(BenchmarkError::UnknownPreset {
            name: "ultra".to_string(),
        })
    }

    #[test]
    fn test_builtin_lists_cs2() {
        assert_eq!(BenchmarkRegistry::with_builtin().get_available(), vec!["cs2"]);
    }

    #[test]
    fn test_available_is_sorted() {
        let mut registry = BenchmarkRegistry::new();
        registry.register("zeta", dummy);
        registry.register("Alpha", dummy);
        registry.register("mid", dummy);
        assert_eq!(registry.get_available(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_create_is_case_insensitive() {
        let mut registry = BenchmarkRegistry::new();
        registry.register("dummy", dummy);

        for id in ["dummy", "DUMMY", "Dummy"] {
            let benchmark = registry.create(id).unwrap();
            assert_eq!(benchmark.game_name(), "Dummy");
            assert_eq!(benchmark.config().default_runs, Some(2));
        }
    }

    #[test]
    fn test_create_unknown_game() {
        let mut registry = BenchmarkRegistry::new();
        registry.register("dummy", dummy);

        match registry.create("quake") {
            Err(RegistryError::Unsupported { game, available }) => {
                assert_eq!(game, "quake");
                assert_eq!(available, vec!["dummy"]);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("unknown game should not be created"),
        }
    }

    #[test]
    fn test_factory_failure_is_load_failed() {
        let mut registry = BenchmarkRegistry::new();
        registry.register("broken", broken);

        assert!(matches!(
            registry.create("broken"),
            Err(RegistryError::LoadFailed { .. })
        ));
    }
}
