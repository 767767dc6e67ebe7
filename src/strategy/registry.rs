//! Strategy lookup by key.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use super::{ComboStrategy, ExhaustiveSearch, GreedyStrategy, MatchingStrategy};
use crate::config::EngineConfig;
use crate::error::{AllocError, Result};

/// Name → strategy table.
#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
    strategies: HashMap<&'static str, Arc<dyn ComboStrategy>>,
}

impl StrategyRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in strategy configured from `config`.
    ///
    /// `milp` is present only when the `milp` feature is enabled.
    pub fn with_defaults(config: &EngineConfig) -> Self {
        #[cfg_attr(not(feature = "milp"), allow(unused_mut))]
        let mut registry = Self::new()
            .with_strategy(ExhaustiveSearch::new(config.exhaustive.max_candidates))
            .with_strategy(GreedyStrategy::new())
            .with_strategy(MatchingStrategy::new(config.matching.clone()));

        #[cfg(feature = "milp")]
        {
            registry = registry.with_strategy(super::MilpStrategy::new(config.milp.clone()));
        }
        #[cfg(not(feature = "milp"))]
        {
            warn!("integer-programming strategy unavailable; built without the `milp` feature");
        }

        registry
    }

    /// Adds (or replaces) a strategy under its own name.
    pub fn with_strategy(mut self, strategy: impl ComboStrategy + 'static) -> Self {
        self.register(Arc::new(strategy));
        self
    }

    /// Adds (or replaces) a strategy under its own name.
    pub fn register(&mut self, strategy: Arc<dyn ComboStrategy>) {
        self.strategies.insert(strategy.name(), strategy);
    }

    /// Looks up a strategy.
    pub fn get(&self, name: &str) -> Result<Arc<dyn ComboStrategy>> {
        self.strategies.get(name).cloned().ok_or_else(|| {
            warn!(name, "unknown strategy");
            AllocError::UnknownStrategy(name.to_string())
        })
    }

    /// Registered keys, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.strategies.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
