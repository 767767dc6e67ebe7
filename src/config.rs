//! Engine configuration.
//!
//! One serde-deserializable struct grouping the tunables of the evaluator
//! and each strategy. Every field has a default, so a partial document
//! (or none at all) is valid. Reading the document is up to the caller.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::evaluator::ObjectiveWeights;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Evaluator weights, applied through [`crate::BaselineEvaluator::from_config`].
    pub weights: ObjectiveWeights,
    /// Exhaustive search settings.
    pub exhaustive: ExhaustiveConfig,
    /// Matching strategy settings.
    pub matching: MatchingConfig,
    /// Integer-programming strategy settings.
    pub milp: MilpConfig,
}

/// Exhaustive search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExhaustiveConfig {
    /// Maximum number of enumerated candidates per call.
    pub max_candidates: usize,
}

impl Default for ExhaustiveConfig {
    fn default() -> Self {
        Self { max_candidates: 81 }
    }
}

/// Matching strategy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Cost of an impossible pairing.
    pub impossible_cost: f64,
    /// Cost of leaving a scene unassigned. Must sit between any real
    /// duration and `impossible_cost`.
    pub skip_cost: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            impossible_cost: 1e9,
            skip_cost: 1e6,
        }
    }
}

/// Integer-programming strategy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MilpConfig {
    /// Stage-2 objective weights (idle and deferral are unused).
    pub weights: ObjectiveWeights,
    /// Wall-clock budget per solve stage (ms).
    pub stage_time_budget_ms: u64,
}

impl Default for MilpConfig {
    fn default() -> Self {
        Self {
            weights: ObjectiveWeights {
                time: 1.0,
                budget_penalty: 200.0,
                deadline_penalty: 500.0,
                provider_profit: 1.0,
                idle: 0.0,
                deferral: 0.0,
            },
            stage_time_budget_ms: 10_000,
        }
    }
}

impl MilpConfig {
    /// Per-stage budget as a `Duration`.
    pub fn stage_time_budget(&self) -> Duration {
        Duration::from_millis(self.stage_time_budget_ms)
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the evaluator weights.
    pub fn with_weights(mut self, weights: ObjectiveWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the exhaustive candidate cap.
    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.exhaustive.max_candidates = max_candidates;
        self
    }

    /// Sets the per-stage solver budget.
    pub fn with_stage_time_budget(mut self, budget: Duration) -> Self {
        self.milp.stage_time_budget_ms = budget.as_millis() as u64;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.exhaustive.max_candidates, 81);
        assert!((cfg.weights.budget_penalty - 1000.0).abs() < 1e-10);
        assert!((cfg.milp.weights.deadline_penalty - 500.0).abs() < 1e-10);
        assert_eq!(cfg.milp.stage_time_budget(), Duration::from_secs(10));
        assert!(cfg.matching.skip_cost < cfg.matching.impossible_cost);
    }

    #[test]
    fn test_partial_document() {
        let json = r#"{ "exhaustive": { "max_candidates": 500 },
                        "weights": { "time": 2.0 } }"#;
        let cfg: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.exhaustive.max_candidates, 500);
        assert!((cfg.weights.time - 2.0).abs() < 1e-10);
        // Unspecified weights keep their defaults
        assert!((cfg.weights.deadline_penalty - 10000.0).abs() < 1e-10);
        assert_eq!(cfg.milp.stage_time_budget_ms, 10_000);
    }

    #[test]
    fn test_builder() {
        let cfg = EngineConfig::new()
            .with_max_candidates(9)
            .with_stage_time_budget(Duration::from_millis(250));
        assert_eq!(cfg.exhaustive.max_candidates, 9);
        assert_eq!(cfg.milp.stage_time_budget_ms, 250);
    }
}
