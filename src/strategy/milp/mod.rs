//! Two-stage integer-programming strategy.
//!
//! Per round the strategy builds a 0/1 model over `x[scene][provider]` and
//! `y[scene]`:
//!
//! - a scene takes at most one provider, and `y` records whether it does
//! - a provider takes at most one new scene
//! - pairings whose duration exceeds the provider's current window are
//!   forbidden
//! - pinned scenes stay outside the model
//!
//! All quantities are scaled to integers by [`model::SCALE`].
//!
//! Stage 1 maximises the number of placed scenes. Stage 2 requires at
//! least that many and minimises
//! `a1·makespan + a2·over_budget + a3·over_deadline + b1·Σprice`.
//! Each stage runs under its own wall-clock budget and keeps the best
//! incumbent on timeout.
//!
//! # Reference
//! Wolsey (1998), "Integer Programming", ch. 7 (branch and bound)

pub mod model;
pub mod solver;

pub use solver::SolveStatus;

use tracing::{debug, warn};

use self::model::{to_scaled, RoundModel, ScaledWeights};
use self::solver::{solve, Stage};
use super::search_space::count_feasible_combos;
use super::{ComboOutcome, ComboStrategy};
use crate::config::MilpConfig;
use crate::evaluator::Evaluator;
use crate::models::{Combo, Provider, Task};

/// Stage-2 solution before re-validation.
#[derive(Debug, Clone, PartialEq)]
pub struct MilpPlan {
    /// Decoded combo (pinned scenes included).
    pub combo: Combo,
    /// Newly placed scenes.
    pub placed: usize,
    /// Scaled stage-2 objective.
    pub objective: i128,
    /// Stage-2 status.
    pub status: SolveStatus,
}

/// Integer-programming strategy.
#[derive(Debug, Clone, Default)]
pub struct MilpStrategy {
    config: MilpConfig,
}

impl MilpStrategy {
    /// Creates the strategy.
    pub fn new(config: MilpConfig) -> Self {
        Self { config }
    }

    fn scaled_weights(&self) -> ScaledWeights {
        let w = &self.config.weights;
        ScaledWeights {
            makespan: to_scaled(w.time),
            over_budget: to_scaled(w.budget_penalty),
            over_deadline: to_scaled(w.deadline_penalty),
            price: to_scaled(w.provider_profit),
        }
    }

    /// Runs both stages and decodes the result. `None` when no scene can
    /// be placed or a stage ends without a solution.
    pub fn plan(
        &self,
        task: &Task,
        providers: &[Provider],
        now_ms: i64,
        evaluator: &dyn Evaluator,
        verbose: bool,
    ) -> Option<MilpPlan> {
        let model = RoundModel::build(task, providers, now_ms, evaluator);
        if !model.has_candidates() {
            return None;
        }
        let budget = self.config.stage_time_budget();

        let first = solve(&model, Stage::MaxPlaced, budget);
        if verbose {
            debug!(status = ?first.status, placed = first.placed, "stage 1");
        }
        if !first.status.has_solution() || first.placed == 0 {
            return None;
        }

        let stage = Stage::MinPenalty {
            min_placed: first.placed,
            weights: self.scaled_weights(),
        };
        let second = solve(&model, stage, budget);
        if verbose {
            debug!(
                status = ?second.status,
                placed = second.placed,
                objective = %second.objective,
                "stage 2"
            );
        }
        if !second.status.has_solution() {
            warn!(task = %task.id, status = ?second.status, "stage 2 found no solution");
            return None;
        }

        let mut combo = Combo::pinned(task);
        for (row, pick) in second.picks.iter().enumerate() {
            if let Some(k) = *pick {
                combo.set(model.scenes[row], Some(model.candidates[row][k].provider));
            }
        }

        Some(MilpPlan {
            combo,
            placed: second.placed,
            objective: second.objective,
            status: second.status,
        })
    }
}

impl ComboStrategy for MilpStrategy {
    fn name(&self) -> &'static str {
        "milp"
    }

    fn best_combo(
        &self,
        task: &Task,
        providers: &[Provider],
        now_ms: i64,
        evaluator: &dyn Evaluator,
        verbose: bool,
    ) -> Option<ComboOutcome> {
        if verbose {
            debug!(
                space = ?count_feasible_combos(task, providers, now_ms, evaluator),
                "search space"
            );
        }

        let plan = self.plan(task, providers, now_ms, evaluator, verbose)?;
        let f = evaluator.feasible(task, &plan.combo, now_ms, providers);
        if !f.ok {
            return None;
        }
        Some(ComboOutcome {
            combo: plan.combo,
            total_time: f.total_time,
            total_cost: f.total_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::evaluator::BaselineEvaluator;
    use crate::models::Task;

    #[test]
    fn test_places_one_scene_per_provider() {
        let (task, providers) = two_speed_case();
        let out = MilpStrategy::default()
            .best_combo(&task, &providers, 0, &BaselineEvaluator::new(), false)
            .unwrap();
        let mut used: Vec<_> = out.combo.slots().iter().flatten().copied().collect();
        used.sort_unstable();
        assert_eq!(used, vec![0, 1]);
        assert!((out.total_time - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_nothing_placeable() {
        let (task, providers) = short_window_case();
        let ev = BaselineEvaluator::new();
        assert!(MilpStrategy::default().plan(&task, &providers, 0, &ev, false).is_none());
    }

    #[test]
    fn test_plan_objective_is_stable() {
        let (task, providers) = mixed_case();
        let ev = BaselineEvaluator::new();
        let s = MilpStrategy::default();
        let a = s.plan(&task, &providers, 0, &ev, false).unwrap();
        let b = s.plan(&task, &providers, 0, &ev, false).unwrap();
        assert_eq!(a.status, SolveStatus::Optimal);
        assert_eq!(a.placed, b.placed);
        assert_eq!(a.objective, b.objective);
    }

    #[test]
    fn test_prefers_cheaper_provider_at_equal_count() {
        // One scene; both providers fit; same speed, different price
        let task = Task::new("T", 1)
            .with_workload(10.0)
            .with_bandwidth(10.0)
            .with_deadline(10 * H);
        let providers = vec![
            Provider::new(0, "dear")
                .with_throughput(10.0)
                .with_bandwidth(10.0)
                .with_price(5.0)
                .with_window(0, 4 * H),
            Provider::new(1, "cheap")
                .with_throughput(10.0)
                .with_bandwidth(10.0)
                .with_price(1.0)
                .with_window(0, 4 * H),
        ];
        let plan = MilpStrategy::default()
            .plan(&task, &providers, 0, &BaselineEvaluator::new(), false)
            .unwrap();
        assert_eq!(plan.combo.slots(), &[Some(1)]);
        assert_eq!(plan.placed, 1);
    }
}
