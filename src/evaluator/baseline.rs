//! Default evaluator.

use super::cost::{duration_and_cost, needs_global_file};
use super::objective::{calc_objective, calc_objective_grouped};
use super::{Evaluator, Feasibility, ObjectiveWeights, CAPACITY_EPSILON_HOURS};
use crate::config::EngineConfig;
use crate::models::{ms_to_hours, Combo, Provider, Task};

/// Evaluator with a fixed weight vector.
///
/// Efficiency is the negated weighted sum of makespan, budget and deadline
/// overage, provider revenue, projected idle share, and deferred scenes.
/// Idle share is `1 - busy / (makespan × provider count)` for the
/// candidate alone.
#[derive(Debug, Clone, Default)]
pub struct BaselineEvaluator {
    weights: ObjectiveWeights,
}

impl BaselineEvaluator {
    /// Creates an evaluator with default weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an evaluator with the given weights.
    pub fn with_weights(weights: ObjectiveWeights) -> Self {
        Self { weights }
    }

    /// Creates an evaluator with the configured weights.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_weights(config.weights)
    }

    /// Weight vector in use.
    pub fn weights(&self) -> &ObjectiveWeights {
        &self.weights
    }
}

impl Evaluator for BaselineEvaluator {
    fn time_cost(&self, task: &Task, scene_id: usize, provider: &Provider) -> (f64, f64) {
        duration_and_cost(task, &[scene_id], provider, needs_global_file(task, provider))
    }

    fn time_cost_grouped(
        &self,
        task: &Task,
        scene_ids: &[usize],
        provider: &Provider,
    ) -> (f64, f64) {
        if scene_ids.is_empty() {
            return (0.0, 0.0);
        }
        duration_and_cost(task, scene_ids, provider, needs_global_file(task, provider))
    }

    fn feasible(
        &self,
        task: &Task,
        combo: &Combo,
        now_ms: i64,
        providers: &[Provider],
    ) -> Feasibility {
        let mut ok = combo.len() == task.scene_number;

        // Pinned scenes must stay where they are
        for s in 0..task.scene_number {
            if let Some(existing) = task.allocation(s) {
                if combo.get(s) != Some(existing.provider) {
                    ok = false;
                }
            }
        }

        let mut total_time: f64 = 0.0;
        let mut total_cost = 0.0;
        let mut busy_time = 0.0;

        for (p, scenes) in combo.groups(task) {
            let Some(provider) = providers.get(p) else {
                ok = false;
                total_time = f64::INFINITY;
                total_cost = f64::INFINITY;
                continue;
            };
            let (duration, cost) = self.time_cost_grouped(task, &scenes, provider);
            let capacity = provider.current_capacity_hours(now_ms);
            if !duration.is_finite() || duration > capacity + CAPACITY_EPSILON_HOURS {
                ok = false;
            }
            total_time = total_time.max(duration);
            total_cost += cost;
            busy_time += duration;
        }

        let spent: f64 = providers.iter().map(|p| p.spent_on(&task.id)).sum();
        let hours_left = ms_to_hours(task.deadline_ms.saturating_sub(now_ms));

        Feasibility {
            ok,
            total_time,
            total_cost,
            busy_time,
            deferred: combo.deferred_count(),
            over_budget: (spent + total_cost - task.budget).max(0.0),
            over_deadline: (total_time - hours_left).max(0.0),
        }
    }

    fn efficiency(
        &self,
        _task: &Task,
        _combo: &Combo,
        providers: &[Provider],
        _now_ms: i64,
        feasibility: &Feasibility,
    ) -> f64 {
        let f = feasibility;
        if !f.total_time.is_finite() || !f.total_cost.is_finite() {
            return f64::NEG_INFINITY;
        }

        let capacity = f.total_time * providers.len() as f64;
        let idle = if capacity > 0.0 {
            (1.0 - f.busy_time / capacity).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let w = &self.weights;
        let penalty = w.combine(f.total_time, f.over_budget, f.over_deadline, f.total_cost, idle)
            + w.deferral * f.deferred as f64;
        -penalty
    }

    fn calc_objective(
        &self,
        task: &Task,
        scene_id: usize,
        provider: &Provider,
        exclude_global_transfer: bool,
    ) -> f64 {
        calc_objective(task, scene_id, provider, exclude_global_transfer, &self.weights)
    }

    fn calc_objective_grouped(
        &self,
        task: &Task,
        scene_ids: &[usize],
        provider: &Provider,
    ) -> f64 {
        calc_objective_grouped(task, scene_ids, provider, &self.weights)
    }
}
