//! Scalar objectives.
//!
//! `calc_objective` scores one scene on one provider; the grouped variant
//! scores a block of scenes sharing a single global-file transfer. Lower
//! is better. When a provider runs several scenes of one task, pass
//! `exclude_global_transfer = true` for every scene after the first so the
//! per-scene sum matches the grouped score.

use serde::{Deserialize, Serialize};

use super::cost::duration_and_cost;
use crate::models::{Provider, Task};

/// Weight vector shared by the objective and efficiency scores.
///
/// `provider_profit` multiplies a positive revenue term in a minimised
/// score, so it is negative when profit should be rewarded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveWeights {
    /// Total time (a1).
    pub time: f64,
    /// Budget overage (a2).
    pub budget_penalty: f64,
    /// Deadline overage (a3).
    pub deadline_penalty: f64,
    /// Provider profit (b1).
    pub provider_profit: f64,
    /// Idle share (b2).
    pub idle: f64,
    /// Per deferred scene; efficiency only.
    pub deferral: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            time: 1.0,
            budget_penalty: 1000.0,
            deadline_penalty: 10000.0,
            provider_profit: -0.1,
            idle: 1.0,
            deferral: 1000.0,
        }
    }
}

impl ObjectiveWeights {
    /// `a1·T + a2·overB + a3·overDL + b1·profit + b2·idle`.
    pub fn combine(
        &self,
        total_time: f64,
        over_budget: f64,
        over_deadline: f64,
        profit: f64,
        idle: f64,
    ) -> f64 {
        self.time * total_time
            + self.budget_penalty * over_budget
            + self.deadline_penalty * over_deadline
            + self.provider_profit * profit
            + self.idle * idle
    }
}

/// Objective of one scene on one provider.
///
/// Budget and deadline overage are measured against the whole task
/// (`budget`, `deadline - start_time`). Profit is the provider's hourly
/// price; idle is the provider's current ledger idle ratio.
pub fn calc_objective(
    task: &Task,
    scene_id: usize,
    provider: &Provider,
    exclude_global_transfer: bool,
    weights: &ObjectiveWeights,
) -> f64 {
    let (duration, cost) = duration_and_cost(task, &[scene_id], provider, !exclude_global_transfer);
    score(task, provider, duration, cost, weights)
}

/// Objective of a scene group on one provider; global file counted once.
/// An empty group scores 0.
pub fn calc_objective_grouped(
    task: &Task,
    scene_ids: &[usize],
    provider: &Provider,
    weights: &ObjectiveWeights,
) -> f64 {
    if scene_ids.is_empty() {
        return 0.0;
    }
    let (duration, cost) = duration_and_cost(task, scene_ids, provider, true);
    score(task, provider, duration, cost, weights)
}

fn score(task: &Task, provider: &Provider, duration: f64, cost: f64, w: &ObjectiveWeights) -> f64 {
    if !duration.is_finite() {
        return f64::INFINITY;
    }
    w.combine(
        duration,
        (cost - task.budget).max(0.0),
        (duration - task.window_hours()).max(0.0),
        provider.price_per_gpu_hour,
        provider.idle_ratio(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MS_PER_HOUR;

    fn task() -> Task {
        Task::new("T1", 2)
            .with_scene_sizes(vec![10.0, 10.0])
            .with_global_file(20.0)
            .with_workload(10.0)
            .with_bandwidth(10.0)
            .with_budget(100.0)
            .with_deadline(10 * MS_PER_HOUR)
    }

    fn provider() -> Provider {
        Provider::new(0, "p0")
            .with_throughput(10.0)
            .with_bandwidth(10.0)
            .with_price(2.0)
    }

    #[test]
    fn test_calc_objective_within_limits() {
        let w = ObjectiveWeights::default();
        // T = (20 + 10) / 10 + 1 = 4h, cost 8, idle 1.0 (empty ledger)
        let obj = calc_objective(&task(), 0, &provider(), false, &w);
        assert!((obj - (4.0 - 0.1 * 2.0 + 1.0)).abs() < 1e-10);
    }

    #[test]
    fn test_exclude_global_transfer() {
        let w = ObjectiveWeights::default();
        let with = calc_objective(&task(), 0, &provider(), false, &w);
        let without = calc_objective(&task(), 0, &provider(), true, &w);
        assert!((with - without - 2.0).abs() < 1e-10); // 20 / 10 hours saved
    }

    #[test]
    fn test_grouped_matches_single_for_one_scene() {
        let w = ObjectiveWeights::default();
        let single = calc_objective(&task(), 1, &provider(), false, &w);
        let grouped = calc_objective_grouped(&task(), &[1], &provider(), &w);
        assert!((single - grouped).abs() < 1e-10);
        assert_eq!(calc_objective_grouped(&task(), &[], &provider(), &w), 0.0);
    }

    #[test]
    fn test_deadline_penalty() {
        let w = ObjectiveWeights::default();
        let t = task().with_deadline(MS_PER_HOUR); // 1h window, 4h scene
        let obj = calc_objective(&t, 0, &provider(), false, &w);
        assert!((obj - (4.0 + 10000.0 * 3.0 - 0.2 + 1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_impossible_is_infinite() {
        let w = ObjectiveWeights::default();
        let p = provider().with_bandwidth(0.0);
        assert!(calc_objective(&task(), 0, &p, false, &w).is_infinite());
    }
}
