//! Feasibility and cost evaluation.
//!
//! Pure functions over the resource model. Strategies rank candidate
//! combos with [`Evaluator::feasible`] and [`Evaluator::efficiency`]; the
//! dispatcher sizes reservations with [`Evaluator::time_cost`] and
//! [`Evaluator::time_cost_grouped`].
//!
//! # Impossible pairings
//! A provider with non-positive throughput, or a task/provider pair with a
//! non-positive transfer rate, yields `(∞, ∞)`. Infinities flow through
//! sums and comparisons and never cause a panic.

mod baseline;
pub mod cost;
mod objective;

pub use baseline::BaselineEvaluator;
pub use cost::CostBreakdown;
pub use objective::{calc_objective, calc_objective_grouped, ObjectiveWeights};

use std::fmt::Debug;

use crate::models::{Combo, Provider, Task};

/// Slack allowed when comparing a duration with a window length (hours).
pub const CAPACITY_EPSILON_HOURS: f64 = 1e-9;

/// Result of checking one combo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feasibility {
    /// Every newly placed group fits its provider's current window.
    pub ok: bool,
    /// Makespan across provider groups (hours).
    pub total_time: f64,
    /// Sum of group costs.
    pub total_cost: f64,
    /// Sum of group durations (hours).
    pub busy_time: f64,
    /// Number of deferred scenes.
    pub deferred: usize,
    /// Spend beyond the budget (≥ 0).
    pub over_budget: f64,
    /// Time beyond the deadline (hours, ≥ 0).
    pub over_deadline: f64,
}

/// Scoring surface consumed by strategies and the dispatcher.
pub trait Evaluator: Send + Sync + Debug {
    /// `(duration_hours, cost)` of one scene on a provider. Includes the
    /// global file unless the provider's ledger already holds this task.
    fn time_cost(&self, task: &Task, scene_id: usize, provider: &Provider) -> (f64, f64);

    /// Same model for a group: global file at most once, compute summed.
    fn time_cost_grouped(&self, task: &Task, scene_ids: &[usize], provider: &Provider)
        -> (f64, f64);

    /// Checks every newly placed group against its provider's current
    /// window and totals time, cost, and overage.
    fn feasible(&self, task: &Task, combo: &Combo, now_ms: i64, providers: &[Provider])
        -> Feasibility;

    /// Ranking score for a checked combo; higher is better.
    fn efficiency(
        &self,
        task: &Task,
        combo: &Combo,
        providers: &[Provider],
        now_ms: i64,
        feasibility: &Feasibility,
    ) -> f64;

    /// Standalone objective of one scene (lower is better).
    fn calc_objective(
        &self,
        task: &Task,
        scene_id: usize,
        provider: &Provider,
        exclude_global_transfer: bool,
    ) -> f64;

    /// Standalone objective of a scene group (lower is better).
    fn calc_objective_grouped(&self, task: &Task, scene_ids: &[usize], provider: &Provider)
        -> f64;
}
