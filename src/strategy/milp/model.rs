//! Integer model of one round.
//!
//! Variables are implicit: choosing candidate `k` for scene row `i` sets
//! `x[i][provider] = 1` and `y[i] = 1`; choosing none sets `y[i] = 0`.
//! Pairings that fail the capacity check never become candidates, which
//! forces their `x` to zero. Pinned scenes are outside the model and
//! contribute nothing.

use crate::evaluator::{Evaluator, CAPACITY_EPSILON_HOURS};
use crate::models::{ms_to_hours, Provider, Task};

/// Fixed-point scale for hours, money, and prices.
pub const SCALE: f64 = 1000.0;

/// Converts a real quantity to model units. Saturates at the `i64` range.
#[inline]
pub fn to_scaled(x: f64) -> i64 {
    (x * SCALE).round() as i64
}

/// One allowed `x[scene][provider]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub provider: usize,
    /// Scaled duration.
    pub duration: i64,
    /// Scaled cost.
    pub cost: i64,
    /// Scaled hourly price.
    pub price: i64,
}

/// Scaled stage-2 weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaledWeights {
    pub makespan: i64,
    pub over_budget: i64,
    pub over_deadline: i64,
    pub price: i64,
}

/// The per-round model.
#[derive(Debug, Clone)]
pub struct RoundModel {
    /// Unassigned scene ids, one row each.
    pub scenes: Vec<usize>,
    /// Allowed pairings per row, shortest first.
    pub candidates: Vec<Vec<Candidate>>,
    pub provider_count: usize,
    /// Budget left after prior spend; `None` when unbounded.
    pub budget_left: Option<i64>,
    /// Time from now to the deadline.
    pub window: i64,
}

impl RoundModel {
    /// Builds the model for `task` against the providers' current state.
    pub fn build(
        task: &Task,
        providers: &[Provider],
        now_ms: i64,
        evaluator: &dyn Evaluator,
    ) -> Self {
        let scenes = task.unassigned_scenes();
        let candidates = scenes
            .iter()
            .map(|&s| {
                let mut row: Vec<Candidate> = providers
                    .iter()
                    .enumerate()
                    .filter_map(|(p, provider)| {
                        let (d, c) = evaluator.time_cost(task, s, provider);
                        let cap = provider.current_capacity_hours(now_ms);
                        (d.is_finite() && c.is_finite() && d <= cap + CAPACITY_EPSILON_HOURS).then(
                            || Candidate {
                                provider: p,
                                duration: to_scaled(d),
                                cost: to_scaled(c),
                                price: to_scaled(provider.price_per_gpu_hour),
                            },
                        )
                    })
                    .collect();
                row.sort_by_key(|c| (c.duration, c.provider));
                row
            })
            .collect();

        let spent: f64 = providers.iter().map(|p| p.spent_on(&task.id)).sum();
        let budget_left = task
            .budget
            .is_finite()
            .then(|| to_scaled((task.budget - spent).max(0.0)));

        Self {
            scenes,
            candidates,
            provider_count: providers.len(),
            budget_left,
            window: to_scaled(ms_to_hours(task.deadline_ms.saturating_sub(now_ms))),
        }
    }

    /// Number of scene rows.
    pub fn rows(&self) -> usize {
        self.scenes.len()
    }

    /// Whether any row has a candidate.
    pub fn has_candidates(&self) -> bool {
        self.candidates.iter().any(|row| !row.is_empty())
    }

    /// Stage-2 objective from running totals.
    pub fn objective(&self, w: &ScaledWeights, makespan: i64, cost: i64, price: i64) -> i128 {
        let over_budget = self.budget_left.map_or(0, |b| (cost - b).max(0));
        let over_deadline = (makespan - self.window).max(0);
        w.makespan as i128 * makespan as i128
            + w.over_budget as i128 * over_budget as i128
            + w.over_deadline as i128 * over_deadline as i128
            + w.price as i128 * price as i128
    }
}
