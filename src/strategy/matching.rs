//! Min-cost assignment via the Hungarian algorithm.
//!
//! Rows are unassigned scenes. Columns are the providers followed by one
//! skip column per scene. Pairing a scene with a provider costs the
//! scene's duration there, or `impossible_cost` when the duration is not
//! finite or exceeds the provider's current window. A scene's own skip
//! column costs `skip_cost`; every other skip column is impossible.
//!
//! Each provider receives at most one new scene per round.
//!
//! # Reference
//! Kuhn (1955), "The Hungarian Method for the Assignment Problem";
//! solved with `pathfinding::kuhn_munkres`.

use pathfinding::kuhn_munkres::kuhn_munkres_min;
use pathfinding::matrix::Matrix;
use tracing::debug;

use super::{places_new_scene, ComboOutcome, ComboStrategy};
use crate::config::MatchingConfig;
use crate::evaluator::{Evaluator, CAPACITY_EPSILON_HOURS};
use crate::models::{Combo, Provider, Task};

/// Matrix costs are rounded to `1 / COST_SCALE` hours.
pub const COST_SCALE: f64 = 1000.0;

/// Assignment-problem strategy.
#[derive(Debug, Clone, Default)]
pub struct MatchingStrategy {
    config: MatchingConfig,
}

impl MatchingStrategy {
    /// Creates the strategy with the given costs.
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    /// Builds the `scenes × (providers + scenes)` cost matrix.
    fn cost_matrix(
        &self,
        task: &Task,
        scenes: &[usize],
        providers: &[Provider],
        now_ms: i64,
        evaluator: &dyn Evaluator,
    ) -> Vec<Vec<f64>> {
        let impossible = self.config.impossible_cost;
        scenes
            .iter()
            .enumerate()
            .map(|(row, &scene)| {
                let mut line = Vec::with_capacity(providers.len() + scenes.len());
                for provider in providers {
                    let (d, _) = evaluator.time_cost(task, scene, provider);
                    let cap = provider.current_capacity_hours(now_ms);
                    if d.is_finite() && d <= cap + CAPACITY_EPSILON_HOURS {
                        line.push(d.min(impossible));
                    } else {
                        line.push(impossible);
                    }
                }
                for k in 0..scenes.len() {
                    line.push(if k == row { self.config.skip_cost } else { impossible });
                }
                line
            })
            .collect()
    }
}

impl ComboStrategy for MatchingStrategy {
    fn name(&self) -> &'static str {
        "matching"
    }

    fn best_combo(
        &self,
        task: &Task,
        providers: &[Provider],
        now_ms: i64,
        evaluator: &dyn Evaluator,
        verbose: bool,
    ) -> Option<ComboOutcome> {
        let scenes = task.unassigned_scenes();
        if scenes.is_empty() {
            return None;
        }

        let cost = self.cost_matrix(task, &scenes, providers, now_ms, evaluator);
        let assignment = hungarian(&cost)?;

        let mut combo = Combo::pinned(task);
        for (row, &col) in assignment.iter().enumerate() {
            let real = col < providers.len() && cost[row][col] < self.config.impossible_cost;
            combo.set(scenes[row], real.then_some(col));
        }

        if !places_new_scene(task, &combo) {
            return None;
        }
        let f = evaluator.feasible(task, &combo, now_ms, providers);
        if verbose {
            debug!(
                combo = ?combo.slots(),
                ok = f.ok,
                time_h = f.total_time,
                cost = f.total_cost,
                "matching result"
            );
        }
        if !f.ok {
            return None;
        }
        Some(ComboOutcome {
            combo,
            total_time: f.total_time,
            total_cost: f.total_cost,
        })
    }
}

/// Solves a rectangular assignment problem with `rows <= cols`.
///
/// Returns the chosen column for each row, minimising the summed cost, or
/// `None` when there are more rows than columns. Costs are compared at
/// [`COST_SCALE`] resolution; missing or non-finite entries count as the
/// largest cost. Matchings of equal cost are ranked by
/// `Σ (rows - 1 - row) × column`, which places earlier rows on lower
/// columns, so the result does not depend on solver tie order.
pub fn hungarian(cost: &[Vec<f64>]) -> Option<Vec<usize>> {
    let rows = cost.len();
    if rows == 0 {
        return Some(Vec::new());
    }
    let cols = cost.iter().map(Vec::len).max().unwrap_or(0);
    if rows > cols {
        return None;
    }

    // Primary cost dominates any sum of tie-break terms
    let spread = (rows * rows * cols) as i128 + 1;
    let mut values = Vec::with_capacity(rows * cols);
    for (i, line) in cost.iter().enumerate() {
        for j in 0..cols {
            let c = line.get(j).copied().filter(|c| c.is_finite()).unwrap_or(f64::MAX);
            let primary = (c * COST_SCALE).round().min(i64::MAX as f64) as i128;
            values.push(primary * spread + ((rows - 1 - i) * j) as i128);
        }
    }

    let matrix = Matrix::from_vec(rows, cols, values).ok()?;
    let (_total, assignment) = kuhn_munkres_min(&matrix);
    Some(assignment)
}
