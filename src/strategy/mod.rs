//! Assignment-search strategies.
//!
//! Each strategy proposes one [`Combo`] per round for a task. All four
//! implement [`ComboStrategy`] and only talk to the shared evaluator and
//! resource model, so any of them can be swapped in by registry key.
//!
//! | Key | Strategy | Quality | Cost |
//! |-----|----------|---------|------|
//! | `exhaustive` | [`ExhaustiveSearch`] | best within candidate cap | exponential |
//! | `greedy` | [`GreedyStrategy`] | heuristic | combinations with repetition |
//! | `matching` | [`MatchingStrategy`] | optimal for summed durations | O(n³) |
//! | `milp` | `MilpStrategy` | optimal within time budget | branch-and-bound |
//!
//! # Contract
//! A returned combo always passes [`Evaluator::feasible`] and places at
//! least one scene the task had not placed before. `None` means nothing
//! useful can be placed this round, which is a normal outcome.
//!
//! # References
//! - Kuhn (1955), "The Hungarian Method for the Assignment Problem"
//! - Wolsey (1998), "Integer Programming"

mod exhaustive;
mod greedy;
mod matching;
#[cfg(feature = "milp")]
pub mod milp;
mod registry;
pub mod search_space;

pub use exhaustive::ExhaustiveSearch;
pub use greedy::GreedyStrategy;
pub use matching::{hungarian, MatchingStrategy};
#[cfg(feature = "milp")]
pub use milp::MilpStrategy;
pub use registry::StrategyRegistry;

use std::fmt::Debug;

use tracing::debug;

use crate::evaluator::Evaluator;
use crate::models::{Combo, Provider, Task};

/// A strategy's proposal for the current round.
#[derive(Debug, Clone, PartialEq)]
pub struct ComboOutcome {
    /// Proposed mapping.
    pub combo: Combo,
    /// Makespan of the new placements (hours).
    pub total_time: f64,
    /// Cost of the new placements.
    pub total_cost: f64,
}

/// One interchangeable assignment-search algorithm.
pub trait ComboStrategy: Send + Sync + Debug {
    /// Registry key (e.g. `"matching"`).
    fn name(&self) -> &'static str;

    /// Best feasible combo for this round, or `None`.
    ///
    /// With `verbose`, candidates and diagnostics are emitted as
    /// `tracing` debug events.
    fn best_combo(
        &self,
        task: &Task,
        providers: &[Provider],
        now_ms: i64,
        evaluator: &dyn Evaluator,
        verbose: bool,
    ) -> Option<ComboOutcome>;
}

/// Whether the combo places a scene the task has not placed yet.
pub(crate) fn places_new_scene(task: &Task, combo: &Combo) -> bool {
    !combo.new_placements(task).is_empty()
}

/// Keeps the highest-efficiency feasible candidate seen so far.
///
/// Ties keep the earlier candidate.
pub(crate) struct BestCandidate<'a> {
    task: &'a Task,
    providers: &'a [Provider],
    now_ms: i64,
    evaluator: &'a dyn Evaluator,
    verbose: bool,
    best: Option<(f64, ComboOutcome)>,
}

impl<'a> BestCandidate<'a> {
    pub(crate) fn new(
        task: &'a Task,
        providers: &'a [Provider],
        now_ms: i64,
        evaluator: &'a dyn Evaluator,
        verbose: bool,
    ) -> Self {
        Self {
            task,
            providers,
            now_ms,
            evaluator,
            verbose,
            best: None,
        }
    }

    /// Evaluates a candidate and keeps it if it is the best so far.
    pub(crate) fn offer(&mut self, combo: Combo) {
        if !places_new_scene(self.task, &combo) {
            return;
        }
        let f = self
            .evaluator
            .feasible(self.task, &combo, self.now_ms, self.providers);
        if self.verbose {
            debug!(
                combo = ?combo.slots(),
                ok = f.ok,
                time_h = f.total_time,
                cost = f.total_cost,
                "candidate"
            );
        }
        if !f.ok {
            return;
        }
        let eff = self
            .evaluator
            .efficiency(self.task, &combo, self.providers, self.now_ms, &f);
        let better = match &self.best {
            Some((best_eff, _)) => eff > *best_eff,
            None => true,
        };
        if better {
            self.best = Some((
                eff,
                ComboOutcome {
                    combo,
                    total_time: f.total_time,
                    total_cost: f.total_cost,
                },
            ));
        }
    }

    /// Best candidate and its efficiency.
    pub(crate) fn finish(self) -> Option<(f64, ComboOutcome)> {
        self.best
    }
}
