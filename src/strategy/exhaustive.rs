//! Exhaustive enumeration.
//!
//! Every unassigned scene is offered each provider and the sentinel, in
//! odometer order with the last scene varying fastest. Pinned scenes keep
//! their provider. Enumeration stops after `max_candidates` combos.

use tracing::debug;

use super::{BestCandidate, ComboOutcome, ComboStrategy};
use crate::evaluator::Evaluator;
use crate::models::{Combo, Provider, Task};

/// Brute-force search over `(providers + 1)^unassigned` combos.
#[derive(Debug, Clone)]
pub struct ExhaustiveSearch {
    max_candidates: usize,
}

impl Default for ExhaustiveSearch {
    fn default() -> Self {
        Self::new(81)
    }
}

impl ExhaustiveSearch {
    /// Creates a search capped at `max_candidates` enumerated combos.
    pub fn new(max_candidates: usize) -> Self {
        Self { max_candidates }
    }

    /// Candidate cap.
    pub fn max_candidates(&self) -> usize {
        self.max_candidates
    }
}

impl ComboStrategy for ExhaustiveSearch {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn best_combo(
        &self,
        task: &Task,
        providers: &[Provider],
        now_ms: i64,
        evaluator: &dyn Evaluator,
        verbose: bool,
    ) -> Option<ComboOutcome> {
        let free = task.unassigned_scenes();
        if free.is_empty() {
            return None;
        }

        // Digit value `providers.len()` is the sentinel
        let base = providers.len() + 1;
        let mut digits = vec![0usize; free.len()];
        let mut best = BestCandidate::new(task, providers, now_ms, evaluator, verbose);
        let mut enumerated = 0usize;

        loop {
            if enumerated >= self.max_candidates {
                if verbose {
                    debug!(enumerated, "candidate cap reached");
                }
                break;
            }
            enumerated += 1;

            let mut combo = Combo::pinned(task);
            for (&scene, &d) in free.iter().zip(&digits) {
                combo.set(scene, (d < providers.len()).then_some(d));
            }
            best.offer(combo);

            // Advance the odometer; last position is least significant
            let mut pos = digits.len();
            loop {
                if pos == 0 {
                    return finish(best, enumerated, verbose);
                }
                pos -= 1;
                digits[pos] += 1;
                if digits[pos] < base {
                    break;
                }
                digits[pos] = 0;
            }
        }

        finish(best, enumerated, verbose)
    }
}

fn finish(best: BestCandidate<'_>, enumerated: usize, verbose: bool) -> Option<ComboOutcome> {
    let best = best.finish();
    if verbose {
        debug!(
            enumerated,
            efficiency = best.as_ref().map(|(e, _)| *e),
            "exhaustive search done"
        );
    }
    best.map(|(_, outcome)| outcome)
}
