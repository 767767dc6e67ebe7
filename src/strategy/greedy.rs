//! Largest-scene-first heuristic.
//!
//! Scenes are sorted by file size (descending) and providers by
//! throughput (descending, sentinel last). Every multiset of provider
//! choices of the right size is tried; within one multiset the largest
//! remaining scene goes to the fastest remaining choice. The best
//! feasible result by efficiency wins.

use tracing::debug;

use super::{BestCandidate, ComboOutcome, ComboStrategy};
use crate::evaluator::Evaluator;
use crate::models::{Combo, Provider, Task};

/// Greedy pairing over provider multisets.
#[derive(Debug, Clone, Default)]
pub struct GreedyStrategy;

impl GreedyStrategy {
    /// Creates the strategy.
    pub fn new() -> Self {
        Self
    }
}

impl ComboStrategy for GreedyStrategy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn best_combo(
        &self,
        task: &Task,
        providers: &[Provider],
        now_ms: i64,
        evaluator: &dyn Evaluator,
        verbose: bool,
    ) -> Option<ComboOutcome> {
        let mut scenes = task.unassigned_scenes();
        if scenes.is_empty() {
            return None;
        }
        // Stable sort keeps scene order among equal sizes
        scenes.sort_by(|&a, &b| task.scene_size(b).total_cmp(&task.scene_size(a)));

        let mut choices: Vec<Option<usize>> = (0..providers.len()).map(Some).collect();
        choices.sort_by(|a, b| {
            let ta = a.map_or(f64::NEG_INFINITY, |p| providers[p].throughput);
            let tb = b.map_or(f64::NEG_INFINITY, |p| providers[p].throughput);
            tb.total_cmp(&ta)
        });
        choices.push(None);

        let mut best = BestCandidate::new(task, providers, now_ms, evaluator, verbose);
        let mut tried = 0usize;
        for_each_multiset(choices.len(), scenes.len(), |picks| {
            tried += 1;
            let mut combo = Combo::pinned(task);
            for (&scene, &pick) in scenes.iter().zip(picks) {
                combo.set(scene, choices[pick]);
            }
            best.offer(combo);
        });

        let best = best.finish();
        if verbose {
            debug!(
                tried,
                efficiency = best.as_ref().map(|(e, _)| *e),
                "greedy search done"
            );
        }
        best.map(|(_, outcome)| outcome)
    }
}

/// Calls `visit` with every non-decreasing index sequence of length `k`
/// over `0..n`, in lexicographic order.
fn for_each_multiset(n: usize, k: usize, mut visit: impl FnMut(&[usize])) {
    if n == 0 {
        return;
    }
    let mut picks = vec![0usize; k];
    loop {
        visit(&picks);

        // Rightmost position that can still grow
        let Some(pos) = (0..k).rev().find(|&i| picks[i] + 1 < n) else {
            return;
        };
        let next = picks[pos] + 1;
        for p in &mut picks[pos..] {
            *p = next;
        }
    }
}
