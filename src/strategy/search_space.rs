//! Search-space size of the one-scene-per-provider model.
//!
//! Counts the combos in which every unassigned scene is either skipped or
//! placed alone on a distinct provider whose current window fits it. The
//! all-skip combo is excluded. Used for diagnostics only.

use std::collections::HashMap;

use crate::evaluator::{Evaluator, CAPACITY_EPSILON_HOURS};
use crate::models::{Provider, Task};

/// Largest provider count the bitmask memo supports.
pub const MAX_PROVIDERS: usize = 64;

/// Number of non-empty feasible combos, or `None` with more than
/// [`MAX_PROVIDERS`] providers.
pub fn count_feasible_combos(
    task: &Task,
    providers: &[Provider],
    now_ms: i64,
    evaluator: &dyn Evaluator,
) -> Option<u128> {
    if providers.len() > MAX_PROVIDERS {
        return None;
    }
    let scenes = task.unassigned_scenes();

    // fits[i] = providers that can take scene i alone
    let fits: Vec<Vec<usize>> = scenes
        .iter()
        .map(|&s| {
            providers
                .iter()
                .enumerate()
                .filter(|(_, p)| {
                    let (d, _) = evaluator.time_cost(task, s, p);
                    d.is_finite() && d <= p.current_capacity_hours(now_ms) + CAPACITY_EPSILON_HOURS
                })
                .map(|(i, _)| i)
                .collect()
        })
        .collect();

    let mut memo = HashMap::new();
    Some(count_from(0, 0, &fits, &mut memo) - 1)
}

fn count_from(
    scene: usize,
    used: u64,
    fits: &[Vec<usize>],
    memo: &mut HashMap<(usize, u64), u128>,
) -> u128 {
    if scene == fits.len() {
        return 1;
    }
    if let Some(&n) = memo.get(&(scene, used)) {
        return n;
    }

    let mut total = count_from(scene + 1, used, fits, memo);
    for &p in &fits[scene] {
        let bit = 1u64 << p;
        if used & bit == 0 {
            total = total.saturating_add(count_from(scene + 1, used | bit, fits, memo));
        }
    }
    memo.insert((scene, used), total);
    total
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::evaluator::BaselineEvaluator;

    #[test]
    fn test_two_scenes_two_providers() {
        let (task, providers) = two_speed_case();
        // Skip/skip excluded: {0,1,S}² minus same-provider pairs minus SS
        // = 9 - 2 - 1
        let n = count_feasible_combos(&task, &providers, 0, &BaselineEvaluator::new());
        assert_eq!(n, Some(6));
    }

    #[test]
    fn test_nothing_fits() {
        let (task, providers) = short_window_case();
        let n = count_feasible_combos(&task, &providers, 0, &BaselineEvaluator::new());
        assert_eq!(n, Some(0));
    }

    #[test]
    fn test_matches_brute_force() {
        let (task, providers) = mixed_case();
        let ev = BaselineEvaluator::new();
        let fits = |s: usize, p: usize| {
            let (d, _) = ev.time_cost(&task, s, &providers[p]);
            d.is_finite() && d <= providers[p].current_capacity_hours(0) + CAPACITY_EPSILON_HOURS
        };

        // Every (provider or skip)^3 assignment, distinct providers only
        let base = providers.len() + 1;
        let mut brute = 0u128;
        for code in 0..base.pow(3) {
            let picks = [code / (base * base), (code / base) % base, code % base];
            let real: Vec<(usize, usize)> = picks
                .iter()
                .enumerate()
                .filter(|&(_, &p)| p < providers.len())
                .map(|(s, &p)| (s, p))
                .collect();
            let distinct = real
                .iter()
                .enumerate()
                .all(|(i, a)| real[i + 1..].iter().all(|b| a.1 != b.1));
            if !real.is_empty() && distinct && real.iter().all(|&(s, p)| fits(s, p)) {
                brute += 1;
            }
        }

        assert_eq!(count_feasible_combos(&task, &providers, 0, &ev), Some(brute));
        assert!(brute > 0);
    }

    #[test]
    fn test_too_many_providers() {
        let (task, _) = two_speed_case();
        let providers: Vec<_> = (0..65).map(|i| Provider::new(i, format!("p{i}"))).collect();
        assert!(count_feasible_combos(&task, &providers, 0, &BaselineEvaluator::new()).is_none());
    }
}
