//! Depth-first branch and bound over [`RoundModel`].
//!
//! Rows are decided in order: each candidate first (shortest duration
//! first), then "skip". A provider holds at most one new scene, tracked
//! with a `used` vector. The search stops at a wall-clock deadline and
//! reports the incumbent.
//!
//! Pruning:
//! - placed + undecided rows < required count
//! - stage 1: placed + undecided rows <= incumbent count
//! - stage 2: partial objective >= incumbent, when every weight and
//!   price is non-negative (the objective can then only grow)

use std::time::{Duration, Instant};

use super::model::{RoundModel, ScaledWeights};

/// Outcome of one solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Search completed with an incumbent.
    Optimal,
    /// Time ran out with an incumbent.
    Feasible,
    /// Search completed without an incumbent.
    Infeasible,
    /// Time ran out without an incumbent.
    Unknown,
}

impl SolveStatus {
    /// Whether a solution is available.
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

/// What the search optimises.
#[derive(Debug, Clone, Copy)]
pub enum Stage {
    /// Maximise placed rows.
    MaxPlaced,
    /// Minimise the weighted objective with at least `min_placed` rows.
    MinPenalty {
        min_placed: usize,
        weights: ScaledWeights,
    },
}

/// Best assignment found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub status: SolveStatus,
    /// Candidate index per row (`None` = skipped).
    pub picks: Vec<Option<usize>>,
    pub placed: usize,
    /// Stage-2 objective (0 in stage 1).
    pub objective: i128,
}

struct Search<'a> {
    model: &'a RoundModel,
    stage: Stage,
    deadline: Instant,
    timed_out: bool,
    prune_on_objective: bool,
    used: Vec<bool>,
    picks: Vec<Option<usize>>,
    best: Option<(usize, i128, Vec<Option<usize>>)>,
}

/// Solves one stage within `budget`.
pub fn solve(model: &RoundModel, stage: Stage, budget: Duration) -> Solution {
    let prune_on_objective = match stage {
        Stage::MaxPlaced => false,
        Stage::MinPenalty { weights, .. } => {
            weights.makespan >= 0
                && weights.over_budget >= 0
                && weights.over_deadline >= 0
                && weights.price >= 0
                && model.candidates.iter().flatten().all(|c| c.price >= 0)
        }
    };

    let mut search = Search {
        model,
        stage,
        deadline: Instant::now() + budget,
        timed_out: false,
        prune_on_objective,
        used: vec![false; model.provider_count],
        picks: vec![None; model.rows()],
        best: None,
    };
    search.descend(0, 0, 0, 0, 0);

    match search.best {
        Some((placed, objective, picks)) => Solution {
            status: if search.timed_out {
                SolveStatus::Feasible
            } else {
                SolveStatus::Optimal
            },
            picks,
            placed,
            objective,
        },
        None => Solution {
            status: if search.timed_out {
                SolveStatus::Unknown
            } else {
                SolveStatus::Infeasible
            },
            picks: vec![None; model.rows()],
            placed: 0,
            objective: 0,
        },
    }
}

impl Search<'_> {
    fn min_placed(&self) -> usize {
        match self.stage {
            Stage::MaxPlaced => 0,
            Stage::MinPenalty { min_placed, .. } => min_placed,
        }
    }

    fn objective(&self, makespan: i64, cost: i64, price: i64) -> i128 {
        match self.stage {
            Stage::MaxPlaced => 0,
            Stage::MinPenalty { weights, .. } => self.model.objective(&weights, makespan, cost, price),
        }
    }

    fn descend(&mut self, row: usize, placed: usize, makespan: i64, cost: i64, price: i64) {
        if self.timed_out || Instant::now() >= self.deadline {
            self.timed_out = true;
            return;
        }

        let undecided = self.model.rows() - row;
        if placed + undecided < self.min_placed() {
            return;
        }
        match (&self.stage, &self.best) {
            (Stage::MaxPlaced, Some((best_placed, _, _))) => {
                if placed + undecided <= *best_placed {
                    return;
                }
            }
            (Stage::MinPenalty { .. }, Some((_, best_obj, _))) if self.prune_on_objective => {
                if self.objective(makespan, cost, price) >= *best_obj {
                    return;
                }
            }
            _ => {}
        }

        if row == self.model.rows() {
            self.record(placed, makespan, cost, price);
            return;
        }

        for k in 0..self.model.candidates[row].len() {
            let c = self.model.candidates[row][k];
            if self.used[c.provider] {
                continue;
            }
            self.used[c.provider] = true;
            self.picks[row] = Some(k);
            self.descend(
                row + 1,
                placed + 1,
                makespan.max(c.duration),
                cost.saturating_add(c.cost),
                price.saturating_add(c.price),
            );
            self.picks[row] = None;
            self.used[c.provider] = false;
            if self.timed_out {
                return;
            }
        }

        self.descend(row + 1, placed, makespan, cost, price);
    }

    fn record(&mut self, placed: usize, makespan: i64, cost: i64, price: i64) {
        if placed < self.min_placed() {
            return;
        }
        let objective = self.objective(makespan, cost, price);
        let better = match (&self.stage, &self.best) {
            (_, None) => true,
            (Stage::MaxPlaced, Some((best_placed, _, _))) => placed > *best_placed,
            (Stage::MinPenalty { .. }, Some((_, best_obj, _))) => objective < *best_obj,
        };
        if better {
            self.best = Some((placed, objective, self.picks.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::model::Candidate;
    use super::*;

    fn cand(provider: usize, duration: i64, price: i64) -> Candidate {
        Candidate {
            provider,
            duration,
            cost: duration * price / 1000,
            price,
        }
    }

    fn model(candidates: Vec<Vec<Candidate>>, providers: usize) -> RoundModel {
        RoundModel {
            scenes: (0..candidates.len()).collect(),
            candidates,
            provider_count: providers,
            budget_left: None,
            window: i64::MAX / 4,
        }
    }

    const BUDGET: Duration = Duration::from_secs(5);

    fn unit_weights() -> ScaledWeights {
        ScaledWeights {
            makespan: 1,
            over_budget: 0,
            over_deadline: 0,
            price: 0,
        }
    }

    #[test]
    fn test_stage_one_respects_provider_limit() {
        // Three rows all wanting provider 0; provider 1 only fits row 2
        let m = model(
            vec![
                vec![cand(0, 1000, 1)],
                vec![cand(0, 1000, 1)],
                vec![cand(0, 1000, 1), cand(1, 3000, 1)],
            ],
            2,
        );
        let s = solve(&m, Stage::MaxPlaced, BUDGET);
        assert_eq!(s.status, SolveStatus::Optimal);
        assert_eq!(s.placed, 2);
    }

    #[test]
    fn test_stage_two_minimises_makespan() {
        let m = model(
            vec![
                vec![cand(0, 1000, 1), cand(1, 4000, 1)],
                vec![cand(0, 2000, 1), cand(1, 2500, 1)],
            ],
            2,
        );
        let stage = Stage::MinPenalty {
            min_placed: 2,
            weights: unit_weights(),
        };
        let s = solve(&m, stage, BUDGET);
        assert_eq!(s.status, SolveStatus::Optimal);
        // Row 0 → p0 (1000), row 1 → p1 (2500): makespan 2500
        assert_eq!(s.picks, vec![Some(0), Some(1)]);
        assert_eq!(s.objective, 2500);
    }

    #[test]
    fn test_min_placed_forces_placement() {
        let m = model(vec![vec![cand(0, 9000, 1)]], 1);
        let skip_ok = solve(
            &m,
            Stage::MinPenalty {
                min_placed: 0,
                weights: unit_weights(),
            },
            BUDGET,
        );
        assert_eq!(skip_ok.placed, 0);

        let forced = solve(
            &m,
            Stage::MinPenalty {
                min_placed: 1,
                weights: unit_weights(),
            },
            BUDGET,
        );
        assert_eq!(forced.placed, 1);
        assert_eq!(forced.objective, 9000);
    }

    #[test]
    fn test_infeasible_when_no_candidates() {
        let m = model(vec![vec![], vec![]], 2);
        let s = solve(
            &m,
            Stage::MinPenalty {
                min_placed: 1,
                weights: unit_weights(),
            },
            BUDGET,
        );
        assert_eq!(s.status, SolveStatus::Infeasible);
        assert!(!s.status.has_solution());
    }

    #[test]
    fn test_zero_budget_times_out() {
        let m = model(vec![vec![cand(0, 1000, 1)]], 1);
        let s = solve(&m, Stage::MaxPlaced, Duration::ZERO);
        assert_eq!(s.status, SolveStatus::Unknown);
    }
}
