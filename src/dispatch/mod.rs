//! Turns an accepted combo into reservations.
//!
//! New placements are grouped by provider (ascending index). A provider
//! with one new scene gets a single-scene reservation; a provider with
//! several gets one block covering a shared transfer phase followed by
//! each scene's compute phase, back to back. When no window fits, the
//! scene (or the whole group) is left for a later round.
//!
//! The dispatcher is the only component that mutates tasks and providers.

use std::fmt::Debug;

use tracing::{debug, warn};

use crate::evaluator::{cost, Evaluator};
use crate::models::{hours_to_ms, Assignment, Combo, Provider, ReservationScope, SceneAllocation, Task};

/// Commits a combo to the providers' ledgers.
pub trait Dispatcher: Send + Sync + Debug {
    /// Reserves time for the combo's new placements and records them on
    /// the task. Returns one record per reserved scene, which may be fewer
    /// than the combo proposed.
    fn dispatch(
        &self,
        task: &mut Task,
        combo: &Combo,
        now_ms: i64,
        providers: &mut [Provider],
        evaluator: &dyn Evaluator,
        verbose: bool,
    ) -> Vec<Assignment>;
}

/// Earliest-fit dispatcher.
#[derive(Debug, Clone, Default)]
pub struct SequentialDispatcher;

impl SequentialDispatcher {
    /// Creates a dispatcher.
    pub fn new() -> Self {
        Self
    }

    fn dispatch_single(
        task: &mut Task,
        scene: usize,
        index: usize,
        provider: &mut Provider,
        now_ms: i64,
        evaluator: &dyn Evaluator,
        verbose: bool,
    ) -> Option<Assignment> {
        let (duration, _) = evaluator.time_cost(task, scene, provider);
        let reservation = provider
            .earliest_available(duration, now_ms)
            .and_then(|start| provider.assign(task.id.clone(), ReservationScope::Scene(scene), start, duration));
        let Some(reservation) = reservation else {
            if verbose {
                debug!(task = %task.id, scene, provider = index, "no window; deferred");
            }
            return None;
        };

        task.allocate(
            scene,
            SceneAllocation {
                start_ms: reservation.start_ms,
                provider: index,
            },
        );
        if verbose {
            debug!(
                task = %task.id,
                scene,
                provider = index,
                start_ms = reservation.start_ms,
                finish_ms = reservation.finish_ms,
                "reserved scene"
            );
        }
        Some(Assignment::new(
            task.id.clone(),
            scene,
            reservation.start_ms,
            reservation.finish_ms,
            index,
        ))
    }

    fn dispatch_group(
        task: &mut Task,
        scenes: &[usize],
        index: usize,
        provider: &mut Provider,
        now_ms: i64,
        evaluator: &dyn Evaluator,
        verbose: bool,
    ) -> Vec<Assignment> {
        let (total, _) = evaluator.time_cost_grouped(task, scenes, provider);
        // Phase layout depends on the ledger before this block is added
        let phases = cost::breakdown(task, scenes, provider, cost::needs_global_file(task, provider));

        let block = match (provider.earliest_available(total, now_ms), phases) {
            (Some(start), Some(phases)) => provider
                .assign(task.id.clone(), ReservationScope::Group, start, total)
                .map(|block| (block, phases)),
            _ => None,
        };
        let Some((block, phases)) = block else {
            if verbose {
                debug!(task = %task.id, ?scenes, provider = index, "no window; group deferred");
            }
            return Vec::new();
        };
        if verbose {
            debug!(
                task = %task.id,
                ?scenes,
                provider = index,
                start_ms = block.start_ms,
                finish_ms = block.finish_ms,
                "reserved group"
            );
        }

        // Boundary k sits at transfer + k × compute from the block start,
        // rounded once and kept inside the block
        let boundary = |k: usize| {
            let offset = hours_to_ms(phases.transfer_hours + k as f64 * phases.compute_hours_per_scene);
            block
                .start_ms
                .saturating_add(offset)
                .clamp(block.start_ms, block.finish_ms)
        };
        let mut records = Vec::with_capacity(scenes.len());
        for (k, &scene) in scenes.iter().enumerate() {
            let start = boundary(k);
            let finish = if k + 1 == scenes.len() {
                block.finish_ms
            } else {
                boundary(k + 1)
            };
            task.allocate(
                scene,
                SceneAllocation {
                    start_ms: start,
                    provider: index,
                },
            );
            records.push(Assignment::new(task.id.clone(), scene, start, finish, index));
        }
        records
    }
}

impl Dispatcher for SequentialDispatcher {
    fn dispatch(
        &self,
        task: &mut Task,
        combo: &Combo,
        now_ms: i64,
        providers: &mut [Provider],
        evaluator: &dyn Evaluator,
        verbose: bool,
    ) -> Vec<Assignment> {
        let mut records = Vec::new();

        for (p, scenes) in combo.groups(task) {
            let Some(provider) = providers.get_mut(p) else {
                warn!(task = %task.id, provider = p, "combo names an unknown provider; skipped");
                continue;
            };
            match scenes.as_slice() {
                [] => {}
                [scene] => records.extend(Self::dispatch_single(
                    task, *scene, p, provider, now_ms, evaluator, verbose,
                )),
                _ => records.extend(Self::dispatch_group(
                    task, &scenes, p, provider, now_ms, evaluator, verbose,
                )),
            }
        }

        records
    }
}
