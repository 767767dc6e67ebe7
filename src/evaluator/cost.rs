//! Transfer and compute time model.
//!
//! duration = (charged file size / min(task bw, provider bw))
//!          + Σ (scene_workload / throughput)
//! cost     = duration × price_per_gpu_hour
//!
//! A non-positive rate or throughput makes the pairing impossible; callers
//! see `None` here and infinities one level up.

use crate::models::{Provider, Task};

/// Time split of one scene group on one provider (hours).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBreakdown {
    /// Shared transfer phase.
    pub transfer_hours: f64,
    /// Compute time of one scene.
    pub compute_hours_per_scene: f64,
    /// Compute time summed over the group.
    pub compute_hours: f64,
}

impl CostBreakdown {
    /// Transfer plus compute.
    #[inline]
    pub fn duration_hours(&self) -> f64 {
        self.transfer_hours + self.compute_hours
    }
}

/// Effective transfer rate between a task and a provider.
#[inline]
pub fn transfer_rate(task: &Task, provider: &Provider) -> f64 {
    task.bandwidth.min(provider.bandwidth)
}

/// Whether the provider still has to download the task's global file.
#[inline]
pub fn needs_global_file(task: &Task, provider: &Provider) -> bool {
    !provider.has_handled(&task.id)
}

/// Splits the time to run `scene_ids` on `provider` into transfer and
/// compute phases. The global file is counted once if `charge_global`.
///
/// Returns `None` when the rate or throughput is not positive.
pub fn breakdown(
    task: &Task,
    scene_ids: &[usize],
    provider: &Provider,
    charge_global: bool,
) -> Option<CostBreakdown> {
    let rate = transfer_rate(task, provider);
    let throughput = provider.throughput;
    if rate.is_nan() || rate <= 0.0 || throughput.is_nan() || throughput <= 0.0 {
        return None;
    }

    let global = if charge_global { task.global_file_size } else { 0.0 };
    let size: f64 = global + scene_ids.iter().map(|&s| task.scene_size(s)).sum::<f64>();
    let per_scene = task.scene_workload / throughput;

    Some(CostBreakdown {
        transfer_hours: size / rate,
        compute_hours_per_scene: per_scene,
        compute_hours: scene_ids.iter().map(|_| per_scene).sum(),
    })
}

/// `(duration_hours, cost)` for a group, or infinities if impossible.
pub(crate) fn duration_and_cost(
    task: &Task,
    scene_ids: &[usize],
    provider: &Provider,
    charge_global: bool,
) -> (f64, f64) {
    match breakdown(task, scene_ids, provider, charge_global) {
        Some(b) => {
            let duration = b.duration_hours();
            (duration, duration * provider.price_per_gpu_hour)
        }
        None => (f64::INFINITY, f64::INFINITY),
    }
}
