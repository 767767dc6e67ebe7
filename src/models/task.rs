//! Rendering task model.
//!
//! A task is split into `scene_number` scenes that are placed on providers
//! independently. All scenes share one global file, which a provider
//! downloads once no matter how many scenes of the task it runs.
//!
//! Scene placement is permanent: once a slot in `scene_allocation` is set,
//! later rounds can read it but never clear or move it.

use serde::{Deserialize, Serialize};

/// Where and when a scene was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneAllocation {
    /// Start time recorded at dispatch (ms).
    pub start_ms: i64,
    /// Provider index.
    pub provider: usize,
}

/// A rendering task.
///
/// # Time Representation
/// `deadline_ms` and `start_time_ms` are milliseconds relative to the
/// scheduling epoch. Sizes and bandwidths share one data unit; bandwidth
/// is data per hour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Number of schedulable scenes.
    pub scene_number: usize,
    /// Per-scene file size (length = `scene_number`).
    pub scene_file_sizes: Vec<f64>,
    /// Shared file transferred once per provider.
    pub global_file_size: f64,
    /// Compute units per scene.
    pub scene_workload: f64,
    /// Task-side bandwidth cap.
    pub bandwidth: f64,
    /// Total spend allowed.
    pub budget: f64,
    /// Latest completion time (ms).
    pub deadline_ms: i64,
    /// Submission time (ms).
    pub start_time_ms: i64,
    /// Permanent placement per scene.
    pub scene_allocation: Vec<Option<SceneAllocation>>,
}

impl Task {
    /// Creates a task with `scene_number` empty scenes.
    pub fn new(id: impl Into<String>, scene_number: usize) -> Self {
        Self {
            id: id.into(),
            scene_number,
            scene_file_sizes: vec![0.0; scene_number],
            global_file_size: 0.0,
            scene_workload: 0.0,
            bandwidth: 0.0,
            budget: f64::INFINITY,
            deadline_ms: i64::MAX,
            start_time_ms: 0,
            scene_allocation: vec![None; scene_number],
        }
    }

    /// Sets per-scene file sizes.
    pub fn with_scene_sizes(mut self, sizes: Vec<f64>) -> Self {
        self.scene_file_sizes = sizes;
        self
    }

    /// Sets the global file size.
    pub fn with_global_file(mut self, size: f64) -> Self {
        self.global_file_size = size;
        self
    }

    /// Sets the per-scene workload.
    pub fn with_workload(mut self, workload: f64) -> Self {
        self.scene_workload = workload;
        self
    }

    /// Sets the bandwidth.
    pub fn with_bandwidth(mut self, bandwidth: f64) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    /// Sets the budget.
    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = budget;
        self
    }

    /// Sets the deadline (ms).
    pub fn with_deadline(mut self, deadline_ms: i64) -> Self {
        self.deadline_ms = deadline_ms;
        self
    }

    /// Sets the start time (ms).
    pub fn with_start_time(mut self, start_ms: i64) -> Self {
        self.start_time_ms = start_ms;
        self
    }

    /// File size of a scene (0.0 for an out-of-range index).
    pub fn scene_size(&self, scene_id: usize) -> f64 {
        self.scene_file_sizes.get(scene_id).copied().unwrap_or(0.0)
    }

    /// Existing placement of a scene.
    pub fn allocation(&self, scene_id: usize) -> Option<SceneAllocation> {
        self.scene_allocation.get(scene_id).copied().flatten()
    }

    /// Whether a scene has been placed.
    pub fn is_allocated(&self, scene_id: usize) -> bool {
        self.allocation(scene_id).is_some()
    }

    /// Records a placement. Returns `false` (and changes nothing) if the
    /// scene is out of range or already placed.
    pub fn allocate(&mut self, scene_id: usize, allocation: SceneAllocation) -> bool {
        match self.scene_allocation.get_mut(scene_id) {
            Some(slot) if slot.is_none() => {
                *slot = Some(allocation);
                true
            }
            _ => false,
        }
    }

    /// Indices of scenes not yet placed, ascending.
    pub fn unassigned_scenes(&self) -> Vec<usize> {
        (0..self.scene_number)
            .filter(|&s| !self.is_allocated(s))
            .collect()
    }

    /// Whether every scene has been placed.
    pub fn is_complete(&self) -> bool {
        self.scene_allocation.iter().all(Option::is_some)
    }

    /// Time between start and deadline (hours).
    pub fn window_hours(&self) -> f64 {
        super::ms_to_hours(self.deadline_ms.saturating_sub(self.start_time_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_builder() {
        let task = Task::new("T1", 3)
            .with_scene_sizes(vec![1.0, 2.0, 3.0])
            .with_global_file(10.0)
            .with_workload(5.0)
            .with_bandwidth(100.0)
            .with_budget(50.0)
            .with_deadline(7_200_000)
            .with_start_time(0);

        assert_eq!(task.id, "T1");
        assert_eq!(task.scene_number, 3);
        assert!((task.scene_size(2) - 3.0).abs() < 1e-10);
        assert!((task.scene_size(9) - 0.0).abs() < 1e-10);
        assert!((task.window_hours() - 2.0).abs() < 1e-10);
        assert_eq!(task.unassigned_scenes(), vec![0, 1, 2]);
    }

    #[test]
    fn test_allocation_is_permanent() {
        let mut task = Task::new("T1", 2);
        let first = SceneAllocation { start_ms: 0, provider: 1 };
        let second = SceneAllocation { start_ms: 50, provider: 0 };

        assert!(task.allocate(0, first));
        assert!(!task.allocate(0, second));
        assert_eq!(task.allocation(0), Some(first));
        assert!(!task.allocate(5, second)); // out of range
        assert_eq!(task.unassigned_scenes(), vec![1]);
        assert!(!task.is_complete());

        assert!(task.allocate(1, second));
        assert!(task.is_complete());
    }
}
