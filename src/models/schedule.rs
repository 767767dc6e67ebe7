//! Reservation ledger entries and dispatch output records.
//!
//! A [`Reservation`] is what a provider's ledger stores; an [`Assignment`]
//! is what dispatch hands back to the driver, one per placed scene. A grouped
//! dispatch produces one `Group` reservation but one assignment per scene.

use serde::{Deserialize, Serialize};

/// What a ledger reservation covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReservationScope {
    /// A single scene.
    Scene(usize),
    /// A contiguous block shared by several scenes of one task.
    Group,
}

/// A reserved interval on a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    /// Owning task ID.
    pub task_id: String,
    /// Scene or group marker.
    pub scope: ReservationScope,
    /// Start time (ms).
    pub start_ms: i64,
    /// Finish time (ms).
    pub finish_ms: i64,
}

impl Reservation {
    /// Duration (ms).
    #[inline]
    pub fn duration_ms(&self) -> i64 {
        self.finish_ms - self.start_ms
    }
}

/// One placed scene: `(task_id, scene_id, start, finish, provider)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Task ID.
    pub task_id: String,
    /// Scene index within the task.
    pub scene_id: usize,
    /// Start time (ms).
    pub start_ms: i64,
    /// Finish time (ms).
    pub finish_ms: i64,
    /// Provider index.
    pub provider: usize,
}

impl Assignment {
    /// Creates a new assignment record.
    pub fn new(
        task_id: impl Into<String>,
        scene_id: usize,
        start_ms: i64,
        finish_ms: i64,
        provider: usize,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            scene_id,
            start_ms,
            finish_ms,
            provider,
        }
    }
}

/// Accumulated dispatch output across rounds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    /// Records in emission order.
    pub assignments: Vec<Assignment>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends records from one dispatch call.
    pub fn extend(&mut self, records: impl IntoIterator<Item = Assignment>) {
        self.assignments.extend(records);
    }

    /// Makespan: latest finish minus earliest start (ms). Zero when empty.
    pub fn makespan_ms(&self) -> i64 {
        let start = self.assignments.iter().map(|a| a.start_ms).min();
        let finish = self.assignments.iter().map(|a| a.finish_ms).max();
        match (start, finish) {
            (Some(s), Some(f)) => f - s,
            _ => 0,
        }
    }

    /// Number of records.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::new();
        s.extend([
            Assignment::new("T1", 0, 1000, 5000, 0),
            Assignment::new("T1", 1, 1000, 4000, 1),
            Assignment::new("T2", 0, 5000, 8000, 0),
        ]);
        s
    }

    #[test]
    fn test_schedule_makespan() {
        let s = sample_schedule();
        assert_eq!(s.makespan_ms(), 7000); // 8000 - 1000
    }

    #[test]
    fn test_assignment_count() {
        let mut s = sample_schedule();
        assert_eq!(s.assignment_count(), 3);
        s.extend(std::iter::empty());
        assert_eq!(s.assignment_count(), 3);
    }

    #[test]
    fn test_empty_schedule() {
        assert_eq!(Schedule::new().makespan_ms(), 0);
    }

    #[test]
    fn test_reservation_duration() {
        let r = Reservation {
            task_id: "T1".into(),
            scope: ReservationScope::Group,
            start_ms: 10,
            finish_ms: 40,
        };
        assert_eq!(r.duration_ms(), 30);
    }
}
