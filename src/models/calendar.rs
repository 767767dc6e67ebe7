//! Availability windows.
//!
//! Defines when a provider can run work. Windows are kept sorted by start
//! and pairwise disjoint; reserving an interval carves it out of the window
//! that contains it.
//!
//! # Time Model
//! Instants are milliseconds relative to a scheduling epoch chosen by the
//! consumer. Durations produced by the evaluator are hours (`f64`) and are
//! converted with [`hours_to_ms`] / [`ms_to_hours`] only.

use serde::{Deserialize, Serialize};

/// Milliseconds per hour.
pub const MS_PER_HOUR: i64 = 3_600_000;

/// Converts a duration in hours to whole milliseconds (nearest).
///
/// Non-finite or negative inputs are not meaningful here; callers check
/// finiteness first.
#[inline]
pub fn hours_to_ms(hours: f64) -> i64 {
    (hours * MS_PER_HOUR as f64).round() as i64
}

/// Converts milliseconds to hours.
#[inline]
pub fn ms_to_hours(ms: i64) -> f64 {
    ms as f64 / MS_PER_HOUR as f64
}

/// A time interval [start, end).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    /// Interval start (ms, inclusive).
    pub start_ms: i64,
    /// Interval end (ms, exclusive).
    pub end_ms: i64,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Whether a timestamp falls within this window.
    #[inline]
    pub fn contains(&self, time_ms: i64) -> bool {
        time_ms >= self.start_ms && time_ms < self.end_ms
    }

    /// Whether `[start_ms, end_ms]` lies fully inside this window.
    #[inline]
    pub fn encloses(&self, start_ms: i64, end_ms: i64) -> bool {
        start_ms >= self.start_ms && end_ms <= self.end_ms
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_ms < other.end_ms && other.start_ms < self.end_ms
    }

    /// Whether the window is empty or inverted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end_ms <= self.start_ms
    }
}

/// Provider availability: sorted, disjoint windows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Availability {
    windows: Vec<TimeWindow>,
}

impl Availability {
    /// Creates availability from windows, sorted chronologically.
    ///
    /// Overlap is not repaired here; `validation::validate_input` reports it.
    pub fn new(mut windows: Vec<TimeWindow>) -> Self {
        windows.sort_by_key(|w| (w.start_ms, w.end_ms));
        Self { windows }
    }

    /// Adds a window, keeping chronological order.
    pub fn with_window(mut self, start_ms: i64, end_ms: i64) -> Self {
        self.windows.push(TimeWindow::new(start_ms, end_ms));
        self.windows.sort_by_key(|w| (w.start_ms, w.end_ms));
        self
    }

    /// Windows in chronological order.
    pub fn windows(&self) -> &[TimeWindow] {
        &self.windows
    }

    /// Whether no window remains.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// First instant `>= after_ms` such that `[t, t + duration_ms]` is
    /// contained in a single window. An end past `i64::MAX` never fits.
    pub fn earliest_fit(&self, duration_ms: i64, after_ms: i64) -> Option<i64> {
        if duration_ms < 0 {
            return None;
        }
        self.windows.iter().find_map(|w| {
            let start = w.start_ms.max(after_ms);
            let end = start.checked_add(duration_ms)?;
            (end <= w.end_ms).then_some(start)
        })
    }

    /// Time left in the window open at `now_ms` (ms). Zero when no window
    /// contains `now_ms`, even if a later one exists.
    pub fn capacity_from(&self, now_ms: i64) -> i64 {
        self.windows
            .iter()
            .find(|w| w.contains(now_ms))
            .map_or(0, |w| w.end_ms - now_ms)
    }

    /// Removes `[start_ms, end_ms)` from every window it touches.
    pub fn reserve(&mut self, start_ms: i64, end_ms: i64) {
        if end_ms <= start_ms {
            return;
        }
        let cut = TimeWindow::new(start_ms, end_ms);
        let mut next = Vec::with_capacity(self.windows.len() + 1);
        for w in self.windows.drain(..) {
            if !w.overlaps(&cut) {
                next.push(w);
                continue;
            }
            let left = TimeWindow::new(w.start_ms, start_ms);
            let right = TimeWindow::new(end_ms, w.end_ms);
            if !left.is_empty() {
                next.push(left);
            }
            if !right.is_empty() {
                next.push(right);
            }
        }
        self.windows = next;
    }

    /// Whether windows are non-empty and pairwise disjoint.
    pub fn is_well_formed(&self) -> bool {
        self.windows.iter().all(|w| !w.is_empty())
            && self
                .windows
                .windows(2)
                .all(|pair| pair[0].end_ms <= pair[1].start_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: i64 = MS_PER_HOUR;

    #[test]
    fn test_time_window() {
        let w = TimeWindow::new(100, 200);
        assert!(w.contains(100));
        assert!(w.contains(199));
        assert!(!w.contains(200)); // exclusive end
        assert!(w.encloses(100, 200));
        assert!(!w.encloses(99, 150));
    }

    #[test]
    fn test_time_window_overlap() {
        let a = TimeWindow::new(0, 100);
        let b = TimeWindow::new(50, 150);
        assert!(a.overlaps(&b));
        let c = TimeWindow::new(100, 200); // touching but not overlapping
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_hours_round_trip() {
        assert_eq!(hours_to_ms(1.5), 5_400_000);
        assert!((ms_to_hours(5_400_000) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_availability_sorted() {
        let a = Availability::new(vec![TimeWindow::new(10 * H, 12 * H), TimeWindow::new(0, H)]);
        assert_eq!(a.windows()[0].start_ms, 0);
        assert!(a.is_well_formed());
    }

    #[test]
    fn test_earliest_fit_scans_in_order() {
        let a = Availability::default()
            .with_window(0, 2 * H)
            .with_window(5 * H, 10 * H);

        assert_eq!(a.earliest_fit(H, 0), Some(0));
        assert_eq!(a.earliest_fit(H, H / 2), Some(H / 2));
        // Does not fit in the remainder of the first window
        assert_eq!(a.earliest_fit(2 * H, H), Some(5 * H));
        assert_eq!(a.earliest_fit(6 * H, 0), None);
    }

    #[test]
    fn test_capacity_from() {
        let a = Availability::default()
            .with_window(0, 5 * H)
            .with_window(8 * H, 9 * H);

        assert_eq!(a.capacity_from(0), 5 * H);
        assert_eq!(a.capacity_from(2 * H), 3 * H);
        assert_eq!(a.capacity_from(8 * H), H);
        assert_eq!(a.capacity_from(9 * H), 0);
    }

    #[test]
    fn test_capacity_ignores_window_not_yet_open() {
        let a = Availability::default().with_window(2 * H, 10 * H);
        assert_eq!(a.capacity_from(0), 0);
        assert_eq!(a.capacity_from(2 * H), 8 * H);

        let gap = Availability::default()
            .with_window(0, 5 * H)
            .with_window(8 * H, 9 * H);
        assert_eq!(gap.capacity_from(6 * H), 0);
    }

    #[test]
    fn test_earliest_fit_rejects_overflowing_end() {
        let a = Availability::default().with_window(0, i64::MAX);
        assert_eq!(a.earliest_fit(i64::MAX, H), None);
        assert_eq!(a.earliest_fit(i64::MAX - H, H), Some(H));
    }

    #[test]
    fn test_reserve_splits_window() {
        let mut a = Availability::default().with_window(0, 10 * H);
        a.reserve(2 * H, 3 * H);
        assert_eq!(
            a.windows(),
            &[TimeWindow::new(0, 2 * H), TimeWindow::new(3 * H, 10 * H)]
        );
        assert!(a.is_well_formed());

        a.reserve(0, 2 * H);
        assert_eq!(a.windows(), &[TimeWindow::new(3 * H, 10 * H)]);
    }

    #[test]
    fn test_reserve_outside_is_noop() {
        let mut a = Availability::default().with_window(0, H);
        a.reserve(2 * H, 3 * H);
        assert_eq!(a.windows(), &[TimeWindow::new(0, H)]);
    }

    #[test]
    fn test_malformed_detected() {
        let a = Availability::new(vec![TimeWindow::new(0, 5), TimeWindow::new(3, 8)]);
        assert!(!a.is_well_formed());
        let b = Availability::new(vec![TimeWindow::new(5, 5)]);
        assert!(!b.is_well_formed());
    }
}
