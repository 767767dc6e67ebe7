//! Compute provider model.
//!
//! Providers run scenes. Each has a throughput (compute units per hour),
//! a bandwidth cap, an hourly price, availability windows, and an
//! append-only reservation ledger.
//!
//! # Bookkeeping
//! [`Provider::assign`] does not check for overlap. Callers find a slot with
//! [`Provider::earliest_available`] first; `assign` then carves the reserved
//! interval out of `available_hours` so the next search cannot reuse it.

use serde::{Deserialize, Serialize};

use super::{hours_to_ms, ms_to_hours, Availability, Reservation, ReservationScope};

/// A compute provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    /// Position in the provider list; combos refer to providers by this.
    pub index: usize,
    /// Identifier.
    pub id: String,
    /// Compute units processed per hour.
    pub throughput: f64,
    /// Provider-side bandwidth cap.
    pub bandwidth: f64,
    /// Price per GPU hour.
    pub price_per_gpu_hour: f64,
    /// Remaining free windows.
    pub available_hours: Availability,
    /// Reservation ledger (append-only).
    pub schedule: Vec<Reservation>,
}

impl Provider {
    /// Creates a provider with no windows and zero rates.
    pub fn new(index: usize, id: impl Into<String>) -> Self {
        Self {
            index,
            id: id.into(),
            throughput: 0.0,
            bandwidth: 0.0,
            price_per_gpu_hour: 0.0,
            available_hours: Availability::default(),
            schedule: Vec::new(),
        }
    }

    /// Sets the throughput.
    pub fn with_throughput(mut self, throughput: f64) -> Self {
        self.throughput = throughput;
        self
    }

    /// Sets the bandwidth.
    pub fn with_bandwidth(mut self, bandwidth: f64) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    /// Sets the hourly price.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price_per_gpu_hour = price;
        self
    }

    /// Adds an availability window.
    pub fn with_window(mut self, start_ms: i64, end_ms: i64) -> Self {
        self.available_hours = self.available_hours.with_window(start_ms, end_ms);
        self
    }

    /// Earliest start `>= after_ms` at which `duration_hours` fits in one
    /// window. `None` for a non-finite duration or when nothing fits.
    pub fn earliest_available(&self, duration_hours: f64, after_ms: i64) -> Option<i64> {
        if !duration_hours.is_finite() || duration_hours < 0.0 {
            return None;
        }
        self.available_hours
            .earliest_fit(hours_to_ms(duration_hours), after_ms)
    }

    /// Appends a reservation and removes its interval from the free windows.
    ///
    /// Precondition: `[start_ms, start_ms + duration]` was obtained from
    /// [`Provider::earliest_available`] (or is otherwise free). Not checked.
    /// Returns `None`, leaving the provider untouched, when the duration is
    /// not finite or the finish does not fit in an `i64`.
    pub fn assign(
        &mut self,
        task_id: impl Into<String>,
        scope: ReservationScope,
        start_ms: i64,
        duration_hours: f64,
    ) -> Option<Reservation> {
        if !duration_hours.is_finite() || duration_hours < 0.0 {
            return None;
        }
        let finish_ms = start_ms.checked_add(hours_to_ms(duration_hours))?;
        let reservation = Reservation {
            task_id: task_id.into(),
            scope,
            start_ms,
            finish_ms,
        };
        self.available_hours.reserve(start_ms, finish_ms);
        self.schedule.push(reservation.clone());
        Some(reservation)
    }

    /// Time left in the window open at `now_ms` (hours).
    pub fn current_capacity_hours(&self, now_ms: i64) -> f64 {
        ms_to_hours(self.available_hours.capacity_from(now_ms))
    }

    /// Whether the ledger holds any reservation for the task.
    pub fn has_handled(&self, task_id: &str) -> bool {
        self.schedule.iter().any(|r| r.task_id == task_id)
    }

    /// Amount already billed to the task on this provider.
    pub fn spent_on(&self, task_id: &str) -> f64 {
        self.schedule
            .iter()
            .filter(|r| r.task_id == task_id)
            .map(|r| ms_to_hours(r.duration_ms()) * self.price_per_gpu_hour)
            .sum()
    }

    /// Reserved time with overlapping entries merged (ms).
    pub fn busy_ms(&self) -> i64 {
        let mut spans: Vec<(i64, i64)> = self
            .schedule
            .iter()
            .map(|r| (r.start_ms, r.finish_ms))
            .collect();
        spans.sort_unstable();

        let mut busy = 0;
        let mut current: Option<(i64, i64)> = None;
        for (s, f) in spans {
            current = match current {
                Some((cs, cf)) if s <= cf => Some((cs, cf.max(f))),
                Some((cs, cf)) => {
                    busy += cf - cs;
                    Some((s, f))
                }
                None => Some((s, f)),
            };
        }
        if let Some((cs, cf)) = current {
            busy += cf - cs;
        }
        busy
    }

    /// Share of the ledger's span (first start to last finish) with no
    /// reservation. 1.0 when nothing is booked.
    pub fn idle_ratio(&self) -> f64 {
        let start = self.schedule.iter().map(|r| r.start_ms).min();
        let finish = self.schedule.iter().map(|r| r.finish_ms).max();
        let horizon = match (start, finish) {
            (Some(s), Some(f)) if f > s => f - s,
            _ => return 1.0,
        };
        (1.0 - self.busy_ms() as f64 / horizon as f64).clamp(0.0, 1.0)
    }
}
