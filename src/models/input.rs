//! Input record shapes.
//!
//! These mirror the fields a loader reads from configuration data. Reading
//! the data is the caller's job; this module only turns the deserialized
//! records into model types. Instants are epoch milliseconds.

use serde::{Deserialize, Serialize};

use super::{Availability, Provider, Task, TimeWindow};

/// A task as it appears in input data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Task identifier.
    pub id: String,
    /// Number of scenes.
    pub scene_number: usize,
    /// Per-scene file sizes.
    #[serde(rename = "scene_file_size")]
    pub scene_file_sizes: Vec<f64>,
    /// Shared file size.
    #[serde(default)]
    pub global_file_size: f64,
    /// Compute units per scene.
    pub scene_workload: f64,
    /// Bandwidth cap.
    pub bandwidth: f64,
    /// Budget.
    pub budget: f64,
    /// Deadline (ms).
    pub deadline: i64,
    /// Start time (ms).
    #[serde(default)]
    pub start_time: i64,
}

/// A provider as it appears in input data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSpec {
    /// Optional identifier; defaults to `p{index}`.
    #[serde(default)]
    pub id: Option<String>,
    /// Compute units per hour.
    pub throughput: f64,
    /// Price per GPU hour.
    pub price: f64,
    /// Bandwidth cap.
    pub bandwidth: f64,
    /// `[start, end]` pairs (ms).
    #[serde(default)]
    pub available_hours: Vec<(i64, i64)>,
}

/// Tasks and providers read together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputData {
    /// Tasks.
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,
    /// Providers, in index order.
    #[serde(default)]
    pub providers: Vec<ProviderSpec>,
}

impl From<TaskSpec> for Task {
    fn from(spec: TaskSpec) -> Self {
        Task::new(spec.id, spec.scene_number)
            .with_scene_sizes(spec.scene_file_sizes)
            .with_global_file(spec.global_file_size)
            .with_workload(spec.scene_workload)
            .with_bandwidth(spec.bandwidth)
            .with_budget(spec.budget)
            .with_deadline(spec.deadline)
            .with_start_time(spec.start_time)
    }
}

impl ProviderSpec {
    /// Builds the provider that sits at `index` in the provider list.
    pub fn into_provider(self, index: usize) -> Provider {
        let id = self.id.unwrap_or_else(|| format!("p{index}"));
        let mut provider = Provider::new(index, id)
            .with_throughput(self.throughput)
            .with_bandwidth(self.bandwidth)
            .with_price(self.price);
        provider.available_hours = Availability::new(
            self.available_hours
                .into_iter()
                .map(|(s, e)| TimeWindow::new(s, e))
                .collect(),
        );
        provider
    }
}

impl InputData {
    /// Converts to model records. Provider indices follow input order.
    pub fn into_models(self) -> (Vec<Task>, Vec<Provider>) {
        let tasks = self.tasks.into_iter().map(Task::from).collect();
        let providers = self
            .providers
            .into_iter()
            .enumerate()
            .map(|(i, p)| p.into_provider(i))
            .collect();
        (tasks, providers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        let json = r#"{
            "tasks": [{
                "id": "T1",
                "scene_number": 2,
                "scene_file_size": [1.0, 2.0],
                "global_file_size": 4.0,
                "scene_workload": 10.0,
                "bandwidth": 10.0,
                "budget": 100.0,
                "deadline": 36000000
            }],
            "providers": [
                {"throughput": 10.0, "price": 1.5, "bandwidth": 20.0,
                 "available_hours": [[7200000, 10800000], [0, 3600000]]},
                {"id": "big", "throughput": 5.0, "price": 1.0, "bandwidth": 5.0}
            ]
        }"#;

        let data: InputData = serde_json::from_str(json).unwrap();
        let (tasks, providers) = data.into_models();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].scene_number, 2);
        assert!((tasks[0].global_file_size - 4.0).abs() < 1e-10);
        assert_eq!(tasks[0].start_time_ms, 0);
        assert_eq!(tasks[0].scene_allocation, vec![None, None]);

        assert_eq!(providers[0].id, "p0");
        assert_eq!(providers[1].id, "big");
        assert_eq!(providers[1].index, 1);
        assert!((providers[0].price_per_gpu_hour - 1.5).abs() < 1e-10);
        // Windows come out sorted
        assert_eq!(providers[0].available_hours.windows()[0], TimeWindow::new(0, 3_600_000));
        assert!(providers[1].available_hours.is_empty());
    }
}
