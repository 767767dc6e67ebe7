//! Per-simulation state holder.
//!
//! An [`AllocationSession`] owns the tasks, the provider pool, and the
//! records emitted so far. A round is one strategy call followed by one
//! dispatch call; the session only hands out `&mut` access for the
//! dispatch step. Advancing time and deciding which task to run are up to
//! the caller.

use tracing::{debug, info};

use crate::dispatch::Dispatcher;
use crate::error::{AllocError, Result};
use crate::evaluator::Evaluator;
use crate::models::{Assignment, InputData, Provider, Schedule, Task};
use crate::strategy::ComboStrategy;
use crate::validation::validate_input;

/// Tasks, providers, and emitted records for one simulation.
#[derive(Debug, Clone, Default)]
pub struct AllocationSession {
    tasks: Vec<Task>,
    providers: Vec<Provider>,
    schedule: Schedule,
}

impl AllocationSession {
    /// Creates a session from model records after validating them.
    pub fn new(tasks: Vec<Task>, providers: Vec<Provider>) -> Result<Self> {
        validate_input(&tasks, &providers).map_err(AllocError::InvalidInput)?;
        Ok(Self {
            tasks,
            providers,
            schedule: Schedule::new(),
        })
    }

    /// Creates a session from deserialized input.
    pub fn from_input(input: InputData) -> Result<Self> {
        let (tasks, providers) = input.into_models();
        Self::new(tasks, providers)
    }

    /// Runs one round for a task: propose a combo, then dispatch it.
    ///
    /// Returns the records this round produced; empty when the strategy
    /// finds nothing or dispatch cannot fit any scene.
    pub fn run_round(
        &mut self,
        task_index: usize,
        strategy: &dyn ComboStrategy,
        dispatcher: &dyn Dispatcher,
        evaluator: &dyn Evaluator,
        now_ms: i64,
        verbose: bool,
    ) -> Result<Vec<Assignment>> {
        let task = self
            .tasks
            .get_mut(task_index)
            .ok_or(AllocError::UnknownTask(task_index))?;

        let Some(outcome) = strategy.best_combo(task, &self.providers, now_ms, evaluator, verbose)
        else {
            if verbose {
                debug!(task = %task.id, strategy = strategy.name(), "no combo this round");
            }
            return Ok(Vec::new());
        };

        let proposed = outcome.combo.new_placements(task).len();
        let records = dispatcher.dispatch(
            task,
            &outcome.combo,
            now_ms,
            &mut self.providers,
            evaluator,
            verbose,
        );
        self.schedule.extend(records.iter().cloned());
        if verbose {
            info!(
                task = %task.id,
                strategy = strategy.name(),
                proposed,
                reserved = records.len(),
                time_h = outcome.total_time,
                cost = outcome.total_cost,
                makespan_ms = self.schedule.makespan_ms(),
                "round complete"
            );
        }
        Ok(records)
    }

    /// Scenes of a task that are still unplaced.
    pub fn missing_scenes(&self, task_index: usize) -> Result<Vec<usize>> {
        self.tasks
            .get(task_index)
            .map(Task::unassigned_scenes)
            .ok_or(AllocError::UnknownTask(task_index))
    }

    /// Whether every task is fully placed.
    pub fn is_complete(&self) -> bool {
        self.tasks.iter().all(Task::is_complete)
    }

    /// Tasks.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Provider pool.
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Records emitted so far.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }
}
