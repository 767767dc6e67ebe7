//! Input validation for allocation problems.
//!
//! Checks structural integrity of tasks and providers before the first
//! round. Detects:
//! - Duplicate IDs
//! - Scene-size lists that disagree with `scene_number`
//! - Empty, inverted, or overlapping availability windows
//! - Deadlines before the start time
//! - Allocations that reference a provider outside the pool
//! - Providers whose `index` is not their position in the pool
//!
//! All problems are reported at once.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{Provider, Task};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind:?}: {message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// `scene_file_sizes` length differs from `scene_number`.
    SceneCountMismatch,
    /// A window is empty or inverted.
    InvalidWindow,
    /// Two windows of one provider overlap.
    OverlappingWindows,
    /// Deadline precedes the start time.
    InvalidDeadline,
    /// A scene allocation names a provider index outside the pool.
    UnknownProvider,
    /// A provider's `index` differs from its position in the pool.
    IndexMismatch,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates tasks and providers.
///
/// Checks:
/// 1. No duplicate task IDs
/// 2. No duplicate provider IDs
/// 3. Every task has one file size per scene
/// 4. Every task's deadline is at or after its start time
/// 5. Every existing allocation points at a provider in the pool
/// 6. Every window is non-empty and windows of one provider are disjoint
/// 7. Every provider's `index` equals its position
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(tasks: &[Task], providers: &[Provider]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut task_ids = HashSet::new();
    for task in tasks {
        if !task_ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }

        if task.scene_file_sizes.len() != task.scene_number {
            errors.push(ValidationError::new(
                ValidationErrorKind::SceneCountMismatch,
                format!(
                    "Task '{}' has {} scenes but {} file sizes",
                    task.id,
                    task.scene_number,
                    task.scene_file_sizes.len()
                ),
            ));
        }

        if task.deadline_ms < task.start_time_ms {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDeadline,
                format!("Task '{}' ends before it starts", task.id),
            ));
        }

        for (scene, alloc) in task.scene_allocation.iter().enumerate() {
            if let Some(a) = alloc {
                if a.provider >= providers.len() {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::UnknownProvider,
                        format!(
                            "Task '{}' scene {} references unknown provider {}",
                            task.id, scene, a.provider
                        ),
                    ));
                }
            }
        }
    }

    let mut provider_ids = HashSet::new();
    for (position, provider) in providers.iter().enumerate() {
        if provider.index != position {
            errors.push(ValidationError::new(
                ValidationErrorKind::IndexMismatch,
                format!(
                    "Provider '{}' has index {} but sits at position {}",
                    provider.id, provider.index, position
                ),
            ));
        }

        if !provider_ids.insert(provider.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate provider ID: {}", provider.id),
            ));
        }

        if provider.available_hours.is_well_formed() {
            continue;
        }
        let windows = provider.available_hours.windows();
        for w in windows.iter().filter(|w| w.is_empty()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWindow,
                format!(
                    "Provider '{}' has empty window [{}, {}]",
                    provider.id, w.start_ms, w.end_ms
                ),
            ));
        }
        // Windows are kept sorted, so neighbours are enough
        for pair in windows.windows(2) {
            if pair[0].end_ms > pair[1].start_ms {
                errors.push(ValidationError::new(
                    ValidationErrorKind::OverlappingWindows,
                    format!(
                        "Provider '{}' windows [{}, {}] and [{}, {}] overlap",
                        provider.id, pair[0].start_ms, pair[0].end_ms, pair[1].start_ms, pair[1].end_ms
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SceneAllocation, MS_PER_HOUR};

    const H: i64 = MS_PER_HOUR;

    fn task(id: &str) -> Task {
        Task::new(id, 2)
            .with_scene_sizes(vec![1.0, 2.0])
            .with_deadline(10 * H)
    }

    fn provider(index: usize, id: &str) -> Provider {
        Provider::new(index, id).with_window(0, 5 * H)
    }

    fn kinds(r: ValidationResult) -> Vec<ValidationErrorKind> {
        r.err().unwrap_or_default().into_iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&[task("T1"), task("T2")], &[provider(0, "a")]).is_ok());
    }

    #[test]
    fn test_duplicate_ids() {
        let r = validate_input(
            &[task("T1"), task("T1")],
            &[provider(0, "a"), provider(1, "a")],
        );
        assert_eq!(
            kinds(r),
            vec![ValidationErrorKind::DuplicateId, ValidationErrorKind::DuplicateId]
        );
    }

    #[test]
    fn test_scene_count_mismatch() {
        let t = task("T1").with_scene_sizes(vec![1.0]);
        assert_eq!(
            kinds(validate_input(&[t], &[])),
            vec![ValidationErrorKind::SceneCountMismatch]
        );
    }

    #[test]
    fn test_deadline_before_start() {
        let t = task("T1").with_start_time(5 * H).with_deadline(H);
        assert_eq!(
            kinds(validate_input(&[t], &[])),
            vec![ValidationErrorKind::InvalidDeadline]
        );
    }

    #[test]
    fn test_unknown_provider_in_allocation() {
        let mut t = task("T1");
        t.allocate(1, SceneAllocation { start_ms: 0, provider: 2 });
        assert_eq!(
            kinds(validate_input(&[t], &[provider(0, "a")])),
            vec![ValidationErrorKind::UnknownProvider]
        );
    }

    #[test]
    fn test_index_must_match_position() {
        let r = validate_input(&[task("T1")], &[provider(0, "a"), provider(3, "b")]);
        assert_eq!(kinds(r), vec![ValidationErrorKind::IndexMismatch]);
    }

    #[test]
    fn test_bad_windows() {
        let p = Provider::new(0, "a")
            .with_window(0, 3 * H)
            .with_window(2 * H, 4 * H)
            .with_window(6 * H, 6 * H);
        let errs = validate_input(&[], &[p]).unwrap_err();
        let ks: Vec<_> = errs.iter().map(|e| e.kind).collect();
        assert!(ks.contains(&ValidationErrorKind::InvalidWindow));
        assert!(ks.contains(&ValidationErrorKind::OverlappingWindows));
        assert!(errs[0].to_string().contains("Provider 'a'"));
    }
}
