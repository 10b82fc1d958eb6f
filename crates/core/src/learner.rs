//! Learner-side constants and validators: progress, notes, bookmarks.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

pub const PROGRESS_NOT_STARTED: &str = "not_started";
pub const PROGRESS_IN_PROGRESS: &str = "in_progress";
pub const PROGRESS_COMPLETED: &str = "completed";

pub const VALID_PROGRESS_STATUSES: &[&str] =
    &[PROGRESS_NOT_STARTED, PROGRESS_IN_PROGRESS, PROGRESS_COMPLETED];

/// Validate a progress status string.
pub fn validate_progress_status(status: &str) -> Result<(), String> {
    if VALID_PROGRESS_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid progress status '{status}'. Valid: {}",
            VALID_PROGRESS_STATUSES.join(", ")
        ))
    }
}

/// Validate a completion percentage (0..=100).
pub fn validate_completion_percentage(pct: i32) -> Result<(), String> {
    if (0..=100).contains(&pct) {
        Ok(())
    } else {
        Err(format!("completion_percentage must be 0..=100, got {pct}"))
    }
}

/// Validate accumulated time on a lesson.
pub fn validate_time_spent(seconds: i32) -> Result<(), String> {
    if seconds >= 0 {
        Ok(())
    } else {
        Err(format!("time_spent_seconds must be non-negative, got {seconds}"))
    }
}

/// Derive a status from a percentage when the caller sent only a number.
pub fn status_for_percentage(pct: i32) -> &'static str {
    match pct {
        100.. => PROGRESS_COMPLETED,
        1..=99 => PROGRESS_IN_PROGRESS,
        _ => PROGRESS_NOT_STARTED,
    }
}

/// Aggregate completion figures for one learner on one path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathCompletion {
    pub total_lessons: usize,
    pub completed_lessons: usize,
    pub percentage: f64,
}

impl PathCompletion {
    pub fn from_statuses<'a>(statuses: impl IntoIterator<Item = &'a str>) -> Self {
        let (total, completed) = statuses.into_iter().fold((0, 0), |(t, c), s| {
            (t + 1, if s == PROGRESS_COMPLETED { c + 1 } else { c })
        });
        let percentage = if total == 0 {
            0.0
        } else {
            (completed as f64 / total as f64 * 1000.0).round() / 10.0
        };
        PathCompletion {
            total_lessons: total,
            completed_lessons: completed,
            percentage,
        }
    }
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

pub const NOTE_INSIGHT: &str = "insight";
pub const NOTE_TODO: &str = "todo";
pub const NOTE_QUESTION: &str = "question";
pub const NOTE_CODE_SNIPPET: &str = "code_snippet";

pub const VALID_NOTE_TYPES: &[&str] = &[NOTE_INSIGHT, NOTE_TODO, NOTE_QUESTION, NOTE_CODE_SNIPPET];

/// Maximum length of note content in characters.
pub const MAX_NOTE_CONTENT_LENGTH: u64 = 20_000;

pub fn validate_note_type(note_type: &str) -> Result<(), String> {
    if VALID_NOTE_TYPES.contains(&note_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid note type '{note_type}'. Valid: {}",
            VALID_NOTE_TYPES.join(", ")
        ))
    }
}

/// `validator` adapter for [`validate_note_type`].
pub fn note_type_rule(note_type: &str) -> Result<(), validator::ValidationError> {
    validate_note_type(note_type).map_err(|msg| {
        let mut err = validator::ValidationError::new("note_type");
        err.message = Some(msg.into());
        err
    })
}

// ---------------------------------------------------------------------------
// Bookmarks
// ---------------------------------------------------------------------------

pub const BOOKMARK_LESSON: &str = "lesson";
pub const BOOKMARK_MODULE: &str = "module";
pub const BOOKMARK_PATH: &str = "path";
pub const BOOKMARK_CREATOR: &str = "creator";

pub const VALID_BOOKMARK_TYPES: &[&str] =
    &[BOOKMARK_LESSON, BOOKMARK_MODULE, BOOKMARK_PATH, BOOKMARK_CREATOR];

pub fn validate_bookmark_type(bookmark_type: &str) -> Result<(), String> {
    if VALID_BOOKMARK_TYPES.contains(&bookmark_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid bookmark type '{bookmark_type}'. Valid: {}",
            VALID_BOOKMARK_TYPES.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_status_validation() {
        assert!(validate_progress_status("completed").is_ok());
        assert!(validate_progress_status("done").is_err());
    }

    #[test]
    fn percentage_bounds() {
        assert!(validate_completion_percentage(0).is_ok());
        assert!(validate_completion_percentage(100).is_ok());
        assert!(validate_completion_percentage(101).is_err());
        assert!(validate_completion_percentage(-1).is_err());
    }

    #[test]
    fn time_spent_non_negative() {
        assert!(validate_time_spent(0).is_ok());
        assert!(validate_time_spent(-5).is_err());
    }

    #[test]
    fn status_derived_from_percentage() {
        assert_eq!(status_for_percentage(0), PROGRESS_NOT_STARTED);
        assert_eq!(status_for_percentage(40), PROGRESS_IN_PROGRESS);
        assert_eq!(status_for_percentage(100), PROGRESS_COMPLETED);
    }

    #[test]
    fn completion_rollup() {
        let c = PathCompletion::from_statuses(["completed", "in_progress", "not_started"]);
        assert_eq!(c.total_lessons, 3);
        assert_eq!(c.completed_lessons, 1);
        assert_eq!(c.percentage, 33.3);
    }

    #[test]
    fn completion_rollup_empty() {
        let c = PathCompletion::from_statuses(std::iter::empty());
        assert_eq!(c.percentage, 0.0);
    }

    #[test]
    fn note_and_bookmark_types() {
        assert!(validate_note_type("code_snippet").is_ok());
        assert!(validate_note_type("rant").is_err());
        assert!(validate_bookmark_type("creator").is_ok());
        assert!(validate_bookmark_type("note").is_err());
    }
}
