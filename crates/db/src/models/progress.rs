//! Progress entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use trailhead_core::error::CoreError;
use trailhead_core::learner::{
    validate_completion_percentage, validate_progress_status, validate_time_spent,
};
use trailhead_core::types::{DbId, OrderIndex, Timestamp};

/// Where the learner left off inside a lesson.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LastPosition {
    #[serde(default, alias = "scrollPosition", skip_serializing_if = "Option::is_none")]
    pub scroll_position: Option<f64>,
    #[serde(default, alias = "videoTimestamp", skip_serializing_if = "Option::is_none")]
    pub video_timestamp: Option<f64>,
}

/// A row from the `progress` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Progress {
    pub id: DbId,
    pub user_id: DbId,
    pub lesson_id: DbId,
    pub status: String,
    pub completion_percentage: i32,
    pub time_spent_seconds: i32,
    pub last_position: Option<Json<LastPosition>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording progress. Absent fields keep their stored value
/// (or the default on first write).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordProgress {
    pub status: Option<String>,
    #[serde(alias = "completionPercentage")]
    pub completion_percentage: Option<i32>,
    #[serde(alias = "timeSpentSeconds")]
    pub time_spent_seconds: Option<i32>,
    #[serde(alias = "lastPosition")]
    pub last_position: Option<LastPosition>,
}

impl RecordProgress {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(status) = &self.status {
            validate_progress_status(status).map_err(CoreError::Validation)?;
        }
        if let Some(pct) = self.completion_percentage {
            validate_completion_percentage(pct).map_err(CoreError::Validation)?;
        }
        if let Some(seconds) = self.time_spent_seconds {
            validate_time_spent(seconds).map_err(CoreError::Validation)?;
        }
        Ok(())
    }
}

/// One lesson of a path with the learner's progress flattened in.
///
/// Lessons the learner has never touched report `not_started` / 0.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LessonProgress {
    pub lesson_id: DbId,
    pub lesson_title: String,
    pub module_id: DbId,
    pub module_order_index: OrderIndex,
    pub lesson_order_index: OrderIndex,
    pub status: String,
    pub completion_percentage: i32,
    pub time_spent_seconds: i32,
    pub last_position: Option<Json<LastPosition>>,
    pub updated_at: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn record_rejects_out_of_range_percentage() {
        let input = RecordProgress {
            completion_percentage: Some(101),
            ..Default::default()
        };
        assert_matches!(input.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn record_rejects_unknown_status() {
        let input = RecordProgress {
            status: Some("paused".into()),
            ..Default::default()
        };
        assert_matches!(input.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn last_position_accepts_camel_case() {
        let pos: LastPosition =
            serde_json::from_str(r#"{"scrollPosition": 0.5, "videoTimestamp": 42.0}"#).unwrap();
        assert_eq!(pos.scroll_position, Some(0.5));
        assert_eq!(pos.video_timestamp, Some(42.0));
    }
}
