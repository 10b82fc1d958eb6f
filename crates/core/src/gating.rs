//! Publication state and learner access gating.
//!
//! A path's visibility is two independent flags (`is_published`,
//! `is_public`) plus a gating strategy. Access to an individual lesson is
//! never stored; it is computed on every learner request from these fields,
//! the learner's enrollment and the lesson's flattened position.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const GATING_NONE: &str = "none";
pub const GATING_SIGNUP_REQUIRED: &str = "signup_required";
pub const GATING_PARTIAL_FREE: &str = "partial_free";

/// All valid stored gating strategy values.
pub const VALID_GATING_STRATEGIES: &[&str] =
    &[GATING_NONE, GATING_SIGNUP_REQUIRED, GATING_PARTIAL_FREE];

pub const DIFFICULTY_BEGINNER: &str = "beginner";
pub const DIFFICULTY_INTERMEDIATE: &str = "intermediate";
pub const DIFFICULTY_ADVANCED: &str = "advanced";
pub const DIFFICULTY_MIXED: &str = "mixed";

/// All valid difficulty levels.
pub const VALID_DIFFICULTY_LEVELS: &[&str] = &[
    DIFFICULTY_BEGINNER,
    DIFFICULTY_INTERMEDIATE,
    DIFFICULTY_ADVANCED,
    DIFFICULTY_MIXED,
];

/// Rule controlling which lessons a non-enrolled learner may open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatingStrategy {
    None,
    #[serde(alias = "signupRequired")]
    SignupRequired,
    #[serde(alias = "partialFree")]
    PartialFree,
}

impl GatingStrategy {
    /// Stored (database) representation.
    pub fn as_str(self) -> &'static str {
        match self {
            GatingStrategy::None => GATING_NONE,
            GatingStrategy::SignupRequired => GATING_SIGNUP_REQUIRED,
            GatingStrategy::PartialFree => GATING_PARTIAL_FREE,
        }
    }

    /// Parse a stored value or one of the legacy camel-case spellings.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            GATING_NONE => Ok(GatingStrategy::None),
            GATING_SIGNUP_REQUIRED | "signupRequired" => Ok(GatingStrategy::SignupRequired),
            GATING_PARTIAL_FREE | "partialFree" => Ok(GatingStrategy::PartialFree),
            other => Err(CoreError::Validation(format!(
                "Unknown gating strategy '{other}'. Valid: {}",
                VALID_GATING_STRATEGIES.join(", ")
            ))),
        }
    }
}

/// Validate a difficulty level string.
pub fn validate_difficulty(level: &str) -> Result<(), String> {
    if VALID_DIFFICULTY_LEVELS.contains(&level) {
        Ok(())
    } else {
        Err(format!(
            "Invalid difficulty level '{level}'. Valid: {}",
            VALID_DIFFICULTY_LEVELS.join(", ")
        ))
    }
}

/// `validator` adapter for [`validate_difficulty`].
pub fn difficulty_rule(level: &str) -> Result<(), validator::ValidationError> {
    validate_difficulty(level).map_err(|msg| {
        let mut err = validator::ValidationError::new("difficulty");
        err.message = Some(msg.into());
        err
    })
}

// ---------------------------------------------------------------------------
// Publication state
// ---------------------------------------------------------------------------

/// The publication-related fields of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PublicationState {
    pub is_published: bool,
    pub is_public: bool,
    pub gating_strategy: GatingStrategy,
    pub free_lesson_count: i32,
}

/// Partial publish request. Omitted fields keep their previous values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublishSettings {
    #[serde(alias = "isPublished")]
    pub is_published: Option<bool>,
    #[serde(alias = "isPublic")]
    pub is_public: Option<bool>,
    #[serde(alias = "gatingStrategy")]
    pub gating_strategy: Option<String>,
    #[serde(alias = "freeLessonCount")]
    pub free_lesson_count: Option<i32>,
}

impl PublicationState {
    /// A path is listed publicly only when it is both published and public.
    pub fn is_discoverable(&self) -> bool {
        self.is_published && self.is_public
    }
}

/// A validated publish request, ready to be merged onto the stored row.
///
/// `None` fields keep their stored value; the merge happens in the single
/// UPDATE that writes the row, so concurrent publishes touching different
/// fields do not overwrite each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublicationPatch {
    pub is_published: Option<bool>,
    pub is_public: Option<bool>,
    pub gating_strategy: Option<GatingStrategy>,
    pub free_lesson_count: Option<i32>,
}

impl PublishSettings {
    /// Parse the strategy and check the free lesson count.
    pub fn into_patch(&self) -> Result<PublicationPatch, CoreError> {
        let gating_strategy = self
            .gating_strategy
            .as_deref()
            .map(GatingStrategy::parse)
            .transpose()?;
        if let Some(count) = self.free_lesson_count.filter(|c| *c < 0) {
            return Err(CoreError::Validation(format!(
                "free_lesson_count must be non-negative, got {count}"
            )));
        }
        Ok(PublicationPatch {
            is_published: self.is_published,
            is_public: self.is_public,
            gating_strategy,
            free_lesson_count: self.free_lesson_count,
        })
    }
}

// ---------------------------------------------------------------------------
// Lesson access
// ---------------------------------------------------------------------------

/// Who is asking, relative to the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LearnerStanding {
    pub is_enrolled: bool,
    pub is_owner: bool,
}

/// Why a lesson is locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LockReason {
    EnrollmentRequired,
    BeyondFreePreview,
}

/// Result of a lesson access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonAccess {
    Accessible,
    Locked(LockReason),
}

impl LessonAccess {
    pub fn is_accessible(self) -> bool {
        matches!(self, LessonAccess::Accessible)
    }
}

/// Decide whether a learner may open the lesson at flattened `position`
/// (module order, then lesson order, zero-based) within the path.
pub fn evaluate_lesson_access(
    state: &PublicationState,
    standing: LearnerStanding,
    position: i64,
) -> LessonAccess {
    if standing.is_owner || standing.is_enrolled {
        return LessonAccess::Accessible;
    }
    match state.gating_strategy {
        GatingStrategy::None => LessonAccess::Accessible,
        GatingStrategy::SignupRequired => LessonAccess::Locked(LockReason::EnrollmentRequired),
        GatingStrategy::PartialFree => {
            if position < i64::from(state.free_lesson_count) {
                LessonAccess::Accessible
            } else {
                LessonAccess::Locked(LockReason::BeyondFreePreview)
            }
        }
    }
}

/// Whether the learner may see the path at all: discoverable, or already
/// enrolled, or the owner previewing it.
pub fn can_view_path(state: &PublicationState, standing: LearnerStanding) -> bool {
    state.is_discoverable() || standing.is_enrolled || standing.is_owner
}
