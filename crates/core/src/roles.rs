//! Well-known role name constants.
//!
//! These must match the `users.role` CHECK constraint in
//! `20260301000001_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CREATOR: &str = "creator";
pub const ROLE_LEARNER: &str = "learner";
pub const ROLE_GUEST: &str = "guest";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_GUEST, ROLE_LEARNER, ROLE_CREATOR, ROLE_ADMIN];

/// Whether the role may author learning paths.
pub fn can_author(role: &str) -> bool {
    role == ROLE_CREATOR || role == ROLE_ADMIN
}

/// Whether the role may enroll, track progress and annotate lessons.
/// Guests can only browse public listings.
pub fn can_learn(role: &str) -> bool {
    VALID_ROLES.contains(&role) && role != ROLE_GUEST
}
