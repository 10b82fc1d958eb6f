//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the caller from a JWT Bearer token.
//! - [`rbac::RequireCreator`] -- Requires `creator` or `admin` role.
//! - [`rbac::RequireLearner`] -- Requires any role except `guest`.
//! - [`json::AppJson`] -- JSON body extractor whose rejections use the API
//!   error format.

pub mod auth;
pub mod json;
pub mod rbac;
