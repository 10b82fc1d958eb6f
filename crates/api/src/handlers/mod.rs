//! HTTP handlers, one module per resource.
//!
//! Creator-side: [`paths`], [`modules`], [`lessons`].
//! Learner-side: [`learn`], [`enrollments`], [`progress`], [`notes`], [`bookmarks`].

pub mod bookmarks;
pub mod enrollments;
pub mod learn;
pub mod lessons;
pub mod modules;
pub mod notes;
pub mod paths;
pub mod progress;
