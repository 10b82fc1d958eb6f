//! Domain logic for the trailhead learning platform.
//!
//! Everything in this crate is pure: no database handles, no HTTP types.
//! The `db` crate persists what these modules describe and the `api` crate
//! enforces the rules at request time.

pub mod content_block;
pub mod error;
pub mod gating;
pub mod learner;
pub mod ordering;
pub mod ownership;
pub mod roles;
pub mod slug;
pub mod types;
