//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod bookmark;
pub mod enrollment;
pub mod learning_path;
pub mod lesson;
pub mod module;
pub mod note;
pub mod progress;
pub mod user;
