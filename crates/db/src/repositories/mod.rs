//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod bookmark_repo;
pub mod enrollment_repo;
pub mod learning_path_repo;
pub mod lesson_repo;
pub mod module_repo;
pub mod note_repo;
pub mod ownership_repo;
pub mod progress_repo;
mod sibling_order;
pub mod user_repo;

pub use bookmark_repo::BookmarkRepo;
pub use enrollment_repo::EnrollmentRepo;
pub use learning_path_repo::LearningPathRepo;
pub use lesson_repo::LessonRepo;
pub use module_repo::ModuleRepo;
pub use note_repo::NoteRepo;
pub use ownership_repo::OwnershipRepo;
pub use progress_repo::ProgressRepo;
pub use user_repo::UserRepo;
