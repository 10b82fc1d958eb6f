//! Route definitions for the learning surface under `/learn`.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{bookmarks, enrollments, learn, notes, progress};
use crate::state::AppState;

/// Routes mounted at `/learn`.
///
/// ```text
/// GET    /paths                              -> learn::list_paths (no token)
/// GET    /paths/{id}                         -> learn::get_path
/// GET    /lessons/{id}                       -> learn::get_lesson
///
/// GET    /enrollments                        -> enrollments::list
/// POST   /enrollments                        -> enrollments::enroll
/// DELETE /enrollments/{path_id}              -> enrollments::unenroll
///
/// GET    /progress?path_id=                  -> progress::get_for_path
/// PUT    /progress/lessons/{id}              -> progress::record
/// POST   /progress/lessons/{id}/complete     -> progress::mark_complete
/// POST   /progress/lessons/{id}/incomplete   -> progress::mark_incomplete
///
/// GET    /notes?lesson_id=&note_type=        -> notes::list
/// POST   /notes                              -> notes::create
/// PUT    /notes/{id}                         -> notes::update
/// DELETE /notes/{id}                         -> notes::delete
///
/// GET    /bookmarks?bookmark_type=           -> bookmarks::list
/// POST   /bookmarks                          -> bookmarks::create
/// DELETE /bookmarks/{id}                     -> bookmarks::delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/paths", get(learn::list_paths))
        .route("/paths/{id}", get(learn::get_path))
        .route("/lessons/{id}", get(learn::get_lesson))
        .route(
            "/enrollments",
            get(enrollments::list).post(enrollments::enroll),
        )
        .route("/enrollments/{path_id}", delete(enrollments::unenroll))
        .route("/progress", get(progress::get_for_path))
        .route("/progress/lessons/{id}", put(progress::record))
        .route(
            "/progress/lessons/{id}/complete",
            post(progress::mark_complete),
        )
        .route(
            "/progress/lessons/{id}/incomplete",
            post(progress::mark_incomplete),
        )
        .route("/notes", get(notes::list).post(notes::create))
        .route("/notes/{id}", put(notes::update).delete(notes::delete))
        .route("/bookmarks", get(bookmarks::list).post(bookmarks::create))
        .route("/bookmarks/{id}", delete(bookmarks::delete))
}
