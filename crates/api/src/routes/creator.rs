//! Route definitions for the authoring surface under `/creator`.

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::{lessons, modules, paths};
use crate::state::AppState;

/// Routes mounted at `/creator`.
///
/// ```text
/// GET    /paths                               -> paths::list
/// POST   /paths                               -> paths::create
/// GET    /paths/{id}                          -> paths::get_by_id
/// PUT    /paths/{id}                          -> paths::update
/// DELETE /paths/{id}                          -> paths::delete
/// POST   /paths/{id}/publish                  -> paths::publish
/// POST   /paths/{id}/duplicate?mode=          -> paths::duplicate
/// GET    /paths/{id}/modules                  -> modules::list_by_path
/// POST   /paths/{id}/modules                  -> modules::create
/// PUT    /paths/{id}/modules/reorder          -> modules::reorder
///
/// GET    /modules/{id}                        -> modules::get_by_id
/// PUT    /modules/{id}                        -> modules::update
/// DELETE /modules/{id}                        -> modules::delete
/// GET    /modules/{id}/lessons                -> lessons::list_by_module
/// POST   /modules/{id}/lessons                -> lessons::create
/// PUT    /modules/{id}/lessons/reorder        -> lessons::reorder
///
/// GET    /lessons/{id}                        -> lessons::get_by_id
/// PUT    /lessons/{id}                        -> lessons::update
/// DELETE /lessons/{id}                        -> lessons::delete
/// PATCH  /lessons/{id}/content                -> lessons::autosave
/// ```
pub fn router() -> Router<AppState> {
    let path_routes = Router::new()
        .route("/", get(paths::list).post(paths::create))
        .route(
            "/{id}",
            get(paths::get_by_id)
                .put(paths::update)
                .delete(paths::delete),
        )
        .route("/{id}/publish", post(paths::publish))
        .route("/{id}/duplicate", post(paths::duplicate))
        .route(
            "/{id}/modules",
            get(modules::list_by_path).post(modules::create),
        )
        .route("/{id}/modules/reorder", put(modules::reorder));

    let module_routes = Router::new()
        .route(
            "/{id}",
            get(modules::get_by_id)
                .put(modules::update)
                .delete(modules::delete),
        )
        .route(
            "/{id}/lessons",
            get(lessons::list_by_module).post(lessons::create),
        )
        .route("/{id}/lessons/reorder", put(lessons::reorder));

    let lesson_routes = Router::new()
        .route(
            "/{id}",
            get(lessons::get_by_id)
                .put(lessons::update)
                .delete(lessons::delete),
        )
        .route("/{id}/content", patch(lessons::autosave));

    Router::new()
        .nest("/paths", path_routes)
        .nest("/modules", module_routes)
        .nest("/lessons", lesson_routes)
}
