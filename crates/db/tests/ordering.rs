//! Integration tests for sibling ordering: positional create, reorder and
//! compaction on delete. Every scenario checks that indices stay dense.

use assert_matches::assert_matches;
use sqlx::PgPool;
use trailhead_core::error::CoreError;
use trailhead_core::ordering::{is_dense, items_from_sequence, ReorderItem};
use trailhead_db::models::learning_path::CreateLearningPath;
use trailhead_db::models::lesson::CreateLesson;
use trailhead_db::models::module::{CreateModule, Module};
use trailhead_db::models::user::CreateUser;
use trailhead_db::repositories::{LearningPathRepo, LessonRepo, ModuleRepo, UserRepo};
use trailhead_db::RepoError;

async fn seed_path(pool: &PgPool) -> i64 {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: None,
            email: None,
            role: Some("creator".into()),
        },
    )
    .await
    .unwrap();
    LearningPathRepo::create(
        pool,
        user.id,
        &CreateLearningPath {
            title: "Ordering".into(),
            slug: "ordering".into(),
            description: None,
            difficulty_level: None,
            estimated_hours: None,
            tags: None,
            thumbnail_url: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn add_module(pool: &PgPool, path_id: i64, slug: &str, at: Option<i32>) -> Module {
    ModuleRepo::create(
        pool,
        path_id,
        &CreateModule {
            title: slug.to_uppercase(),
            slug: slug.to_string(),
            description: None,
            order_index: at,
        },
    )
    .await
    .unwrap()
}

async fn module_slugs(pool: &PgPool, path_id: i64) -> Vec<String> {
    let modules = ModuleRepo::list_by_path(pool, path_id).await.unwrap();
    let indices: Vec<i32> = modules.iter().map(|m| m.order_index).collect();
    assert!(is_dense(&indices), "indices not dense: {indices:?}");
    modules.into_iter().map(|m| m.slug).collect()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_appends_by_default(pool: PgPool) {
    let path_id = seed_path(&pool).await;
    let a = add_module(&pool, path_id, "a", None).await;
    let b = add_module(&pool, path_id, "b", None).await;
    // Past the end also appends.
    let c = add_module(&pool, path_id, "c", Some(50)).await;

    assert_eq!((a.order_index, b.order_index, c.order_index), (0, 1, 2));
    assert_eq!(module_slugs(&pool, path_id).await, ["a", "b", "c"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_at_position_shifts_later_siblings(pool: PgPool) {
    let path_id = seed_path(&pool).await;
    add_module(&pool, path_id, "a", None).await;
    add_module(&pool, path_id, "b", None).await;
    let inserted = add_module(&pool, path_id, "x", Some(1)).await;

    assert_eq!(inserted.order_index, 1);
    assert_eq!(module_slugs(&pool, path_id).await, ["a", "x", "b"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_applies_permutation(pool: PgPool) {
    let path_id = seed_path(&pool).await;
    let a = add_module(&pool, path_id, "a", None).await;
    let b = add_module(&pool, path_id, "b", None).await;
    let c = add_module(&pool, path_id, "c", None).await;

    let reordered = ModuleRepo::reorder(&pool, path_id, &items_from_sequence(&[c.id, a.id, b.id]))
        .await
        .unwrap();
    let ids: Vec<i64> = reordered.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![c.id, a.id, b.id]);
    assert_eq!(module_slugs(&pool, path_id).await, ["c", "a", "b"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_rejects_incomplete_list_and_changes_nothing(pool: PgPool) {
    let path_id = seed_path(&pool).await;
    let a = add_module(&pool, path_id, "a", None).await;
    let b = add_module(&pool, path_id, "b", None).await;
    add_module(&pool, path_id, "c", None).await;

    let err = ModuleRepo::reorder(&pool, path_id, &items_from_sequence(&[b.id, a.id]))
        .await
        .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::Validation(_)));
    assert_eq!(module_slugs(&pool, path_id).await, ["a", "b", "c"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_rejects_foreign_id(pool: PgPool) {
    let path_id = seed_path(&pool).await;
    let a = add_module(&pool, path_id, "a", None).await;
    add_module(&pool, path_id, "b", None).await;

    let err = ModuleRepo::reorder(&pool, path_id, &items_from_sequence(&[a.id, 999_999]))
        .await
        .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::Validation(_)));
    assert_eq!(module_slugs(&pool, path_id).await, ["a", "b"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_rejects_tied_index(pool: PgPool) {
    let path_id = seed_path(&pool).await;
    let a = add_module(&pool, path_id, "a", None).await;
    let b = add_module(&pool, path_id, "b", None).await;

    let items = [
        ReorderItem {
            id: a.id,
            order_index: 0,
        },
        ReorderItem {
            id: b.id,
            order_index: 0,
        },
    ];
    let err = ModuleRepo::reorder(&pool, path_id, &items).await.unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_missing_parent(pool: PgPool) {
    let err = ModuleRepo::reorder(&pool, 404_404, &[]).await.unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::NotFound { .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_module_compacts_siblings(pool: PgPool) {
    let path_id = seed_path(&pool).await;
    add_module(&pool, path_id, "a", None).await;
    let b = add_module(&pool, path_id, "b", None).await;
    add_module(&pool, path_id, "c", None).await;

    assert!(ModuleRepo::delete(&pool, b.id).await.unwrap());
    assert_eq!(module_slugs(&pool, path_id).await, ["a", "c"]);

    // A subsequent append lands at the end of the compacted list.
    let d = add_module(&pool, path_id, "d", None).await;
    assert_eq!(d.order_index, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_lesson_ordering_round_trip(pool: PgPool) {
    let path_id = seed_path(&pool).await;
    let module = add_module(&pool, path_id, "m", None).await;

    let mut ids = Vec::new();
    for slug in ["one", "two", "three", "four"] {
        let lesson = LessonRepo::create(
            &pool,
            module.id,
            &CreateLesson {
                title: slug.into(),
                slug: slug.into(),
                content_blocks: vec![],
                order_index: None,
                estimated_minutes: None,
            },
        )
        .await
        .unwrap();
        ids.push(lesson.id);
    }

    ids.reverse();
    LessonRepo::reorder(&pool, module.id, &items_from_sequence(&ids))
        .await
        .unwrap();
    assert!(LessonRepo::delete(&pool, ids[0]).await.unwrap());

    let lessons = LessonRepo::list_by_module(&pool, module.id).await.unwrap();
    let slugs: Vec<&str> = lessons.iter().map(|l| l.slug.as_str()).collect();
    assert_eq!(slugs, vec!["three", "two", "one"]);
    let indices: Vec<i32> = lessons.iter().map(|l| l.order_index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}
