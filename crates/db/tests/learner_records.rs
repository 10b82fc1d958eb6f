//! Integration tests for learner-side repositories: enrollments, progress,
//! notes and bookmarks.

use sqlx::PgPool;
use trailhead_db::models::bookmark::{BookmarkFilter, CreateBookmark};
use trailhead_db::models::learning_path::CreateLearningPath;
use trailhead_db::models::lesson::CreateLesson;
use trailhead_db::models::module::CreateModule;
use trailhead_db::models::note::{CreateNote, NoteFilter, UpdateNote};
use trailhead_db::models::progress::{LastPosition, RecordProgress};
use trailhead_db::models::user::CreateUser;
use trailhead_db::repositories::{
    BookmarkRepo, EnrollmentRepo, LearningPathRepo, LessonRepo, ModuleRepo, NoteRepo,
    ProgressRepo, UserRepo,
};

struct Seed {
    learner: i64,
    path_id: i64,
    lessons: Vec<i64>,
}

/// One path with two modules: lessons `a`, `b` in the first, `c` in the second.
async fn seed(pool: &PgPool) -> Seed {
    let creator = UserRepo::create(
        pool,
        &CreateUser {
            name: None,
            email: None,
            role: Some("creator".into()),
        },
    )
    .await
    .unwrap();
    let learner = UserRepo::create(
        pool,
        &CreateUser {
            name: Some("Lee".into()),
            email: None,
            role: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(learner.role, "learner");
    let stored = UserRepo::find_by_id(pool, learner.id).await.unwrap().unwrap();
    assert_eq!(stored.name.as_deref(), Some("Lee"));

    let path = LearningPathRepo::create(
        pool,
        creator.id,
        &CreateLearningPath {
            title: "Learner".into(),
            slug: "learner".into(),
            description: None,
            difficulty_level: Some("mixed".into()),
            estimated_hours: Some(2.5),
            tags: Some(vec!["sql".into()]),
            thumbnail_url: None,
        },
    )
    .await
    .unwrap();

    let mut lessons = Vec::new();
    for (module_slug, lesson_slugs) in [("m1", vec!["a", "b"]), ("m2", vec!["c"])] {
        let module = ModuleRepo::create(
            pool,
            path.id,
            &CreateModule {
                title: module_slug.into(),
                slug: module_slug.into(),
                description: None,
                order_index: None,
            },
        )
        .await
        .unwrap();
        for slug in lesson_slugs {
            let lesson = LessonRepo::create(
                pool,
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
            lessons.push(lesson.id);
        }
    }

    Seed {
        learner: learner.id,
        path_id: path.id,
        lessons,
    }
}

// ---------------------------------------------------------------------------
// Enrollments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_enroll_is_idempotent_and_counts_once(pool: PgPool) {
    let s = seed(&pool).await;

    let (first, created) = EnrollmentRepo::enroll(&pool, s.learner, s.path_id)
        .await
        .unwrap();
    assert!(created);
    let (second, created_again) = EnrollmentRepo::enroll(&pool, s.learner, s.path_id)
        .await
        .unwrap();
    assert!(!created_again);
    assert_eq!(first.id, second.id);

    let path = LearningPathRepo::find_by_id(&pool, s.path_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(path.enrollment_count, 1);

    let listed = EnrollmentRepo::list_for_user(&pool, s.learner).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].path_slug, "learner");
    assert!(EnrollmentRepo::is_enrolled(&pool, s.learner, s.path_id)
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unenroll_decrements(pool: PgPool) {
    let s = seed(&pool).await;
    EnrollmentRepo::enroll(&pool, s.learner, s.path_id)
        .await
        .unwrap();
    assert!(EnrollmentRepo::find(&pool, s.learner, s.path_id)
        .await
        .unwrap()
        .is_some());

    assert!(EnrollmentRepo::unenroll(&pool, s.learner, s.path_id)
        .await
        .unwrap());
    assert!(!EnrollmentRepo::unenroll(&pool, s.learner, s.path_id)
        .await
        .unwrap());
    assert!(EnrollmentRepo::find(&pool, s.learner, s.path_id)
        .await
        .unwrap()
        .is_none());

    let path = LearningPathRepo::find_by_id(&pool, s.path_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(path.enrollment_count, 0);
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_complete_twice_leaves_one_row(pool: PgPool) {
    let s = seed(&pool).await;
    let lesson = s.lessons[0];

    let first = ProgressRepo::mark_complete(&pool, s.learner, lesson)
        .await
        .unwrap();
    let second = ProgressRepo::mark_complete(&pool, s.learner, lesson)
        .await
        .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.status, "completed");
    assert_eq!(second.completion_percentage, 100);

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM progress WHERE user_id = $1 AND lesson_id = $2")
            .bind(s.learner)
            .bind(lesson)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);

    let stored = ProgressRepo::find(&pool, s.learner, lesson)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, first.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_incomplete_only_touches_existing_rows(pool: PgPool) {
    let s = seed(&pool).await;

    assert!(ProgressRepo::mark_incomplete(&pool, s.learner, s.lessons[1])
        .await
        .unwrap()
        .is_none());

    ProgressRepo::mark_complete(&pool, s.learner, s.lessons[1])
        .await
        .unwrap();
    let reset = ProgressRepo::mark_incomplete(&pool, s.learner, s.lessons[1])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reset.status, "not_started");
    assert_eq!(reset.completion_percentage, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_record_merges_with_stored_values(pool: PgPool) {
    let s = seed(&pool).await;
    let lesson = s.lessons[2];

    let first = ProgressRepo::record(
        &pool,
        s.learner,
        lesson,
        &RecordProgress {
            completion_percentage: Some(40),
            last_position: Some(LastPosition {
                scroll_position: Some(0.4),
                video_timestamp: None,
            }),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(first.status, "in_progress");
    assert_eq!(first.time_spent_seconds, 0);

    let second = ProgressRepo::record(
        &pool,
        s.learner,
        lesson,
        &RecordProgress {
            time_spent_seconds: Some(90),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(second.completion_percentage, 40);
    assert_eq!(second.time_spent_seconds, 90);
    assert_eq!(
        second.last_position.map(|p| p.0.scroll_position),
        Some(Some(0.4))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_for_path_fills_defaults_in_order(pool: PgPool) {
    let s = seed(&pool).await;
    ProgressRepo::mark_complete(&pool, s.learner, s.lessons[1])
        .await
        .unwrap();

    let rows = ProgressRepo::list_for_path(&pool, s.learner, s.path_id)
        .await
        .unwrap();
    let ids: Vec<i64> = rows.iter().map(|r| r.lesson_id).collect();
    assert_eq!(ids, s.lessons);
    let statuses: Vec<&str> = rows.iter().map(|r| r.status.as_str()).collect();
    assert_eq!(statuses, vec!["not_started", "completed", "not_started"]);
    assert!(rows[0].updated_at.is_none());
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_note_crud_and_filters(pool: PgPool) {
    let s = seed(&pool).await;

    let insight = NoteRepo::create(
        &pool,
        s.learner,
        &CreateNote {
            lesson_id: s.lessons[0],
            note_type: "insight".into(),
            title: "Borrowing".into(),
            content: "Shared xor mutable".into(),
            tags: vec!["rust".into()],
        },
    )
    .await
    .unwrap();
    NoteRepo::create(
        &pool,
        s.learner,
        &CreateNote {
            lesson_id: s.lessons[1],
            note_type: "todo".into(),
            title: "Practice".into(),
            content: String::new(),
            tags: vec![],
        },
    )
    .await
    .unwrap();

    let by_lesson = NoteRepo::list_for_user(
        &pool,
        s.learner,
        &NoteFilter {
            lesson_id: Some(s.lessons[0]),
            note_type: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(by_lesson.len(), 1);
    assert_eq!(by_lesson[0].id, insight.id);

    let todos = NoteRepo::list_for_user(
        &pool,
        s.learner,
        &NoteFilter {
            lesson_id: None,
            note_type: Some("todo".into()),
        },
    )
    .await
    .unwrap();
    assert_eq!(todos.len(), 1);

    let updated = NoteRepo::update(
        &pool,
        insight.id,
        &UpdateNote {
            content: Some("Aliasing xor mutation".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.title, "Borrowing");
    assert_eq!(updated.content, "Aliasing xor mutation");

    assert!(NoteRepo::delete(&pool, insight.id).await.unwrap());
    assert!(NoteRepo::find_by_id(&pool, insight.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Bookmarks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bookmark_idempotent_and_filtered(pool: PgPool) {
    let s = seed(&pool).await;
    let input = CreateBookmark {
        bookmark_type: "lesson".into(),
        target_id: s.lessons[0],
    };

    let (first, created) = BookmarkRepo::create(&pool, s.learner, &input).await.unwrap();
    assert!(created);
    let (again, created) = BookmarkRepo::create(&pool, s.learner, &input).await.unwrap();
    assert!(!created);
    assert_eq!(first.id, again.id);

    BookmarkRepo::create(
        &pool,
        s.learner,
        &CreateBookmark {
            bookmark_type: "path".into(),
            target_id: s.path_id,
        },
    )
    .await
    .unwrap();

    let lessons_only = BookmarkRepo::list_for_user(
        &pool,
        s.learner,
        &BookmarkFilter {
            bookmark_type: Some("lesson".into()),
        },
    )
    .await
    .unwrap();
    assert_eq!(lessons_only.len(), 1);
    let all = BookmarkRepo::list_for_user(&pool, s.learner, &BookmarkFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bookmark_target_exists(pool: PgPool) {
    let s = seed(&pool).await;
    assert!(BookmarkRepo::target_exists(&pool, "lesson", s.lessons[0])
        .await
        .unwrap());
    assert!(BookmarkRepo::target_exists(&pool, "creator", s.learner)
        .await
        .unwrap());
    assert!(!BookmarkRepo::target_exists(&pool, "module", 999_999)
        .await
        .unwrap());
    assert!(!BookmarkRepo::target_exists(&pool, "video", s.lessons[0])
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_lesson_removes_its_bookmarks(pool: PgPool) {
    let s = seed(&pool).await;
    let (bookmark, _) = BookmarkRepo::create(
        &pool,
        s.learner,
        &CreateBookmark {
            bookmark_type: "lesson".into(),
            target_id: s.lessons[2],
        },
    )
    .await
    .unwrap();

    assert!(LessonRepo::delete(&pool, s.lessons[2]).await.unwrap());
    assert!(BookmarkRepo::find_by_id(&pool, bookmark.id)
        .await
        .unwrap()
        .is_none());
}
