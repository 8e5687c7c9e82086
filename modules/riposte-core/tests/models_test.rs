//! Model-layer tests against a real database.
//! Requires a Postgres instance with pgvector. Set DATABASE_TEST_URL or
//! these tests are skipped.

use pgvector::Vector;
use riposte_core::{Comment, Image, NewImage, Post, Text, EMBEDDING_DIM};
use sqlx::PgPool;

static DB_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

async fn test_pool() -> Option<(PgPool, tokio::sync::MutexGuard<'static, ()>)> {
    let guard = DB_LOCK.lock().await;

    let url = std::env::var("DATABASE_TEST_URL").ok()?;
    let pool = PgPool::connect(&url).await.ok()?;

    riposte_core::models::migrate(&pool).await.ok()?;

    sqlx::query("TRUNCATE posts RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await
        .ok()?;

    Some((pool, guard))
}

/// Embedding that is `value` in the first component and zero elsewhere,
/// so L2 distances are easy to reason about.
fn embedding(value: f32) -> Vector {
    let mut v = vec![0.0; EMBEDDING_DIM];
    v[0] = value;
    Vector::from(v)
}

#[tokio::test]
async fn find_similar_orders_by_distance_and_respects_limit() {
    let Some((pool, _db)) = test_pool().await else {
        return;
    };

    let querying_post = Post::create("-1", 1, None, &pool).await.unwrap();

    for (i, value) in [5.0_f32, 1.0, 3.0, 9.0].iter().enumerate() {
        let post = Post::create("-1", (i + 10) as i64, None, &pool).await.unwrap();
        Text::create(post.id, &format!("пост {value}"), Some(embedding(*value)), &pool)
            .await
            .unwrap();
    }

    let matches = Text::find_similar(embedding(0.0), querying_post.id, 3, &pool)
        .await
        .unwrap();

    assert_eq!(matches.len(), 3);
    let distances: Vec<f64> = matches.iter().map(|m| m.distance).collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    // Closest first: 1.0, then 3.0, then 5.0; 9.0 is cut by the limit.
    assert_eq!(matches[0].content, "пост 1");
    assert_eq!(matches[1].content, "пост 3");
    assert_eq!(matches[2].content, "пост 5");
}

#[tokio::test]
async fn find_similar_excludes_the_source_post() {
    let Some((pool, _db)) = test_pool().await else {
        return;
    };

    let post = Post::create("-2", 2, None, &pool).await.unwrap();
    Text::create(post.id, "свой текст", Some(embedding(0.0)), &pool)
        .await
        .unwrap();

    let matches = Text::find_similar(embedding(0.0), post.id, 10, &pool)
        .await
        .unwrap();

    assert!(matches.is_empty());
}

#[tokio::test]
async fn texts_without_embeddings_are_not_retrieved() {
    let Some((pool, _db)) = test_pool().await else {
        return;
    };

    let query_post = Post::create("-3", 3, None, &pool).await.unwrap();
    let other = Post::create("-3", 4, None, &pool).await.unwrap();
    Text::create(other.id, "без вектора", None, &pool).await.unwrap();

    let matches = Text::find_similar(embedding(0.0), query_post.id, 10, &pool)
        .await
        .unwrap();

    assert!(matches.is_empty());
}

#[tokio::test]
async fn comment_round_trips_relevant_text_ids() {
    let Some((pool, _db)) = test_pool().await else {
        return;
    };

    let post = Post::create("-4", 5, Some("bob"), &pool).await.unwrap();
    let text_a = Text::create(post.id, "a", Some(embedding(1.0)), &pool).await.unwrap();
    let text_b = Text::create(post.id, "b", Some(embedding(2.0)), &pool).await.unwrap();

    let comment = Comment::create(
        post.id,
        "ответ",
        "FUNNY",
        777,
        &[text_a.id, text_b.id],
        &pool,
    )
    .await
    .unwrap();

    assert_eq!(comment.relevant_text_ids, vec![text_a.id, text_b.id]);

    let loaded = Comment::find_for_post(post.id, &pool).await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].message_id, 777);
    assert_eq!(loaded[0].style, "FUNNY");
}

#[tokio::test]
async fn images_load_for_many_posts() {
    let Some((pool, _db)) = test_pool().await else {
        return;
    };

    let post_a = Post::create("-5", 6, None, &pool).await.unwrap();
    let post_b = Post::create("-5", 7, None, &pool).await.unwrap();

    for (post, n) in [(&post_a, 1), (&post_a, 2), (&post_b, 3)] {
        Image::create(
            NewImage {
                post_id: post.id,
                file_id: format!("f-{n}"),
                storage_key: format!("k-{n}"),
                url: format!("https://files.example/{n}.jpg"),
                mime_type: "image/jpeg".to_string(),
                file_size: 100,
            },
            &pool,
        )
        .await
        .unwrap();
    }

    let images = Image::find_for_posts(&[post_a.id, post_b.id], &pool).await.unwrap();
    assert_eq!(images.len(), 3);

    let none = Image::find_for_posts(&[], &pool).await.unwrap();
    assert!(none.is_empty());
}
