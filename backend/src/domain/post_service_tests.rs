//! Tests for the post service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockIconQuery, MockPostRepository};
use crate::domain::{ErrorCode, PostPage, Username};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn user(id: i32, name: &str) -> User {
    User {
        id: UserId::new(id),
        username: Username::new(name).expect("valid username"),
        profile: None,
        registered_at: fixture_now(),
    }
}

fn post_owned_by(owner: User, likers: Vec<UserId>) -> Post {
    Post {
        id: PostId::new(7),
        content: PostContent::new("hello").expect("valid content"),
        post_type: PostType::Post,
        posted_at: fixture_now(),
        owner,
        likers,
    }
}

#[fixture]
fn alice() -> User {
    user(1, "alice")
}

#[fixture]
fn bob() -> User {
    user(2, "bob")
}

fn icons_returning(blob: &'static str) -> MockIconQuery {
    let mut icons = MockIconQuery::new();
    icons
        .expect_get_icon()
        .returning(move |_| Ok(blob.to_owned()));
    icons
}

fn make_service(
    posts: MockPostRepository,
    icons: MockIconQuery,
) -> PostService<MockPostRepository, MockIconQuery> {
    PostService::new(
        Arc::new(posts),
        Arc::new(icons),
        Arc::new(FixtureClock {
            utc_now: fixture_now(),
        }),
    )
}

fn expect_post(posts: &mut MockPostRepository, post: Option<Post>) {
    posts
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(post));
}

#[rstest]
#[tokio::test]
async fn create_post_projects_new_post(alice: User) {
    let mut posts = MockPostRepository::new();
    posts
        .expect_insert()
        .withf(|new_post| {
            new_post.content.as_str() == "hello"
                && new_post.owner == UserId::new(1)
                && new_post.posted_at == fixture_now()
        })
        .times(1)
        .return_once(|_| Ok(PostId::new(5)));
    let service = make_service(posts, icons_returning("icon"));

    let view = service
        .create_post(PostContent::new("hello").expect("content"), &alice)
        .await
        .expect("create succeeds");

    assert_eq!(view.id, 5);
    assert_eq!(view.content, "hello");
    assert_eq!(view.user.username, "alice");
    assert_eq!(view.user.icon_image, "icon");
    assert_eq!(view.like_count, 0);
    assert!(!view.is_liked);
    assert_eq!(view.posted_at, fixture_now());
}

#[rstest]
#[tokio::test]
async fn create_post_surfaces_store_failures(alice: User) {
    let mut posts = MockPostRepository::new();
    posts
        .expect_insert()
        .return_once(|_| Err(PostRepositoryError::connection("refused")));
    let service = make_service(posts, MockIconQuery::new());

    let error = service
        .create_post(PostContent::new("hello").expect("content"), &alice)
        .await
        .expect_err("store failure");
    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn list_posts_marks_likes_for_viewer(alice: User, bob: User) {
    let mut posts = MockPostRepository::new();
    let liked = post_owned_by(alice.clone(), vec![bob.id]);
    let mut unliked = post_owned_by(alice, Vec::new());
    unliked.id = PostId::new(8);
    posts
        .expect_list()
        .withf(|query| {
            query.owner.as_ref().map(Username::as_str) == Some("alice")
                && query.page == PostPage::default()
        })
        .return_once(move |_| Ok(vec![liked, unliked]));
    let service = make_service(posts, icons_returning(""));

    let views = service
        .list_posts(ListPostsRequest {
            viewer: Some(bob.id),
            owner: Some(Username::new("alice").expect("username")),
            page: PostPage::default(),
        })
        .await
        .expect("listing succeeds");

    let flags: Vec<_> = views.iter().map(|v| (v.id, v.is_liked)).collect();
    assert_eq!(flags, vec![(7, true), (8, false)]);
}

#[rstest]
#[tokio::test]
async fn list_posts_without_viewer_marks_nothing(alice: User, bob: User) {
    let mut posts = MockPostRepository::new();
    let post = post_owned_by(alice, vec![bob.id]);
    posts.expect_list().return_once(move |_| Ok(vec![post]));
    let service = make_service(posts, icons_returning(""));

    let views = service
        .list_posts(ListPostsRequest {
            viewer: None,
            owner: None,
            page: PostPage::default(),
        })
        .await
        .expect("listing succeeds");
    assert!(!views[0].is_liked);
    assert_eq!(views[0].like_count, 1);
}

#[rstest]
#[tokio::test]
async fn update_post_missing_is_not_found(alice: User) {
    let mut posts = MockPostRepository::new();
    expect_post(&mut posts, None);
    let service = make_service(posts, MockIconQuery::new());

    let error = service
        .update_post(
            PostId::new(7),
            PostContent::new("edit").expect("content"),
            &alice,
        )
        .await
        .expect_err("missing post");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_post_by_non_owner_is_forbidden(alice: User, bob: User) {
    let mut posts = MockPostRepository::new();
    expect_post(&mut posts, Some(post_owned_by(alice, Vec::new())));
    posts.expect_update_content().never();
    let service = make_service(posts, MockIconQuery::new());

    let error = service
        .update_post(PostId::new(7), PostContent::new("edit").expect("content"), &bob)
        .await
        .expect_err("forbidden");
    assert_eq!(error.code(), ErrorCode::Forbidden);
    assert_eq!(error.message(), "User:bob cannot update Post:7.");
}

#[rstest]
#[tokio::test]
async fn update_post_by_owner_returns_new_content(alice: User) {
    let mut posts = MockPostRepository::new();
    expect_post(&mut posts, Some(post_owned_by(alice.clone(), Vec::new())));
    posts
        .expect_update_content()
        .withf(|id, content| *id == PostId::new(7) && content.as_str() == "edit")
        .times(1)
        .return_once(|_, _| Ok(()));
    let service = make_service(posts, icons_returning(""));

    let view = service
        .update_post(
            PostId::new(7),
            PostContent::new("edit").expect("content"),
            &alice,
        )
        .await
        .expect("update succeeds");
    assert_eq!(view.content, "edit");
}

#[rstest]
#[tokio::test]
async fn update_post_deleted_before_the_write_is_not_found(alice: User) {
    let store = crate::outbound::memory::InMemoryStore::new();
    let owner = crate::domain::ports::UserRepository::insert_if_absent(
        &store,
        &alice.username,
        fixture_now(),
    )
    .await
    .expect("owner");
    let id = store
        .insert(&NewPost {
            content: PostContent::new("v1").expect("content"),
            post_type: PostType::Post,
            posted_at: fixture_now(),
            owner: owner.id,
        })
        .await
        .expect("insert");

    // Another request deletes the post right after this one loaded it.
    let snapshot = store.find_by_id(id).await.expect("find");
    let racing = store.clone();
    let mut posts = MockPostRepository::new();
    posts
        .expect_find_by_id()
        .return_once(move |_| Ok(snapshot));
    posts
        .expect_update_content()
        .return_once(move |id, content| {
            let content = content.clone();
            futures_util::FutureExt::now_or_never(async move {
                racing.delete(id).await.expect("concurrent delete");
                racing.update_content(id, &content).await
            })
            .expect("in-memory store completes immediately")
        });
    let service = make_service(posts, icons_returning(""));

    let error = service
        .update_post(id, PostContent::new("v2").expect("content"), &owner)
        .await
        .expect_err("post is gone");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), format!("Post:{id} does not exist."));
    assert_eq!(store.find_by_id(id).await, Ok(None));
}

#[rstest]
#[tokio::test]
async fn delete_post_lost_to_a_concurrent_delete_is_not_found(alice: User) {
    let mut posts = MockPostRepository::new();
    expect_post(&mut posts, Some(post_owned_by(alice.clone(), Vec::new())));
    posts
        .expect_delete()
        .return_once(|_| Err(PostRepositoryError::not_found(7)));
    let service = make_service(posts, MockIconQuery::new());

    let error = service
        .delete_post(PostId::new(7), &alice)
        .await
        .expect_err("already deleted");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case::owner(1, None)]
#[case::stranger(2, Some(ErrorCode::Forbidden))]
#[tokio::test]
async fn delete_post_checks_ownership(
    alice: User,
    #[case] actor_id: i32,
    #[case] expected: Option<ErrorCode>,
) {
    let mut posts = MockPostRepository::new();
    expect_post(&mut posts, Some(post_owned_by(alice, Vec::new())));
    posts
        .expect_delete()
        .times(usize::from(expected.is_none()))
        .returning(|_| Ok(()));
    let service = make_service(posts, MockIconQuery::new());

    let outcome = service
        .delete_post(PostId::new(7), &user(actor_id, "actor"))
        .await;
    assert_eq!(outcome.err().map(|err| err.code()), expected);
}

#[rstest]
#[tokio::test]
async fn like_post_returns_new_count(alice: User, bob: User) {
    let mut posts = MockPostRepository::new();
    expect_post(&mut posts, Some(post_owned_by(alice, Vec::new())));
    posts
        .expect_add_like()
        .withf(|post, user| *post == PostId::new(7) && *user == UserId::new(2))
        .return_once(|_, _| Ok(1));
    let service = make_service(posts, MockIconQuery::new());

    let count = service
        .like_post(PostId::new(7), &bob)
        .await
        .expect("like succeeds");
    assert_eq!(count, 1);
}

#[rstest]
#[tokio::test]
async fn like_post_twice_is_rejected(alice: User, bob: User) {
    let mut posts = MockPostRepository::new();
    expect_post(&mut posts, Some(post_owned_by(alice, vec![bob.id])));
    posts.expect_add_like().never();
    let service = make_service(posts, MockIconQuery::new());

    let error = service
        .like_post(PostId::new(7), &bob)
        .await
        .expect_err("duplicate like");
    assert_eq!(error.code(), ErrorCode::UnprocessableEntity);
    assert_eq!(error.message(), "User:bob has already liked Post:7.");
}

#[rstest]
#[tokio::test]
async fn like_post_race_lost_in_store_is_rejected(alice: User, bob: User) {
    let mut posts = MockPostRepository::new();
    expect_post(&mut posts, Some(post_owned_by(alice, Vec::new())));
    posts
        .expect_add_like()
        .return_once(|_, _| Err(PostRepositoryError::already_liked(7, 2)));
    let service = make_service(posts, MockIconQuery::new());

    let error = service
        .like_post(PostId::new(7), &bob)
        .await
        .expect_err("store conflict");
    assert_eq!(error.code(), ErrorCode::UnprocessableEntity);
}

#[rstest]
#[tokio::test]
async fn like_missing_post_is_not_found(bob: User) {
    let mut posts = MockPostRepository::new();
    expect_post(&mut posts, None);
    let service = make_service(posts, MockIconQuery::new());

    let error = service
        .like_post(PostId::new(9), &bob)
        .await
        .expect_err("missing post");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn unlike_post_requires_existing_like(alice: User, bob: User) {
    let mut posts = MockPostRepository::new();
    expect_post(&mut posts, Some(post_owned_by(alice, Vec::new())));
    posts.expect_remove_like().never();
    let service = make_service(posts, MockIconQuery::new());

    let error = service
        .unlike_post(PostId::new(7), &bob)
        .await
        .expect_err("not liked");
    assert_eq!(error.code(), ErrorCode::UnprocessableEntity);
    assert_eq!(error.message(), "User:bob has not liked Post:7.");
}

#[rstest]
#[tokio::test]
async fn unlike_post_returns_new_count(alice: User, bob: User) {
    let mut posts = MockPostRepository::new();
    expect_post(&mut posts, Some(post_owned_by(alice, vec![bob.id])));
    posts.expect_remove_like().return_once(|_, _| Ok(0));
    let service = make_service(posts, MockIconQuery::new());

    let count = service
        .unlike_post(PostId::new(7), &bob)
        .await
        .expect("unlike succeeds");
    assert_eq!(count, 0);
}
