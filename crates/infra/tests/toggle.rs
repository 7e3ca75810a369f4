mod common;

use std::collections::HashMap;
use std::sync::Arc;

use common::Harness;
use tubegraph_domain::DomainResult;
use tubegraph_domain::error::DomainError;
use tubegraph_domain::likes::{Like, LikeTarget, TargetKind};
use tubegraph_domain::ports::likes::LikeRepository;
use tubegraph_domain::ports::{BoxFuture, InsertOutcome, Repositories};
use tubegraph_domain::util::uuid_v7_without_dashes;
use tubegraph_infra::repositories::{InMemoryLikeRepository, memory_repositories};

#[tokio::test]
async fn sequential_like_toggle_returns_to_empty() {
    let harness = Harness::new();
    let owner = harness.register("owner").await;
    let fan = harness.register("fan").await;
    let video = harness.publish(&owner, "launch").await;

    let first = harness
        .toggles
        .toggle_like(&fan, TargetKind::Video, &video.video_id)
        .await
        .expect("like");
    assert!(first.active);

    let second = harness
        .toggles
        .toggle_like(&fan, TargetKind::Video, &video.video_id)
        .await
        .expect("unlike");
    assert!(!second.active);

    let target = LikeTarget::Video(video.video_id);
    assert_eq!(harness.repos.likes.count_for_target(&target).await.expect("count"), 0);
}

#[tokio::test]
async fn likes_on_different_kinds_are_independent() {
    let harness = Harness::new();
    let owner = harness.register("owner").await;
    let video = harness.publish(&owner, "launch").await;
    let comment = tubegraph_domain::comments::CommentService::new(harness.repos.clone())
        .add(&owner, &video.video_id, "first")
        .await
        .expect("comment");

    assert!(
        harness
            .toggles
            .toggle_like(&owner, TargetKind::Video, &video.video_id)
            .await
            .expect("like video")
            .active
    );
    assert!(
        harness
            .toggles
            .toggle_like(&owner, TargetKind::Comment, &comment.comment_id)
            .await
            .expect("like comment")
            .active
    );
}

#[tokio::test]
async fn like_rejects_malformed_and_missing_targets() {
    let harness = Harness::new();
    let fan = harness.register("fan").await;

    let malformed = harness
        .toggles
        .toggle_like(&fan, TargetKind::Video, "nope")
        .await;
    assert!(matches!(malformed, Err(DomainError::InvalidArgument(_))));

    let missing = harness
        .toggles
        .toggle_like(&fan, TargetKind::Tweet, &uuid_v7_without_dashes())
        .await;
    assert!(matches!(missing, Err(DomainError::NotFound(_))));
}

#[tokio::test]
async fn self_subscription_is_rejected_without_side_effects() {
    let harness = Harness::new();
    let creator = harness.register("creator").await;

    let result = harness
        .toggles
        .toggle_subscription(&creator, &creator.user_id)
        .await;
    assert!(matches!(result, Err(DomainError::InvalidOperation(_))));
    assert_eq!(
        harness
            .repos
            .subscriptions
            .count_by_channel(&creator.user_id)
            .await
            .expect("count"),
        0
    );
}

#[tokio::test]
async fn subscription_toggle_flips_state() {
    let harness = Harness::new();
    let creator = harness.register("creator").await;
    let viewer = harness.register("viewer").await;

    let on = harness
        .toggles
        .toggle_subscription(&viewer, &creator.user_id)
        .await
        .expect("subscribe");
    assert!(on.active);
    let off = harness
        .toggles
        .toggle_subscription(&viewer, &creator.user_id)
        .await
        .expect("unsubscribe");
    assert!(!off.active);

    let missing = harness
        .toggles
        .toggle_subscription(&viewer, &uuid_v7_without_dashes())
        .await;
    assert!(matches!(missing, Err(DomainError::NotFound(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_toggles_never_duplicate_a_relation() {
    let harness = Arc::new(Harness::new());
    let owner = harness.register("owner").await;
    let fan = harness.register("fan").await;
    let video = harness.publish(&owner, "launch").await;

    let mut handles = Vec::new();
    for _ in 0..32 {
        let harness = harness.clone();
        let fan = fan.clone();
        let video_id = video.video_id.clone();
        handles.push(tokio::spawn(async move {
            harness
                .toggles
                .toggle_like(&fan, TargetKind::Video, &video_id)
                .await
        }));
    }
    for handle in handles {
        handle.await.expect("join").expect("toggle");
    }

    let count = harness
        .repos
        .likes
        .count_for_target(&LikeTarget::Video(video.video_id.clone()))
        .await
        .expect("count");
    assert!(count <= 1, "found {count} likes for one pair");

    let mut subscribers = Vec::new();
    for _ in 0..16 {
        let harness = harness.clone();
        let fan = fan.clone();
        let channel = owner.user_id.clone();
        subscribers.push(tokio::spawn(async move {
            harness.toggles.toggle_subscription(&fan, &channel).await
        }));
    }
    for handle in subscribers {
        handle.await.expect("join").expect("toggle");
    }
    let subscriptions = harness
        .repos
        .subscriptions
        .count_by_channel(&owner.user_id)
        .await
        .expect("count");
    assert!(subscriptions <= 1);
}

/// Simulates losing the insert race: a competing toggler's like lands (or has already been
/// removed again) between our lookup and our insert.
struct RacingLikeRepository {
    inner: InMemoryLikeRepository,
    competitor_survives: bool,
}

impl LikeRepository for RacingLikeRepository {
    fn find(&self, liker_id: &str, target: &LikeTarget) -> BoxFuture<'_, DomainResult<Option<Like>>> {
        self.inner.find(liker_id, target)
    }

    fn insert(&self, like: &Like) -> BoxFuture<'_, DomainResult<InsertOutcome<Like>>> {
        let like = like.clone();
        Box::pin(async move {
            if self.competitor_survives {
                let competing = Like {
                    like_id: uuid_v7_without_dashes(),
                    ..like.clone()
                };
                self.inner.insert(&competing).await?;
            }
            Ok(InsertOutcome::Duplicate)
        })
    }

    fn delete(&self, like_id: &str) -> BoxFuture<'_, DomainResult<bool>> {
        self.inner.delete(like_id)
    }

    fn list_video_likes_by_liker(&self, liker_id: &str) -> BoxFuture<'_, DomainResult<Vec<Like>>> {
        self.inner.list_video_likes_by_liker(liker_id)
    }

    fn count_for_target(&self, target: &LikeTarget) -> BoxFuture<'_, DomainResult<u64>> {
        self.inner.count_for_target(target)
    }

    fn count_by_videos(
        &self,
        video_ids: &[String],
    ) -> BoxFuture<'_, DomainResult<HashMap<String, u64>>> {
        self.inner.count_by_videos(video_ids)
    }
}

async fn race_outcome(competitor_survives: bool) -> (bool, u64) {
    let likes = Arc::new(RacingLikeRepository {
        inner: InMemoryLikeRepository::new(),
        competitor_survives,
    });
    let repos = Repositories {
        likes: likes.clone(),
        ..memory_repositories()
    };
    let harness = Harness::with_repos(repos);
    let owner = harness.register("owner").await;
    let video = harness.publish(&owner, "launch").await;

    let outcome = harness
        .toggles
        .toggle_like(&owner, TargetKind::Video, &video.video_id)
        .await
        .expect("toggle");
    let remaining = likes
        .count_for_target(&LikeTarget::Video(video.video_id))
        .await
        .expect("count");
    (outcome.active, remaining)
}

#[tokio::test]
async fn lost_insert_race_removes_the_competing_like() {
    assert_eq!(race_outcome(true).await, (false, 0));
}

#[tokio::test]
async fn lost_insert_race_with_vanished_competitor_reports_inactive() {
    assert_eq!(race_outcome(false).await, (false, 0));
}

#[tokio::test]
async fn like_id_clash_is_not_treated_as_a_duplicate_pair() {
    let repository = InMemoryLikeRepository::new();
    let like_id = uuid_v7_without_dashes();
    let first = Like {
        like_id: like_id.clone(),
        liker_id: uuid_v7_without_dashes(),
        target: LikeTarget::Video(uuid_v7_without_dashes()),
        created_at_ms: 1,
    };
    let clash = Like {
        like_id,
        liker_id: uuid_v7_without_dashes(),
        target: LikeTarget::Tweet(uuid_v7_without_dashes()),
        created_at_ms: 2,
    };

    assert!(matches!(
        repository.insert(&first).await,
        Ok(InsertOutcome::Inserted(_))
    ));
    assert!(matches!(
        repository.insert(&clash).await,
        Err(DomainError::Unknown(_))
    ));
}

#[tokio::test]
async fn video_likes_by_liker_come_back_newest_first() {
    let repository = InMemoryLikeRepository::new();
    let liker_id = uuid_v7_without_dashes();
    for (created_at_ms, target) in [
        (10, LikeTarget::Video(uuid_v7_without_dashes())),
        (30, LikeTarget::Tweet(uuid_v7_without_dashes())),
        (20, LikeTarget::Video(uuid_v7_without_dashes())),
    ] {
        let like = Like {
            like_id: uuid_v7_without_dashes(),
            liker_id: liker_id.clone(),
            target,
            created_at_ms,
        };
        repository.insert(&like).await.expect("insert");
    }

    let listed = repository
        .list_video_likes_by_liker(&liker_id)
        .await
        .expect("list");
    let order: Vec<i64> = listed.iter().map(|like| like.created_at_ms).collect();
    assert_eq!(order, vec![20, 10]);
}
