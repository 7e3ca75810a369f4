mod common;

use common::Harness;
use tubegraph_domain::error::DomainError;
use tubegraph_domain::likes::TargetKind;
use tubegraph_domain::playlists::{PlaylistCreate, PlaylistService};
use tubegraph_domain::util::DAY_MS;
use tubegraph_domain::videos::{SortDirection, VideoSortField};
use tubegraph_domain::views::{FeedQuery, PageRequest, PublishState};

#[tokio::test]
async fn feed_paginates_published_videos() {
    let harness = Harness::new();
    let creator = harness.register("creator").await;
    for index in 0..25 {
        harness
            .seed_video(&creator, &format!("clip {index:02}"), index, 1_000 + index as i64)
            .await;
    }
    let hidden = harness.publish(&creator, "draft").await;
    harness
        .videos
        .toggle_publish(&creator, &hidden.video_id)
        .await
        .expect("unpublish");

    let page_two = harness
        .views
        .feed(FeedQuery {
            page: PageRequest::new(2, 10),
            ..FeedQuery::default()
        })
        .await
        .expect("feed");
    assert_eq!(page_two.items.len(), 10);
    assert_eq!(page_two.total_items, 25);
    assert_eq!(page_two.total_pages, 3);
    assert!(page_two.has_next_page);
    assert_eq!(page_two.items[0].video.title, "clip 14");
    assert_eq!(page_two.items[0].owner.username, "creator");

    let page_three = harness
        .views
        .feed(FeedQuery {
            page: PageRequest::new(3, 10),
            ..FeedQuery::default()
        })
        .await
        .expect("feed");
    assert_eq!(page_three.items.len(), 5);
    assert!(!page_three.has_next_page);
}

#[tokio::test]
async fn feed_filters_by_text_and_owner_and_sorts() {
    let harness = Harness::new();
    let alice = harness.register("alice").await;
    let bob = harness.register("bob").await;
    harness.seed_video(&alice, "Rust ownership", 5, 1).await;
    harness.seed_video(&alice, "Gardening", 50, 2).await;
    harness.seed_video(&bob, "rust lifetimes", 9, 3).await;

    let rust = harness
        .views
        .feed(FeedQuery {
            text: Some("RUST".into()),
            sort_by: Some(VideoSortField::Views),
            direction: Some(SortDirection::Asc),
            ..FeedQuery::default()
        })
        .await
        .expect("feed");
    let titles: Vec<_> = rust.items.iter().map(|item| item.video.title.as_str()).collect();
    assert_eq!(titles, vec!["Rust ownership", "rust lifetimes"]);

    let alice_only = harness
        .views
        .feed(FeedQuery {
            owner_id: Some(alice.user_id.clone()),
            ..FeedQuery::default()
        })
        .await
        .expect("feed");
    assert_eq!(alice_only.total_items, 2);
    assert_eq!(alice_only.items[0].video.title, "Gardening");
}

#[tokio::test]
async fn channel_profile_reports_counts_and_viewer_state() {
    let harness = Harness::new();
    let creator = harness.register("creator").await;
    let viewer = harness.register("viewer").await;
    harness
        .toggles
        .toggle_subscription(&viewer, &creator.user_id)
        .await
        .expect("subscribe");

    let profile = harness
        .views
        .channel_profile(&viewer, "  Creator ")
        .await
        .expect("profile");
    assert_eq!(profile.subscribers_count, 1);
    assert_eq!(profile.subscribed_to_count, 0);
    assert!(profile.is_subscribed);

    let missing = harness.views.channel_profile(&viewer, "nobody").await;
    assert!(matches!(missing, Err(DomainError::NotFound(_))));
    let empty = harness.views.channel_profile(&viewer, "   ").await;
    assert!(matches!(empty, Err(DomainError::InvalidArgument(_))));
}

#[tokio::test]
async fn subscribed_channels_carry_latest_published_video() {
    let harness = Harness::new();
    let creator = harness.register("creator").await;
    let quiet = harness.register("quiet").await;
    let viewer = harness.register("viewer").await;
    harness.seed_video(&creator, "older", 0, 10).await;
    harness.seed_video(&creator, "newest", 0, 20).await;

    for channel in [&creator, &quiet] {
        harness
            .toggles
            .toggle_subscription(&viewer, &channel.user_id)
            .await
            .expect("subscribe");
    }

    let channels = harness
        .views
        .subscribed_channels(&viewer)
        .await
        .expect("channels");
    assert_eq!(channels.len(), 2);
    let creator_entry = channels
        .iter()
        .find(|entry| entry.channel.user_id == creator.user_id)
        .expect("creator entry");
    assert_eq!(
        creator_entry.latest_video.as_ref().map(|v| v.title.as_str()),
        Some("newest")
    );
    let quiet_entry = channels
        .iter()
        .find(|entry| entry.channel.user_id == quiet.user_id)
        .expect("quiet entry");
    assert!(quiet_entry.latest_video.is_none());

    let subscribers = harness
        .views
        .channel_subscribers(&creator.user_id)
        .await
        .expect("subscribers");
    assert_eq!(subscribers.len(), 1);
    assert_eq!(subscribers[0].subscriber.username, "viewer");
}

#[tokio::test]
async fn liked_videos_skip_deleted_videos() {
    let harness = Harness::new();
    let creator = harness.register("creator").await;
    let fan = harness.register("fan").await;
    let keep = harness.publish(&creator, "keep").await;
    let doomed = harness.publish(&creator, "doomed").await;
    for video in [&keep, &doomed] {
        harness
            .toggles
            .toggle_like(&fan, TargetKind::Video, &video.video_id)
            .await
            .expect("like");
    }

    let before = harness
        .views
        .liked_videos(&fan, PageRequest::default())
        .await
        .expect("liked");
    assert_eq!(before.total_items, 2);

    harness
        .videos
        .delete(&creator, &doomed.video_id)
        .await
        .expect("delete");
    let after = harness
        .views
        .liked_videos(&fan, PageRequest::default())
        .await
        .expect("liked");
    assert_eq!(after.total_items, 1);
    assert_eq!(after.items[0].video.video.video_id, keep.video_id);
    assert_eq!(after.items[0].video.owner.username, "creator");
}

#[tokio::test]
async fn unpublished_videos_stay_out_of_other_users_likes() {
    let harness = Harness::new();
    let creator = harness.register("creator").await;
    let fan = harness.register("fan").await;
    let draft = harness.publish(&creator, "draft").await;
    harness
        .videos
        .toggle_publish(&creator, &draft.video_id)
        .await
        .expect("unpublish");

    let refused = harness
        .toggles
        .toggle_like(&fan, TargetKind::Video, &draft.video_id)
        .await;
    assert!(matches!(refused, Err(DomainError::NotFound(_))));
    let own = harness
        .toggles
        .toggle_like(&creator, TargetKind::Video, &draft.video_id)
        .await
        .expect("owner likes own draft");
    assert!(own.active);

    let withdrawn = harness.publish(&creator, "withdrawn").await;
    let kept = harness.publish(&creator, "kept").await;
    for video in [&withdrawn, &kept] {
        harness
            .toggles
            .toggle_like(&fan, TargetKind::Video, &video.video_id)
            .await
            .expect("like");
    }
    harness
        .videos
        .toggle_publish(&creator, &withdrawn.video_id)
        .await
        .expect("unpublish");

    let liked = harness
        .views
        .liked_videos(&fan, PageRequest::default())
        .await
        .expect("liked");
    assert_eq!(liked.total_items, 1);
    assert_eq!(liked.items.len(), 1);
    assert_eq!(liked.items[0].video.video.video_id, kept.video_id);

    let owner_view = harness
        .views
        .liked_videos(&creator, PageRequest::default())
        .await
        .expect("liked");
    assert_eq!(owner_view.total_items, 1);
    assert_eq!(owner_view.items[0].video.video.video_id, draft.video_id);
}

#[tokio::test]
async fn watch_history_is_most_recent_first_without_duplicates() {
    let harness = Harness::new();
    let creator = harness.register("creator").await;
    let viewer = harness.register("viewer").await;
    let first = harness.publish(&creator, "first").await;
    let second = harness.publish(&creator, "second").await;
    let gone = harness.publish(&creator, "gone").await;

    for video in [&first, &second, &first, &gone] {
        harness
            .videos
            .get_for_viewer(&viewer, &video.video_id)
            .await
            .expect("watch");
    }
    harness
        .videos
        .delete(&creator, &gone.video_id)
        .await
        .expect("delete");

    let history = harness.views.watch_history(&viewer).await.expect("history");
    let titles: Vec<_> = history.iter().map(|card| card.video.title.as_str()).collect();
    assert_eq!(titles, vec!["second", "first"]);
    assert_eq!(history[1].video.views, 2);
}

#[tokio::test]
async fn dashboard_stats_sum_owned_videos() {
    let harness = Harness::new();
    let creator = harness.register("creator").await;
    let fan = harness.register("fan").await;
    let newcomer = harness.register("newcomer").await;
    let popular = harness.seed_video(&creator, "popular", 120, 1).await;
    harness.seed_video(&creator, "niche", 7, 2).await;
    harness
        .toggles
        .toggle_like(&fan, TargetKind::Video, &popular.video_id)
        .await
        .expect("like");
    harness
        .toggles
        .toggle_subscription(&fan, &creator.user_id)
        .await
        .expect("subscribe");
    PlaylistService::new(harness.repos.clone())
        .create(
            &creator,
            PlaylistCreate {
                name: "best of".into(),
                description: String::new(),
                is_public: Some(false),
            },
        )
        .await
        .expect("playlist");

    let stats = harness.views.dashboard_stats(&creator).await.expect("stats");
    assert_eq!(stats.total_videos, 2);
    assert_eq!(stats.total_views, 127);
    assert_eq!(stats.total_likes, 1);
    assert_eq!(stats.total_subscribers, 1);
    assert_eq!(stats.total_playlists, 1);
    assert_eq!(stats.top_videos[0].title, "popular");
    assert_eq!(stats.recent_videos[0].title, "niche");

    let empty = harness.views.dashboard_stats(&newcomer).await.expect("stats");
    assert_eq!(empty.total_videos, 0);
    assert_eq!(empty.total_views, 0);
    assert!(empty.top_videos.is_empty());
}

#[tokio::test]
async fn channel_videos_include_drafts_and_like_counts() {
    let harness = Harness::new();
    let creator = harness.register("creator").await;
    let live = harness.publish(&creator, "live").await;
    let draft = harness.publish(&creator, "draft").await;
    harness
        .videos
        .toggle_publish(&creator, &draft.video_id)
        .await
        .expect("unpublish");
    harness
        .toggles
        .toggle_like(&creator, TargetKind::Video, &live.video_id)
        .await
        .expect("like");

    let all = harness
        .views
        .channel_videos(&creator, None, PageRequest::default())
        .await
        .expect("videos");
    assert_eq!(all.total_items, 2);

    let unpublished = harness
        .views
        .channel_videos(&creator, Some(PublishState::Unpublished), PageRequest::default())
        .await
        .expect("videos");
    assert_eq!(unpublished.total_items, 1);
    assert_eq!(unpublished.items[0].video.video_id, draft.video_id);

    let published = harness
        .views
        .channel_videos(&creator, Some(PublishState::Published), PageRequest::default())
        .await
        .expect("videos");
    assert_eq!(published.items[0].likes_count, 1);
}

#[tokio::test]
async fn analytics_groups_window_by_day() {
    let harness = Harness::new();
    let creator = harness.register("creator").await;
    // 2025-02-17T00:00:00Z
    let day = 1_739_750_400_000;
    let now = day + 10 * DAY_MS;
    harness.seed_video(&creator, "a", 10, day + 1_000).await;
    harness.seed_video(&creator, "b", 30, day + 2_000).await;
    harness.seed_video(&creator, "c", 5, day + DAY_MS).await;
    harness.seed_video(&creator, "ancient", 999, day - 40 * DAY_MS).await;

    let analytics = harness
        .views
        .channel_analytics_at(&creator, None, now)
        .await
        .expect("analytics");
    assert_eq!(analytics.period_days, 30);
    assert_eq!(analytics.daily_views.len(), 2);
    assert_eq!(analytics.daily_views[0].date, "2025-02-17");
    assert_eq!(analytics.daily_views[0].views, 40);
    assert_eq!(analytics.daily_views[0].video_count, 2);
    assert_eq!(analytics.daily_views[1].date, "2025-02-18");
    assert_eq!(analytics.engagement.total_views, 45);
    assert_eq!(analytics.engagement.average_views_per_video, 15.0);

    let narrow = harness
        .views
        .channel_analytics_at(&creator, Some(1), now)
        .await
        .expect("analytics");
    assert!(narrow.daily_views.is_empty());
    assert_eq!(narrow.engagement.average_views_per_video, 0.0);

    for days in [0, 366] {
        let result = harness
            .views
            .channel_analytics_at(&creator, Some(days), now)
            .await;
        assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
    }
}
