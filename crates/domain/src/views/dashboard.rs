use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::DomainResult;
use crate::error::DomainError;
use crate::identity::ActorIdentity;
use crate::ports::videos::VideoListQuery;
use crate::util::{DAY_MS, format_ms_day, now_ms};
use crate::videos::{SortDirection, Video, VideoFilter, VideoSortField, sort_videos};

use super::{Page, PageRequest, ViewComposer};

pub const DEFAULT_ANALYTICS_DAYS: u32 = 30;
pub const MAX_ANALYTICS_DAYS: u32 = 365;
const HIGHLIGHT_COUNT: usize = 5;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DashboardStats {
    pub total_videos: u64,
    pub total_views: u64,
    pub total_subscribers: u64,
    pub total_likes: u64,
    pub total_playlists: u64,
    pub recent_videos: Vec<Video>,
    pub top_videos: Vec<Video>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishState {
    Published,
    Unpublished,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ChannelVideo {
    #[serde(flatten)]
    pub video: Video,
    pub likes_count: u64,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct DailyViews {
    pub date: String,
    pub views: u64,
    pub video_count: u64,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct DailySubscribers {
    pub date: String,
    pub new_subscribers: u64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct EngagementMetrics {
    pub total_videos: u64,
    pub total_views: u64,
    pub total_likes: u64,
    pub average_views_per_video: f64,
    pub average_likes_per_video: f64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ChannelAnalytics {
    pub period_days: u32,
    pub since_ms: i64,
    pub daily_views: Vec<DailyViews>,
    pub subscriber_growth: Vec<DailySubscribers>,
    pub engagement: EngagementMetrics,
}

impl ViewComposer {
    pub async fn dashboard_stats(&self, actor: &ActorIdentity) -> DomainResult<DashboardStats> {
        let owner_id = actor.user_id.clone();
        let mut videos = self.owned_videos(&owner_id, None).await?;

        let total_views: u64 = videos.iter().map(|v| v.views).sum();
        let video_ids: Vec<String> = videos.iter().map(|v| v.video_id.clone()).collect();
        let total_likes: u64 = self
            .repos
            .likes
            .count_by_videos(&video_ids)
            .await?
            .values()
            .sum();
        let total_subscribers = self.repos.subscriptions.count_by_channel(&owner_id).await?;
        let total_playlists = self.repos.playlists.count_by_owner(&owner_id, false).await?;

        sort_videos(&mut videos, VideoSortField::CreatedAt, SortDirection::Desc);
        let recent_videos = videos.iter().take(HIGHLIGHT_COUNT).cloned().collect();
        sort_videos(&mut videos, VideoSortField::Views, SortDirection::Desc);
        let top_videos = videos.iter().take(HIGHLIGHT_COUNT).cloned().collect();

        Ok(DashboardStats {
            total_videos: videos.len() as u64,
            total_views,
            total_subscribers,
            total_likes,
            total_playlists,
            recent_videos,
            top_videos,
        })
    }

    /// The caller's own videos, published or not, newest first with like counts.
    pub async fn channel_videos(
        &self,
        actor: &ActorIdentity,
        state: Option<PublishState>,
        page: PageRequest,
    ) -> DomainResult<Page<ChannelVideo>> {
        let pagination = page.validate()?;
        let filter = VideoFilter {
            owner_id: Some(actor.user_id.clone()),
            published: state.map(|state| state == PublishState::Published),
            ..VideoFilter::default()
        };
        let total = self.repos.videos.count(&filter).await?;
        let videos = self
            .repos
            .videos
            .list(&VideoListQuery {
                filter,
                sort_by: VideoSortField::CreatedAt,
                direction: SortDirection::Desc,
                offset: pagination.offset(),
                limit: Some(pagination.limit),
            })
            .await?;
        let video_ids: Vec<String> = videos.iter().map(|v| v.video_id.clone()).collect();
        let likes = self.repos.likes.count_by_videos(&video_ids).await?;

        let items = videos
            .into_iter()
            .map(|video| ChannelVideo {
                likes_count: likes.get(&video.video_id).copied().unwrap_or(0),
                video,
            })
            .collect();
        Ok(Page::new(items, total, &pagination))
    }

    pub async fn channel_analytics(
        &self,
        actor: &ActorIdentity,
        days: Option<u32>,
    ) -> DomainResult<ChannelAnalytics> {
        self.channel_analytics_at(actor, days, now_ms()).await
    }

    /// Analytics for the trailing window ending at `now_ms`.
    pub async fn channel_analytics_at(
        &self,
        actor: &ActorIdentity,
        days: Option<u32>,
        now_ms: i64,
    ) -> DomainResult<ChannelAnalytics> {
        let period_days = days.unwrap_or(DEFAULT_ANALYTICS_DAYS);
        if !(1..=MAX_ANALYTICS_DAYS).contains(&period_days) {
            return Err(DomainError::InvalidArgument(format!(
                "period must be between 1 and {MAX_ANALYTICS_DAYS} days"
            )));
        }
        let since_ms = now_ms - i64::from(period_days) * DAY_MS;

        let videos = self.owned_videos(&actor.user_id, Some(since_ms)).await?;
        let mut per_day: BTreeMap<String, DailyViews> = BTreeMap::new();
        for video in &videos {
            let date = format_ms_day(video.created_at_ms);
            let entry = per_day.entry(date.clone()).or_insert(DailyViews {
                date,
                views: 0,
                video_count: 0,
            });
            entry.views += video.views;
            entry.video_count += 1;
        }

        let mut growth: BTreeMap<String, u64> = BTreeMap::new();
        for subscription in self
            .repos
            .subscriptions
            .list_by_channel(&actor.user_id)
            .await?
            .into_iter()
            .filter(|s| s.created_at_ms >= since_ms)
        {
            *growth.entry(format_ms_day(subscription.created_at_ms)).or_default() += 1;
        }

        let video_ids: Vec<String> = videos.iter().map(|v| v.video_id.clone()).collect();
        let total_likes: u64 = self
            .repos
            .likes
            .count_by_videos(&video_ids)
            .await?
            .values()
            .sum();
        let total_videos = videos.len() as u64;
        let total_views: u64 = videos.iter().map(|v| v.views).sum();

        Ok(ChannelAnalytics {
            period_days,
            since_ms,
            daily_views: per_day.into_values().collect(),
            subscriber_growth: growth
                .into_iter()
                .map(|(date, new_subscribers)| DailySubscribers {
                    date,
                    new_subscribers,
                })
                .collect(),
            engagement: EngagementMetrics {
                total_videos,
                total_views,
                total_likes,
                average_views_per_video: average(total_views, total_videos),
                average_likes_per_video: average(total_likes, total_videos),
            },
        })
    }

    async fn owned_videos(&self, owner_id: &str, since_ms: Option<i64>) -> DomainResult<Vec<Video>> {
        self.repos
            .videos
            .list(&VideoListQuery {
                filter: VideoFilter {
                    owner_id: Some(owner_id.to_string()),
                    created_since_ms: since_ms,
                    ..VideoFilter::default()
                },
                ..VideoListQuery::default()
            })
            .await
    }
}

fn average(total: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}
