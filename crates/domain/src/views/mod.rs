//! Read-only projections over the relation store.
//!
//! Every view joins owned entities to their owners on read. A row whose joined parent has
//! vanished is dropped, never reported as an error.

use std::collections::HashMap;

use serde::Serialize;

use crate::DomainResult;
use crate::error::DomainError;
use crate::ports::Repositories;
use crate::users::OwnerSummary;
use crate::videos::Video;

mod channel;
mod dashboard;
mod feed;
mod library;

pub use channel::{ChannelProfile, ChannelSubscriber, SubscribedChannel};
pub use dashboard::{
    ChannelAnalytics, ChannelVideo, DailySubscribers, DailyViews, DashboardStats,
    EngagementMetrics, PublishState,
};
pub use feed::FeedQuery;
pub use library::LikedVideo;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

/// Raw paging input as supplied by a caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Applies defaults, rejects zero values and caps the limit.
    pub fn validate(self) -> DomainResult<Pagination> {
        let page = self.page.unwrap_or(DEFAULT_PAGE);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if page == 0 {
            return Err(DomainError::InvalidArgument("page must be at least 1".into()));
        }
        if limit == 0 {
            return Err(DomainError::InvalidArgument("limit must be at least 1".into()));
        }
        Ok(Pagination {
            page,
            limit: limit.min(MAX_LIMIT),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
}

impl Pagination {
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Slices an already-ordered, fully materialized list.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().skip(self.offset()).take(self.limit).collect()
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub current_page: usize,
    pub limit: usize,
    pub total_pages: u64,
    pub has_next_page: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_items: u64, pagination: &Pagination) -> Self {
        let total_pages = total_items.div_ceil(pagination.limit as u64);
        Self {
            items,
            total_items,
            current_page: pagination.page,
            limit: pagination.limit,
            total_pages,
            has_next_page: (pagination.page as u64) < total_pages,
        }
    }
}

/// A video joined to its owner's public summary.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct VideoCard {
    #[serde(flatten)]
    pub video: Video,
    pub owner: OwnerSummary,
}

/// Entry point for every read model.
#[derive(Clone)]
pub struct ViewComposer {
    repos: Repositories,
}

impl ViewComposer {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    async fn owner_summaries(
        &self,
        videos: &[Video],
    ) -> DomainResult<HashMap<String, OwnerSummary>> {
        let mut owner_ids: Vec<String> = videos.iter().map(|v| v.owner_id.clone()).collect();
        owner_ids.sort();
        owner_ids.dedup();
        let owners = self.repos.users.get_many(&owner_ids).await?;
        Ok(owners
            .into_iter()
            .map(|user| (user.user_id.clone(), user.summary()))
            .collect())
    }

    /// Joins owners, dropping videos whose owner is missing. Order is preserved.
    async fn cards(&self, videos: Vec<Video>) -> DomainResult<Vec<VideoCard>> {
        let owners = self.owner_summaries(&videos).await?;
        Ok(videos
            .into_iter()
            .filter_map(|video| {
                let owner = owners.get(&video.owner_id)?.clone();
                Some(VideoCard { video, owner })
            })
            .collect())
    }
}
