use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::DomainResult;
use crate::error::DomainError;
use crate::identity::ActorIdentity;
use crate::likes::LikeTarget;
use crate::ownership::{Owned, assert_owner};
use crate::ports::Repositories;
use crate::users::{OwnerSummary, validate_url};
use crate::util::{now_ms, parse_id, uuid_v7_without_dashes};

const MAX_TITLE_LENGTH: usize = 200;
const MAX_DESCRIPTION_LENGTH: usize = 5_000;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub video_id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub media_url: String,
    pub thumbnail_url: String,
    pub duration_secs: f64,
    pub views: u64,
    pub is_published: bool,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl Owned for Video {
    const KIND: &'static str = "video";

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

/// Predicate shared by the feed, the dashboard and the store's list/count queries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VideoFilter {
    pub owner_id: Option<String>,
    pub published: Option<bool>,
    /// Case-insensitive substring matched against title or description.
    pub text: Option<String>,
    pub created_since_ms: Option<i64>,
}

impl VideoFilter {
    pub fn matches(&self, video: &Video) -> bool {
        if let Some(owner_id) = self.owner_id.as_deref() {
            if video.owner_id != owner_id {
                return false;
            }
        }
        if let Some(published) = self.published {
            if video.is_published != published {
                return false;
            }
        }
        if let Some(since) = self.created_since_ms {
            if video.created_at_ms < since {
                return false;
            }
        }
        match self.text.as_deref() {
            Some(text) => {
                let needle = text.to_lowercase();
                video.title.to_lowercase().contains(&needle)
                    || video.description.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Views,
    Duration,
    Title,
}

impl VideoSortField {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        match raw.trim() {
            "created_at" | "createdAt" => Ok(Self::CreatedAt),
            "updated_at" | "updatedAt" => Ok(Self::UpdatedAt),
            "views" => Ok(Self::Views),
            "duration" => Ok(Self::Duration),
            "title" => Ok(Self::Title),
            other => Err(DomainError::InvalidArgument(format!(
                "unsupported sort field: {other}"
            ))),
        }
    }

    /// Ascending comparison on this field; ties fall back to the video id.
    pub fn compare(&self, a: &Video, b: &Video) -> Ordering {
        let primary = match self {
            Self::CreatedAt => a.created_at_ms.cmp(&b.created_at_ms),
            Self::UpdatedAt => a.updated_at_ms.cmp(&b.updated_at_ms),
            Self::Views => a.views.cmp(&b.views),
            Self::Duration => a.duration_secs.total_cmp(&b.duration_secs),
            Self::Title => a.title.cmp(&b.title),
        };
        primary.then_with(|| a.video_id.cmp(&b.video_id))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        match raw.trim().to_lowercase().as_str() {
            "asc" | "1" => Ok(Self::Asc),
            "desc" | "-1" => Ok(Self::Desc),
            other => Err(DomainError::InvalidArgument(format!(
                "unsupported sort direction: {other}"
            ))),
        }
    }

    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Sorts in place with the deterministic id tie-break.
pub fn sort_videos(videos: &mut [Video], field: VideoSortField, direction: SortDirection) {
    videos.sort_by(|a, b| direction.apply(field.compare(a, b)));
}

#[derive(Clone, Debug)]
pub struct VideoPublish {
    pub title: String,
    pub description: String,
    pub media_url: String,
    pub thumbnail_url: String,
    pub duration_secs: f64,
}

#[derive(Clone, Debug, Default)]
pub struct VideoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// A single video as seen by a viewer, with its owner and like state.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct VideoDetail {
    #[serde(flatten)]
    pub video: Video,
    pub owner: OwnerSummary,
    pub likes_count: u64,
    pub is_liked: bool,
}

#[derive(Clone)]
pub struct VideoService {
    repos: Repositories,
}

impl VideoService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn publish(&self, actor: &ActorIdentity, input: VideoPublish) -> DomainResult<Video> {
        let input = validate_publish(&input)?;
        let now = now_ms();
        let video = Video {
            video_id: uuid_v7_without_dashes(),
            owner_id: actor.user_id.clone(),
            title: input.title,
            description: input.description,
            media_url: input.media_url,
            thumbnail_url: input.thumbnail_url,
            duration_secs: input.duration_secs,
            views: 0,
            is_published: true,
            created_at_ms: now,
            updated_at_ms: now,
        };
        let created = self.repos.videos.create(&video).await?;
        info!(video_id = %created.video_id, owner_id = %created.owner_id, "video published");
        Ok(created)
    }

    /// Watching a video counts a view and records it in the viewer's history.
    /// Unpublished videos are visible to their owner only.
    pub async fn get_for_viewer(
        &self,
        actor: &ActorIdentity,
        video_id: &str,
    ) -> DomainResult<VideoDetail> {
        let video_id = parse_id("video_id", video_id)?;
        let video = self.load(&video_id).await?;
        if !video.is_published && video.owner_id != actor.user_id {
            return Err(DomainError::not_found("video"));
        }

        let video = self
            .repos
            .videos
            .increment_views(&video_id)
            .await?
            .ok_or_else(|| DomainError::not_found("video"))?;
        self.repos
            .users
            .push_watch_history(&actor.user_id, &video_id)
            .await?;

        let owner = self
            .repos
            .users
            .get(&video.owner_id)
            .await?
            .ok_or_else(|| DomainError::not_found("video owner"))?;
        let target = LikeTarget::Video(video_id);
        let likes_count = self.repos.likes.count_for_target(&target).await?;
        let is_liked = self
            .repos
            .likes
            .find(&actor.user_id, &target)
            .await?
            .is_some();

        Ok(VideoDetail {
            owner: owner.summary(),
            video,
            likes_count,
            is_liked,
        })
    }

    pub async fn update(
        &self,
        actor: &ActorIdentity,
        video_id: &str,
        input: VideoUpdate,
    ) -> DomainResult<Video> {
        let video_id = parse_id("video_id", video_id)?;
        let input = validate_update(&input)?;
        let mut video = self.load(&video_id).await?;
        assert_owner(&video, &actor.user_id)?;

        if let Some(title) = input.title {
            video.title = title;
        }
        if let Some(description) = input.description {
            video.description = description;
        }
        if let Some(thumbnail_url) = input.thumbnail_url {
            video.thumbnail_url = thumbnail_url;
        }
        video.updated_at_ms = now_ms();
        self.repos.videos.update(&video).await
    }

    pub async fn delete(&self, actor: &ActorIdentity, video_id: &str) -> DomainResult<()> {
        let video_id = parse_id("video_id", video_id)?;
        let video = self.load(&video_id).await?;
        assert_owner(&video, &actor.user_id)?;
        if !self.repos.videos.delete(&video_id).await? {
            return Err(DomainError::not_found("video"));
        }
        info!(video_id = %video_id, owner_id = %actor.user_id, "video deleted");
        Ok(())
    }

    pub async fn toggle_publish(&self, actor: &ActorIdentity, video_id: &str) -> DomainResult<Video> {
        let video_id = parse_id("video_id", video_id)?;
        let mut video = self.load(&video_id).await?;
        assert_owner(&video, &actor.user_id)?;
        video.is_published = !video.is_published;
        video.updated_at_ms = now_ms();
        self.repos.videos.update(&video).await
    }

    pub async fn increment_views(&self, video_id: &str) -> DomainResult<Video> {
        let video_id = parse_id("video_id", video_id)?;
        self.repos
            .videos
            .increment_views(&video_id)
            .await?
            .ok_or_else(|| DomainError::not_found("video"))
    }

    async fn load(&self, video_id: &str) -> DomainResult<Video> {
        self.repos
            .videos
            .get(video_id)
            .await?
            .ok_or_else(|| DomainError::not_found("video"))
    }
}

fn validate_title(value: &str) -> DomainResult<String> {
    let title = value.trim();
    if title.is_empty() {
        return Err(DomainError::InvalidArgument("title is required".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(DomainError::InvalidArgument(format!(
            "title exceeds max length of {MAX_TITLE_LENGTH}"
        )));
    }
    Ok(title.to_string())
}

fn validate_description(value: &str) -> DomainResult<String> {
    let description = value.trim();
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(DomainError::InvalidArgument(format!(
            "description exceeds max length of {MAX_DESCRIPTION_LENGTH}"
        )));
    }
    Ok(description.to_string())
}

fn validate_publish(input: &VideoPublish) -> DomainResult<VideoPublish> {
    if !input.duration_secs.is_finite() || input.duration_secs < 0.0 {
        return Err(DomainError::InvalidArgument(
            "duration must be a non-negative number".into(),
        ));
    }
    Ok(VideoPublish {
        title: validate_title(&input.title)?,
        description: validate_description(&input.description)?,
        media_url: validate_url("media_url", &input.media_url)?,
        thumbnail_url: validate_url("thumbnail_url", &input.thumbnail_url)?,
        duration_secs: input.duration_secs,
    })
}

fn validate_update(input: &VideoUpdate) -> DomainResult<VideoUpdate> {
    if input.title.is_none() && input.description.is_none() && input.thumbnail_url.is_none() {
        return Err(DomainError::InvalidArgument(
            "at least one of title, description or thumbnail_url is required".into(),
        ));
    }
    Ok(VideoUpdate {
        title: input.title.as_deref().map(validate_title).transpose()?,
        description: input
            .description
            .as_deref()
            .map(validate_description)
            .transpose()?,
        thumbnail_url: input
            .thumbnail_url
            .as_deref()
            .map(|url| validate_url("thumbnail_url", url))
            .transpose()?,
    })
}
