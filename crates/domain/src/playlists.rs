use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::DomainResult;
use crate::error::DomainError;
use crate::identity::ActorIdentity;
use crate::ownership::{Owned, assert_owner, assert_readable};
use crate::ports::Repositories;
use crate::ports::playlists::PlaylistListQuery;
use crate::users::OwnerSummary;
use crate::util::{now_ms, parse_id, uuid_v7_without_dashes};
use crate::videos::Video;
use crate::views::{Page, PageRequest};

const MAX_NAME_LENGTH: usize = 150;
const MAX_DESCRIPTION_LENGTH: usize = 2_000;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Playlist {
    pub playlist_id: String,
    pub owner_id: String,
    pub name: String,
    pub description: String,
    pub is_public: bool,
    pub video_ids: Vec<String>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl Owned for Playlist {
    const KIND: &'static str = "playlist";

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

#[derive(Clone, Debug)]
pub struct PlaylistCreate {
    pub name: String,
    pub description: String,
    pub is_public: Option<bool>,
}

#[derive(Clone, Debug, Default)]
pub struct PlaylistUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PlaylistVideo {
    #[serde(flatten)]
    pub video: Video,
    pub owner: Option<OwnerSummary>,
}

/// A playlist with its videos resolved in playlist order.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PlaylistDetail {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub owner: Option<OwnerSummary>,
    pub videos: Vec<PlaylistVideo>,
    pub total_videos: usize,
}

#[derive(Clone)]
pub struct PlaylistService {
    repos: Repositories,
}

impl PlaylistService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn create(
        &self,
        actor: &ActorIdentity,
        input: PlaylistCreate,
    ) -> DomainResult<Playlist> {
        let name = validate_name(&input.name)?;
        let description = validate_description(&input.description)?;
        let now = now_ms();
        let playlist = Playlist {
            playlist_id: uuid_v7_without_dashes(),
            owner_id: actor.user_id.clone(),
            name,
            description,
            is_public: input.is_public.unwrap_or(true),
            video_ids: Vec::new(),
            created_at_ms: now,
            updated_at_ms: now,
        };
        let created = self.repos.playlists.create(&playlist).await?;
        info!(playlist_id = %created.playlist_id, owner_id = %created.owner_id, "playlist created");
        Ok(created)
    }

    /// Videos that were deleted after being added are left out of the detail.
    pub async fn get(&self, actor: &ActorIdentity, playlist_id: &str) -> DomainResult<PlaylistDetail> {
        let playlist_id = parse_id("playlist_id", playlist_id)?;
        let playlist = self.load(&playlist_id).await?;
        assert_readable(&playlist, &actor.user_id)?;

        let videos = self.repos.videos.get_many(&playlist.video_ids).await?;
        let mut owner_ids: Vec<String> = videos.iter().map(|v| v.owner_id.clone()).collect();
        owner_ids.push(playlist.owner_id.clone());
        let owners: HashMap<String, OwnerSummary> = self
            .repos
            .users
            .get_many(&owner_ids)
            .await?
            .into_iter()
            .map(|user| (user.user_id.clone(), user.summary()))
            .collect();

        let by_id: HashMap<&str, &Video> = videos.iter().map(|v| (v.video_id.as_str(), v)).collect();
        let videos: Vec<PlaylistVideo> = playlist
            .video_ids
            .iter()
            .filter_map(|id| by_id.get(id.as_str()))
            .map(|video| PlaylistVideo {
                owner: owners.get(&video.owner_id).cloned(),
                video: (*video).clone(),
            })
            .collect();

        Ok(PlaylistDetail {
            owner: owners.get(&playlist.owner_id).cloned(),
            total_videos: videos.len(),
            videos,
            playlist,
        })
    }

    /// Private playlists are only listed for their owner.
    pub async fn list_for_user(
        &self,
        actor: &ActorIdentity,
        user_id: &str,
        page: PageRequest,
    ) -> DomainResult<Page<Playlist>> {
        let user_id = parse_id("user_id", user_id)?;
        let page = page.validate()?;
        if self.repos.users.get(&user_id).await?.is_none() {
            return Err(DomainError::not_found("user"));
        }
        let public_only = actor.user_id != user_id;
        let total = self
            .repos
            .playlists
            .count_by_owner(&user_id, public_only)
            .await?;
        let items = self
            .repos
            .playlists
            .list_by_owner(&PlaylistListQuery {
                owner_id: user_id,
                public_only,
                offset: page.offset(),
                limit: page.limit,
            })
            .await?;
        Ok(Page::new(items, total, &page))
    }

    pub async fn update(
        &self,
        actor: &ActorIdentity,
        playlist_id: &str,
        input: PlaylistUpdate,
    ) -> DomainResult<Playlist> {
        let playlist_id = parse_id("playlist_id", playlist_id)?;
        if input.name.is_none() && input.description.is_none() && input.is_public.is_none() {
            return Err(DomainError::InvalidArgument(
                "at least one of name, description or is_public is required".into(),
            ));
        }
        let name = input.name.as_deref().map(validate_name).transpose()?;
        let description = input
            .description
            .as_deref()
            .map(validate_description)
            .transpose()?;

        let mut playlist = self.load(&playlist_id).await?;
        assert_owner(&playlist, &actor.user_id)?;
        if let Some(name) = name {
            playlist.name = name;
        }
        if let Some(description) = description {
            playlist.description = description;
        }
        if let Some(is_public) = input.is_public {
            playlist.is_public = is_public;
        }
        playlist.updated_at_ms = now_ms();
        self.repos.playlists.update(&playlist).await
    }

    pub async fn delete(&self, actor: &ActorIdentity, playlist_id: &str) -> DomainResult<()> {
        let playlist_id = parse_id("playlist_id", playlist_id)?;
        let playlist = self.load(&playlist_id).await?;
        assert_owner(&playlist, &actor.user_id)?;
        if !self.repos.playlists.delete(&playlist_id).await? {
            return Err(DomainError::not_found("playlist"));
        }
        Ok(())
    }

    pub async fn add_video(
        &self,
        actor: &ActorIdentity,
        playlist_id: &str,
        video_id: &str,
    ) -> DomainResult<Playlist> {
        let playlist_id = parse_id("playlist_id", playlist_id)?;
        let video_id = parse_id("video_id", video_id)?;
        let playlist = self.load(&playlist_id).await?;
        assert_owner(&playlist, &actor.user_id)?;
        if self.repos.videos.get(&video_id).await?.is_none() {
            return Err(DomainError::not_found("video"));
        }
        self.repos
            .playlists
            .add_video(&playlist_id, &video_id)
            .await?
            .ok_or_else(|| DomainError::Conflict("video is already in the playlist".into()))
    }

    pub async fn remove_video(
        &self,
        actor: &ActorIdentity,
        playlist_id: &str,
        video_id: &str,
    ) -> DomainResult<Playlist> {
        let playlist_id = parse_id("playlist_id", playlist_id)?;
        let video_id = parse_id("video_id", video_id)?;
        let playlist = self.load(&playlist_id).await?;
        assert_owner(&playlist, &actor.user_id)?;
        self.repos
            .playlists
            .remove_video(&playlist_id, &video_id)
            .await?
            .ok_or_else(|| DomainError::InvalidArgument("video is not in the playlist".into()))
    }

    async fn load(&self, playlist_id: &str) -> DomainResult<Playlist> {
        self.repos
            .playlists
            .get(playlist_id)
            .await?
            .ok_or_else(|| DomainError::not_found("playlist"))
    }
}

fn validate_name(value: &str) -> DomainResult<String> {
    let name = value.trim();
    if name.is_empty() {
        return Err(DomainError::InvalidArgument("name is required".into()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::InvalidArgument(format!(
            "name exceeds max length of {MAX_NAME_LENGTH}"
        )));
    }
    Ok(name.to_string())
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
