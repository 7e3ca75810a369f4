use std::collections::HashMap;

use serde::Serialize;

use crate::DomainResult;
use crate::error::DomainError;
use crate::identity::ActorIdentity;
use crate::likes::LikeTarget;
use crate::videos::Video;

use super::{Page, PageRequest, VideoCard, ViewComposer};

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct LikedVideo {
    pub liked_at_ms: i64,
    pub video: VideoCard,
}

impl ViewComposer {
    /// Newest like first. Likes whose video was deleted, or unpublished by someone else, count
    /// toward nothing.
    pub async fn liked_videos(
        &self,
        actor: &ActorIdentity,
        page: PageRequest,
    ) -> DomainResult<Page<LikedVideo>> {
        let pagination = page.validate()?;
        let likes = self
            .repos
            .likes
            .list_video_likes_by_liker(&actor.user_id)
            .await?;

        let video_ids: Vec<String> = likes
            .iter()
            .filter_map(|like| match &like.target {
                LikeTarget::Video(id) => Some(id.clone()),
                _ => None,
            })
            .collect();
        let videos: HashMap<String, Video> = self
            .repos
            .videos
            .get_many(&video_ids)
            .await?
            .into_iter()
            .map(|video| (video.video_id.clone(), video))
            .collect();

        let live: Vec<(i64, Video)> = likes
            .iter()
            .filter_map(|like| {
                let video = videos.get(like.target.id())?;
                let visible = video.is_published || video.owner_id == actor.user_id;
                visible.then(|| (like.created_at_ms, video.clone()))
            })
            .collect();
        let owners = self
            .owner_summaries(&live.iter().map(|(_, v)| v.clone()).collect::<Vec<_>>())
            .await?;
        let joined: Vec<LikedVideo> = live
            .into_iter()
            .filter_map(|(liked_at_ms, video)| {
                let owner = owners.get(&video.owner_id)?.clone();
                Some(LikedVideo {
                    liked_at_ms,
                    video: VideoCard { video, owner },
                })
            })
            .collect();

        let total = joined.len() as u64;
        Ok(Page::new(pagination.slice(joined), total, &pagination))
    }

    /// Most recently added first. Videos deleted since they were watched are dropped.
    pub async fn watch_history(&self, actor: &ActorIdentity) -> DomainResult<Vec<VideoCard>> {
        let user = self
            .repos
            .users
            .get(&actor.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user"))?;
        let videos: HashMap<String, Video> = self
            .repos
            .videos
            .get_many(&user.watch_history)
            .await?
            .into_iter()
            .map(|video| (video.video_id.clone(), video))
            .collect();

        let ordered: Vec<Video> = user
            .watch_history
            .iter()
            .rev()
            .filter_map(|id| videos.get(id).cloned())
            .collect();
        self.cards(ordered).await
    }
}
