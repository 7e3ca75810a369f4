use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::DomainResult;
use crate::error::DomainError;
use crate::identity::ActorIdentity;
use crate::ownership::{Owned, assert_owner};
use crate::ports::Repositories;
use crate::users::OwnerSummary;
use crate::util::{now_ms, parse_id, uuid_v7_without_dashes};
use crate::views::{Page, PageRequest};

pub(crate) const MAX_CONTENT_LENGTH: usize = 2_000;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub comment_id: String,
    pub owner_id: String,
    pub video_id: String,
    pub content: String,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl Owned for Comment {
    const KIND: &'static str = "comment";

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub owner: OwnerSummary,
}

#[derive(Clone)]
pub struct CommentService {
    repos: Repositories,
}

impl CommentService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Comments on a video, newest first. Comments whose author vanished are skipped.
    pub async fn list_for_video(
        &self,
        video_id: &str,
        page: PageRequest,
    ) -> DomainResult<Page<CommentView>> {
        let video_id = parse_id("video_id", video_id)?;
        let page = page.validate()?;
        if self.repos.videos.get(&video_id).await?.is_none() {
            return Err(DomainError::not_found("video"));
        }

        let total = self.repos.comments.count_by_video(&video_id).await?;
        let comments = self
            .repos
            .comments
            .list_by_video(&video_id, page.offset(), page.limit)
            .await?;

        let owner_ids: Vec<String> = comments.iter().map(|c| c.owner_id.clone()).collect();
        let owners: HashMap<String, OwnerSummary> = self
            .repos
            .users
            .get_many(&owner_ids)
            .await?
            .into_iter()
            .map(|user| (user.user_id.clone(), user.summary()))
            .collect();

        let items = comments
            .into_iter()
            .filter_map(|comment| {
                let owner = owners.get(&comment.owner_id)?.clone();
                Some(CommentView { comment, owner })
            })
            .collect();
        Ok(Page::new(items, total, &page))
    }

    pub async fn add(
        &self,
        actor: &ActorIdentity,
        video_id: &str,
        content: &str,
    ) -> DomainResult<Comment> {
        let video_id = parse_id("video_id", video_id)?;
        let content = validate_content(content)?;
        if self.repos.videos.get(&video_id).await?.is_none() {
            return Err(DomainError::not_found("video"));
        }
        let now = now_ms();
        let comment = Comment {
            comment_id: uuid_v7_without_dashes(),
            owner_id: actor.user_id.clone(),
            video_id,
            content,
            created_at_ms: now,
            updated_at_ms: now,
        };
        self.repos.comments.create(&comment).await
    }

    pub async fn update(
        &self,
        actor: &ActorIdentity,
        comment_id: &str,
        content: &str,
    ) -> DomainResult<Comment> {
        let comment_id = parse_id("comment_id", comment_id)?;
        let content = validate_content(content)?;
        let mut comment = self.load(&comment_id).await?;
        assert_owner(&comment, &actor.user_id)?;
        comment.content = content;
        comment.updated_at_ms = now_ms();
        self.repos.comments.update(&comment).await
    }

    pub async fn delete(&self, actor: &ActorIdentity, comment_id: &str) -> DomainResult<()> {
        let comment_id = parse_id("comment_id", comment_id)?;
        let comment = self.load(&comment_id).await?;
        assert_owner(&comment, &actor.user_id)?;
        if !self.repos.comments.delete(&comment_id).await? {
            return Err(DomainError::not_found("comment"));
        }
        Ok(())
    }

    async fn load(&self, comment_id: &str) -> DomainResult<Comment> {
        self.repos
            .comments
            .get(comment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("comment"))
    }
}

pub(crate) fn validate_content(value: &str) -> DomainResult<String> {
    let content = value.trim();
    if content.is_empty() {
        return Err(DomainError::InvalidArgument("content is required".into()));
    }
    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(DomainError::InvalidArgument(format!(
            "content exceeds max length of {MAX_CONTENT_LENGTH}"
        )));
    }
    Ok(content.to_string())
}
