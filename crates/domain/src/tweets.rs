use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::DomainResult;
use crate::comments::validate_content;
use crate::error::DomainError;
use crate::identity::ActorIdentity;
use crate::ownership::{Owned, assert_owner};
use crate::ports::tweets::TweetRepository;
use crate::ports::users::UserRepository;
use crate::util::{now_ms, parse_id, uuid_v7_without_dashes};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tweet {
    pub tweet_id: String,
    pub owner_id: String,
    pub content: String,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl Owned for Tweet {
    const KIND: &'static str = "tweet";

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

#[derive(Clone)]
pub struct TweetService {
    repository: Arc<dyn TweetRepository>,
    users: Arc<dyn UserRepository>,
}

impl TweetService {
    pub fn new(repository: Arc<dyn TweetRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { repository, users }
    }

    pub async fn create(&self, actor: &ActorIdentity, content: &str) -> DomainResult<Tweet> {
        let content = validate_content(content)?;
        let now = now_ms();
        let tweet = Tweet {
            tweet_id: uuid_v7_without_dashes(),
            owner_id: actor.user_id.clone(),
            content,
            created_at_ms: now,
            updated_at_ms: now,
        };
        self.repository.create(&tweet).await
    }

    pub async fn list_by_user(&self, user_id: &str) -> DomainResult<Vec<Tweet>> {
        let user_id = parse_id("user_id", user_id)?;
        if self.users.get(&user_id).await?.is_none() {
            return Err(DomainError::not_found("user"));
        }
        self.repository.list_by_owner(&user_id).await
    }

    pub async fn update(
        &self,
        actor: &ActorIdentity,
        tweet_id: &str,
        content: &str,
    ) -> DomainResult<Tweet> {
        let tweet_id = parse_id("tweet_id", tweet_id)?;
        let content = validate_content(content)?;
        let mut tweet = self.load(&tweet_id).await?;
        assert_owner(&tweet, &actor.user_id)?;
        tweet.content = content;
        tweet.updated_at_ms = now_ms();
        self.repository.update(&tweet).await
    }

    pub async fn delete(&self, actor: &ActorIdentity, tweet_id: &str) -> DomainResult<()> {
        let tweet_id = parse_id("tweet_id", tweet_id)?;
        let tweet = self.load(&tweet_id).await?;
        assert_owner(&tweet, &actor.user_id)?;
        if !self.repository.delete(&tweet_id).await? {
            return Err(DomainError::not_found("tweet"));
        }
        Ok(())
    }

    async fn load(&self, tweet_id: &str) -> DomainResult<Tweet> {
        self.repository
            .get(tweet_id)
            .await?
            .ok_or_else(|| DomainError::not_found("tweet"))
    }
}
