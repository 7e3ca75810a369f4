use crate::DomainResult;
use crate::ports::BoxFuture;
use crate::tweets::Tweet;

#[allow(clippy::needless_pass_by_value)]
pub trait TweetRepository: Send + Sync {
    fn create(&self, tweet: &Tweet) -> BoxFuture<'_, DomainResult<Tweet>>;

    fn get(&self, tweet_id: &str) -> BoxFuture<'_, DomainResult<Option<Tweet>>>;

    fn update(&self, tweet: &Tweet) -> BoxFuture<'_, DomainResult<Tweet>>;

    fn delete(&self, tweet_id: &str) -> BoxFuture<'_, DomainResult<bool>>;

    /// Newest first.
    fn list_by_owner(&self, owner_id: &str) -> BoxFuture<'_, DomainResult<Vec<Tweet>>>;
}
