use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tubegraph_domain::DomainResult;
use tubegraph_domain::error::DomainError;
use tubegraph_domain::ports::BoxFuture;
use tubegraph_domain::ports::tweets::TweetRepository;
use tubegraph_domain::tweets::Tweet;

#[derive(Default)]
pub struct InMemoryTweetRepository {
    store: Arc<RwLock<HashMap<String, Tweet>>>,
}

impl InMemoryTweetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TweetRepository for InMemoryTweetRepository {
    fn create(&self, tweet: &Tweet) -> BoxFuture<'_, DomainResult<Tweet>> {
        let tweet = tweet.clone();
        let store = self.store.clone();
        Box::pin(async move {
            let mut items = store.write().await;
            if items.contains_key(&tweet.tweet_id) {
                return Err(DomainError::Conflict("tweet id already exists".into()));
            }
            items.insert(tweet.tweet_id.clone(), tweet.clone());
            Ok(tweet)
        })
    }

    fn get(&self, tweet_id: &str) -> BoxFuture<'_, DomainResult<Option<Tweet>>> {
        let tweet_id = tweet_id.to_string();
        let store = self.store.clone();
        Box::pin(async move { Ok(store.read().await.get(&tweet_id).cloned()) })
    }

    fn update(&self, tweet: &Tweet) -> BoxFuture<'_, DomainResult<Tweet>> {
        let tweet = tweet.clone();
        let store = self.store.clone();
        Box::pin(async move {
            let mut items = store.write().await;
            if !items.contains_key(&tweet.tweet_id) {
                return Err(DomainError::not_found("tweet"));
            }
            items.insert(tweet.tweet_id.clone(), tweet.clone());
            Ok(tweet)
        })
    }

    fn delete(&self, tweet_id: &str) -> BoxFuture<'_, DomainResult<bool>> {
        let tweet_id = tweet_id.to_string();
        let store = self.store.clone();
        Box::pin(async move { Ok(store.write().await.remove(&tweet_id).is_some()) })
    }

    fn list_by_owner(&self, owner_id: &str) -> BoxFuture<'_, DomainResult<Vec<Tweet>>> {
        let owner_id = owner_id.to_string();
        let store = self.store.clone();
        Box::pin(async move {
            let mut tweets = store
                .read()
                .await
                .values()
                .filter(|item| item.owner_id == owner_id)
                .cloned()
                .collect::<Vec<_>>();
            tweets.sort_by(|a, b| {
                b.created_at_ms
                    .cmp(&a.created_at_ms)
                    .then_with(|| b.tweet_id.cmp(&a.tweet_id))
            });
            Ok(tweets)
        })
    }
}
