use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tubegraph_domain::DomainResult;
use tubegraph_domain::error::DomainError;
use tubegraph_domain::ports::subscriptions::SubscriptionRepository;
use tubegraph_domain::ports::{BoxFuture, InsertOutcome};
use tubegraph_domain::subscriptions::Subscription;

#[derive(Default)]
struct InMemorySubscriptionState {
    subscriptions: HashMap<String, Subscription>,
    by_pair: HashMap<(String, String), String>,
}

impl InMemorySubscriptionState {
    fn newest_first<F>(&self, keep: F) -> Vec<Subscription>
    where
        F: Fn(&Subscription) -> bool,
    {
        let mut items: Vec<Subscription> = self
            .subscriptions
            .values()
            .filter(|item| keep(item))
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            b.created_at_ms
                .cmp(&a.created_at_ms)
                .then_with(|| b.subscription_id.cmp(&a.subscription_id))
        });
        items
    }
}

#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    state: Arc<RwLock<InMemorySubscriptionState>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubscriptionRepository for InMemorySubscriptionRepository {
    fn find(
        &self,
        subscriber_id: &str,
        channel_id: &str,
    ) -> BoxFuture<'_, DomainResult<Option<Subscription>>> {
        let key = (subscriber_id.to_string(), channel_id.to_string());
        let state = self.state.clone();
        Box::pin(async move {
            let state = state.read().await;
            Ok(state
                .by_pair
                .get(&key)
                .and_then(|id| state.subscriptions.get(id))
                .cloned())
        })
    }

    fn insert(
        &self,
        subscription: &Subscription,
    ) -> BoxFuture<'_, DomainResult<InsertOutcome<Subscription>>> {
        let subscription = subscription.clone();
        let state = self.state.clone();
        Box::pin(async move {
            let mut state = state.write().await;
            if state
                .subscriptions
                .contains_key(&subscription.subscription_id)
            {
                return Err(DomainError::Unknown("subscription id already exists".into()));
            }
            let key = (
                subscription.subscriber_id.clone(),
                subscription.channel_id.clone(),
            );
            if state.by_pair.contains_key(&key) {
                return Ok(InsertOutcome::Duplicate);
            }
            state
                .by_pair
                .insert(key, subscription.subscription_id.clone());
            state
                .subscriptions
                .insert(subscription.subscription_id.clone(), subscription.clone());
            Ok(InsertOutcome::Inserted(subscription))
        })
    }

    fn delete(&self, subscription_id: &str) -> BoxFuture<'_, DomainResult<bool>> {
        let subscription_id = subscription_id.to_string();
        let state = self.state.clone();
        Box::pin(async move {
            let mut state = state.write().await;
            let Some(subscription) = state.subscriptions.remove(&subscription_id) else {
                return Ok(false);
            };
            state
                .by_pair
                .remove(&(subscription.subscriber_id, subscription.channel_id));
            Ok(true)
        })
    }

    fn count_by_channel(&self, channel_id: &str) -> BoxFuture<'_, DomainResult<u64>> {
        let channel_id = channel_id.to_string();
        let state = self.state.clone();
        Box::pin(async move {
            let state = state.read().await;
            Ok(state
                .subscriptions
                .values()
                .filter(|item| item.channel_id == channel_id)
                .count() as u64)
        })
    }

    fn count_by_subscriber(&self, subscriber_id: &str) -> BoxFuture<'_, DomainResult<u64>> {
        let subscriber_id = subscriber_id.to_string();
        let state = self.state.clone();
        Box::pin(async move {
            let state = state.read().await;
            Ok(state
                .subscriptions
                .values()
                .filter(|item| item.subscriber_id == subscriber_id)
                .count() as u64)
        })
    }

    fn list_by_subscriber(
        &self,
        subscriber_id: &str,
    ) -> BoxFuture<'_, DomainResult<Vec<Subscription>>> {
        let subscriber_id = subscriber_id.to_string();
        let state = self.state.clone();
        Box::pin(async move {
            let state = state.read().await;
            Ok(state.newest_first(|item| item.subscriber_id == subscriber_id))
        })
    }

    fn list_by_channel(&self, channel_id: &str) -> BoxFuture<'_, DomainResult<Vec<Subscription>>> {
        let channel_id = channel_id.to_string();
        let state = self.state.clone();
        Box::pin(async move {
            let state = state.read().await;
            Ok(state.newest_first(|item| item.channel_id == channel_id))
        })
    }
}
