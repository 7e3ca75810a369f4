use crate::DomainResult;
use crate::ports::{BoxFuture, InsertOutcome};
use crate::subscriptions::Subscription;

/// Subscription documents, unique per (subscriber, channel).
#[allow(clippy::needless_pass_by_value)]
pub trait SubscriptionRepository: Send + Sync {
    fn find(
        &self,
        subscriber_id: &str,
        channel_id: &str,
    ) -> BoxFuture<'_, DomainResult<Option<Subscription>>>;

    /// Returns `InsertOutcome::Duplicate` when the pair constraint fires. A clash on the
    /// subscription id itself is an `Unknown` error, never a duplicate.
    fn insert(
        &self,
        subscription: &Subscription,
    ) -> BoxFuture<'_, DomainResult<InsertOutcome<Subscription>>>;

    fn delete(&self, subscription_id: &str) -> BoxFuture<'_, DomainResult<bool>>;

    fn count_by_channel(&self, channel_id: &str) -> BoxFuture<'_, DomainResult<u64>>;

    fn count_by_subscriber(&self, subscriber_id: &str) -> BoxFuture<'_, DomainResult<u64>>;

    /// Newest first.
    fn list_by_subscriber(
        &self,
        subscriber_id: &str,
    ) -> BoxFuture<'_, DomainResult<Vec<Subscription>>>;

    /// Newest first.
    fn list_by_channel(&self, channel_id: &str)
    -> BoxFuture<'_, DomainResult<Vec<Subscription>>>;
}
