//! At-most-one membership toggles for likes and subscriptions.
//!
//! The store's pair uniqueness constraint is the only coordination point. An insert that loses
//! to a concurrent toggler comes back as [`InsertOutcome::Duplicate`]; the engine then removes
//! whatever relation won so that the two toggles cancel out.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::DomainResult;
use crate::error::DomainError;
use crate::identity::ActorIdentity;
use crate::likes::{Like, LikeTarget, TargetKind};
use crate::ports::likes::LikeRepository;
use crate::ports::subscriptions::SubscriptionRepository;
use crate::ports::{BoxFuture, InsertOutcome, Repositories};
use crate::subscriptions::Subscription;
use crate::util::{now_ms, parse_id, uuid_v7_without_dashes};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
    /// Whether the relation exists once the toggle has settled.
    pub active: bool,
}

impl ToggleOutcome {
    const ACTIVE: Self = Self { active: true };
    const INACTIVE: Self = Self { active: false };
}

/// One (actor, target) pair in a uniquely-keyed relation collection.
trait PairRelation: Send + Sync {
    type Relation: Send + Sync;

    fn find(&self) -> BoxFuture<'_, DomainResult<Option<Self::Relation>>>;

    fn insert<'a>(
        &'a self,
        relation: &'a Self::Relation,
    ) -> BoxFuture<'a, DomainResult<InsertOutcome<Self::Relation>>>;

    fn delete<'a>(&'a self, relation: &'a Self::Relation) -> BoxFuture<'a, DomainResult<bool>>;
}

struct LikePair<'a> {
    repository: &'a dyn LikeRepository,
    liker_id: &'a str,
    target: &'a LikeTarget,
}

impl PairRelation for LikePair<'_> {
    type Relation = Like;

    fn find(&self) -> BoxFuture<'_, DomainResult<Option<Like>>> {
        self.repository.find(self.liker_id, self.target)
    }

    fn insert<'a>(&'a self, relation: &'a Like) -> BoxFuture<'a, DomainResult<InsertOutcome<Like>>> {
        self.repository.insert(relation)
    }

    fn delete<'a>(&'a self, relation: &'a Like) -> BoxFuture<'a, DomainResult<bool>> {
        self.repository.delete(&relation.like_id)
    }
}

struct SubscriptionPair<'a> {
    repository: &'a dyn SubscriptionRepository,
    subscriber_id: &'a str,
    channel_id: &'a str,
}

impl PairRelation for SubscriptionPair<'_> {
    type Relation = Subscription;

    fn find(&self) -> BoxFuture<'_, DomainResult<Option<Subscription>>> {
        self.repository.find(self.subscriber_id, self.channel_id)
    }

    fn insert<'a>(
        &'a self,
        relation: &'a Subscription,
    ) -> BoxFuture<'a, DomainResult<InsertOutcome<Subscription>>> {
        self.repository.insert(relation)
    }

    fn delete<'a>(&'a self, relation: &'a Subscription) -> BoxFuture<'a, DomainResult<bool>> {
        self.repository.delete(&relation.subscription_id)
    }
}

async fn toggle_pair<P: PairRelation>(
    pair: &P,
    fresh: P::Relation,
) -> DomainResult<ToggleOutcome> {
    if let Some(existing) = pair.find().await? {
        // A concurrent toggler may have removed it first; either way it is gone now.
        pair.delete(&existing).await?;
        return Ok(ToggleOutcome::INACTIVE);
    }

    match pair.insert(&fresh).await? {
        InsertOutcome::Inserted(_) => Ok(ToggleOutcome::ACTIVE),
        InsertOutcome::Duplicate => {
            match pair.find().await? {
                Some(winner) => {
                    let removed = pair.delete(&winner).await?;
                    debug!(removed, "toggle lost insert race; removed competing relation");
                }
                None => debug!("toggle lost insert race; competing relation already removed"),
            }
            Ok(ToggleOutcome::INACTIVE)
        }
    }
}

#[derive(Clone)]
pub struct ToggleEngine {
    repos: Repositories,
}

impl ToggleEngine {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn toggle_like(
        &self,
        actor: &ActorIdentity,
        kind: TargetKind,
        target_id: &str,
    ) -> DomainResult<ToggleOutcome> {
        let target = LikeTarget::parse(kind, target_id)?;
        self.ensure_target_exists(actor, &target).await?;

        let pair = LikePair {
            repository: self.repos.likes.as_ref(),
            liker_id: &actor.user_id,
            target: &target,
        };
        let fresh = Like {
            like_id: uuid_v7_without_dashes(),
            liker_id: actor.user_id.clone(),
            target: target.clone(),
            created_at_ms: now_ms(),
        };
        let outcome = toggle_pair(&pair, fresh).await?;
        debug!(
            user_id = %actor.user_id,
            target_kind = target.kind().as_str(),
            target_id = target.id(),
            active = outcome.active,
            "like toggled"
        );
        Ok(outcome)
    }

    pub async fn toggle_subscription(
        &self,
        actor: &ActorIdentity,
        channel_id: &str,
    ) -> DomainResult<ToggleOutcome> {
        let channel_id = parse_id("channel_id", channel_id)?;
        if channel_id == actor.user_id {
            return Err(DomainError::InvalidOperation(
                "cannot subscribe to your own channel".into(),
            ));
        }
        if self.repos.users.get(&channel_id).await?.is_none() {
            return Err(DomainError::not_found("channel"));
        }

        let pair = SubscriptionPair {
            repository: self.repos.subscriptions.as_ref(),
            subscriber_id: &actor.user_id,
            channel_id: &channel_id,
        };
        let fresh = Subscription {
            subscription_id: uuid_v7_without_dashes(),
            subscriber_id: actor.user_id.clone(),
            channel_id: channel_id.clone(),
            created_at_ms: now_ms(),
        };
        let outcome = toggle_pair(&pair, fresh).await?;
        debug!(
            user_id = %actor.user_id,
            channel_id = %channel_id,
            active = outcome.active,
            "subscription toggled"
        );
        Ok(outcome)
    }

    /// Unpublished videos exist only for their owner.
    async fn ensure_target_exists(
        &self,
        actor: &ActorIdentity,
        target: &LikeTarget,
    ) -> DomainResult<()> {
        let exists = match target {
            LikeTarget::Video(id) => self
                .repos
                .videos
                .get(id)
                .await?
                .is_some_and(|video| video.is_published || video.owner_id == actor.user_id),
            LikeTarget::Comment(id) => self.repos.comments.get(id).await?.is_some(),
            LikeTarget::Tweet(id) => self.repos.tweets.get(id).await?.is_some(),
        };
        if exists {
            Ok(())
        } else {
            Err(DomainError::not_found(target.kind().as_str()))
        }
    }
}
