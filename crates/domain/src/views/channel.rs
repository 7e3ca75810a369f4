use std::collections::HashMap;

use serde::Serialize;

use crate::DomainResult;
use crate::error::DomainError;
use crate::identity::ActorIdentity;
use crate::ports::videos::VideoListQuery;
use crate::users::{OwnerSummary, normalize_username};
use crate::util::parse_id;
use crate::videos::{SortDirection, Video, VideoFilter, VideoSortField};

use super::ViewComposer;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ChannelProfile {
    pub user_id: String,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
    pub subscribers_count: u64,
    pub subscribed_to_count: u64,
    pub is_subscribed: bool,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SubscribedChannel {
    pub channel: OwnerSummary,
    pub subscribed_at_ms: i64,
    pub latest_video: Option<Video>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ChannelSubscriber {
    pub subscriber: OwnerSummary,
    pub subscribed_at_ms: i64,
}

impl ViewComposer {
    pub async fn channel_profile(
        &self,
        viewer: &ActorIdentity,
        username: &str,
    ) -> DomainResult<ChannelProfile> {
        let username = normalize_username(username);
        if username.is_empty() {
            return Err(DomainError::InvalidArgument("username is required".into()));
        }
        let user = self
            .repos
            .users
            .find_by_username(&username)
            .await?
            .ok_or_else(|| DomainError::not_found("channel"))?;

        let subscribers_count = self.repos.subscriptions.count_by_channel(&user.user_id).await?;
        let subscribed_to_count = self
            .repos
            .subscriptions
            .count_by_subscriber(&user.user_id)
            .await?;
        let is_subscribed = self
            .repos
            .subscriptions
            .find(&viewer.user_id, &user.user_id)
            .await?
            .is_some();

        Ok(ChannelProfile {
            user_id: user.user_id,
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            avatar_url: user.avatar_url,
            cover_image_url: user.cover_image_url,
            subscribers_count,
            subscribed_to_count,
            is_subscribed,
        })
    }

    /// The caller's subscriptions, newest first, each with the channel's latest published video.
    pub async fn subscribed_channels(
        &self,
        actor: &ActorIdentity,
    ) -> DomainResult<Vec<SubscribedChannel>> {
        let subscriptions = self
            .repos
            .subscriptions
            .list_by_subscriber(&actor.user_id)
            .await?;
        let channel_ids: Vec<String> = subscriptions
            .iter()
            .map(|s| s.channel_id.clone())
            .collect();
        let channels: HashMap<String, OwnerSummary> = self
            .repos
            .users
            .get_many(&channel_ids)
            .await?
            .into_iter()
            .map(|user| (user.user_id.clone(), user.summary()))
            .collect();

        let mut items = Vec::with_capacity(subscriptions.len());
        for subscription in subscriptions {
            let Some(channel) = channels.get(&subscription.channel_id) else {
                continue;
            };
            let latest_video = self
                .repos
                .videos
                .list(&VideoListQuery {
                    filter: VideoFilter {
                        owner_id: Some(subscription.channel_id.clone()),
                        published: Some(true),
                        ..VideoFilter::default()
                    },
                    sort_by: VideoSortField::CreatedAt,
                    direction: SortDirection::Desc,
                    offset: 0,
                    limit: Some(1),
                })
                .await?
                .into_iter()
                .next();
            items.push(SubscribedChannel {
                channel: channel.clone(),
                subscribed_at_ms: subscription.created_at_ms,
                latest_video,
            });
        }
        Ok(items)
    }

    pub async fn channel_subscribers(&self, channel_id: &str) -> DomainResult<Vec<ChannelSubscriber>> {
        let channel_id = parse_id("channel_id", channel_id)?;
        if self.repos.users.get(&channel_id).await?.is_none() {
            return Err(DomainError::not_found("channel"));
        }
        let subscriptions = self.repos.subscriptions.list_by_channel(&channel_id).await?;
        let subscriber_ids: Vec<String> = subscriptions
            .iter()
            .map(|s| s.subscriber_id.clone())
            .collect();
        let subscribers: HashMap<String, OwnerSummary> = self
            .repos
            .users
            .get_many(&subscriber_ids)
            .await?
            .into_iter()
            .map(|user| (user.user_id.clone(), user.summary()))
            .collect();

        Ok(subscriptions
            .into_iter()
            .filter_map(|subscription| {
                let subscriber = subscribers.get(&subscription.subscriber_id)?.clone();
                Some(ChannelSubscriber {
                    subscriber,
                    subscribed_at_ms: subscription.created_at_ms,
                })
            })
            .collect())
    }
}
