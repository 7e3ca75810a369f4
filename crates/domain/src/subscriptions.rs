use serde::{Deserialize, Serialize};

/// One (subscriber, channel) edge. A channel is just a user.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscription {
    pub subscription_id: String,
    pub subscriber_id: String,
    pub channel_id: String,
    pub created_at_ms: i64,
}
