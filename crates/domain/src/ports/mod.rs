use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub mod comments;
pub mod credentials;
pub mod db;
pub mod likes;
pub mod playlists;
pub mod subscriptions;
pub mod tokens;
pub mod tweets;
pub mod users;
pub mod videos;

/// Result of inserting a relation guarded by a pair uniqueness constraint.
#[derive(Clone, Debug, PartialEq)]
pub enum InsertOutcome<T> {
    Inserted(T),
    /// The (actor, target) uniqueness constraint rejected the insert.
    Duplicate,
}

/// Every collection the core reads or writes, bundled for service construction.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn users::UserRepository>,
    pub videos: Arc<dyn videos::VideoRepository>,
    pub comments: Arc<dyn comments::CommentRepository>,
    pub tweets: Arc<dyn tweets::TweetRepository>,
    pub playlists: Arc<dyn playlists::PlaylistRepository>,
    pub likes: Arc<dyn likes::LikeRepository>,
    pub subscriptions: Arc<dyn subscriptions::SubscriptionRepository>,
}
