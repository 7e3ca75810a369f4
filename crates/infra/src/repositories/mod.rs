//! In-memory relation store. Every repository call takes one lock on its collection, so each
//! call is atomic and uniqueness checks cannot interleave with inserts.

use std::sync::Arc;

use tubegraph_domain::ports::Repositories;

mod comments;
mod likes;
mod playlists;
mod subscriptions;
mod tweets;
mod users;
mod videos;

pub use comments::InMemoryCommentRepository;
pub use likes::InMemoryLikeRepository;
pub use playlists::InMemoryPlaylistRepository;
pub use subscriptions::InMemorySubscriptionRepository;
pub use tweets::InMemoryTweetRepository;
pub use users::InMemoryUserRepository;
pub use videos::InMemoryVideoRepository;

pub fn memory_repositories() -> Repositories {
    Repositories {
        users: Arc::new(InMemoryUserRepository::new()),
        videos: Arc::new(InMemoryVideoRepository::new()),
        comments: Arc::new(InMemoryCommentRepository::new()),
        tweets: Arc::new(InMemoryTweetRepository::new()),
        playlists: Arc::new(InMemoryPlaylistRepository::new()),
        likes: Arc::new(InMemoryLikeRepository::new()),
        subscriptions: Arc::new(InMemorySubscriptionRepository::new()),
    }
}
