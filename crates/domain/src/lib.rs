pub mod comments;
pub mod error;
pub mod identity;
pub mod likes;
pub mod ownership;
pub mod playlists;
pub mod ports;
pub mod sessions;
pub mod subscriptions;
pub mod toggle;
pub mod tweets;
pub mod users;
pub mod util;
pub mod videos;
pub mod views;

pub type DomainResult<T> = Result<T, error::DomainError>;
