use crate::DomainResult;
use crate::playlists::Playlist;
use crate::ports::BoxFuture;

#[derive(Clone, Debug)]
pub struct PlaylistListQuery {
    pub owner_id: String,
    pub public_only: bool,
    pub offset: usize,
    pub limit: usize,
}

#[allow(clippy::needless_pass_by_value)]
pub trait PlaylistRepository: Send + Sync {
    fn create(&self, playlist: &Playlist) -> BoxFuture<'_, DomainResult<Playlist>>;

    fn get(&self, playlist_id: &str) -> BoxFuture<'_, DomainResult<Option<Playlist>>>;

    fn update(&self, playlist: &Playlist) -> BoxFuture<'_, DomainResult<Playlist>>;

    fn delete(&self, playlist_id: &str) -> BoxFuture<'_, DomainResult<bool>>;

    /// Newest first.
    fn list_by_owner(&self, query: &PlaylistListQuery)
    -> BoxFuture<'_, DomainResult<Vec<Playlist>>>;

    fn count_by_owner(&self, owner_id: &str, public_only: bool)
    -> BoxFuture<'_, DomainResult<u64>>;

    /// Atomic add-to-set. `Ok(None)` when the video is already in the playlist,
    /// `NotFound` when the playlist is gone.
    fn add_video(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> BoxFuture<'_, DomainResult<Option<Playlist>>>;

    /// Atomic pull. `Ok(None)` when the video was not in the playlist.
    fn remove_video(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> BoxFuture<'_, DomainResult<Option<Playlist>>>;
}
