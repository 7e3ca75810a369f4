use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tubegraph_domain::DomainResult;
use tubegraph_domain::error::DomainError;
use tubegraph_domain::playlists::Playlist;
use tubegraph_domain::ports::BoxFuture;
use tubegraph_domain::ports::playlists::{PlaylistListQuery, PlaylistRepository};
use tubegraph_domain::util::now_ms;

#[derive(Default)]
pub struct InMemoryPlaylistRepository {
    store: Arc<RwLock<HashMap<String, Playlist>>>,
}

impl InMemoryPlaylistRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn visible(playlist: &Playlist, owner_id: &str, public_only: bool) -> bool {
    playlist.owner_id == owner_id && (!public_only || playlist.is_public)
}

impl PlaylistRepository for InMemoryPlaylistRepository {
    fn create(&self, playlist: &Playlist) -> BoxFuture<'_, DomainResult<Playlist>> {
        let playlist = playlist.clone();
        let store = self.store.clone();
        Box::pin(async move {
            let mut items = store.write().await;
            if items.contains_key(&playlist.playlist_id) {
                return Err(DomainError::Conflict("playlist id already exists".into()));
            }
            items.insert(playlist.playlist_id.clone(), playlist.clone());
            Ok(playlist)
        })
    }

    fn get(&self, playlist_id: &str) -> BoxFuture<'_, DomainResult<Option<Playlist>>> {
        let playlist_id = playlist_id.to_string();
        let store = self.store.clone();
        Box::pin(async move { Ok(store.read().await.get(&playlist_id).cloned()) })
    }

    fn update(&self, playlist: &Playlist) -> BoxFuture<'_, DomainResult<Playlist>> {
        let playlist = playlist.clone();
        let store = self.store.clone();
        Box::pin(async move {
            let mut items = store.write().await;
            let Some(existing) = items.get_mut(&playlist.playlist_id) else {
                return Err(DomainError::not_found("playlist"));
            };
            // Membership only changes through add_video/remove_video.
            let video_ids = std::mem::take(&mut existing.video_ids);
            *existing = Playlist {
                video_ids,
                ..playlist
            };
            Ok(existing.clone())
        })
    }

    fn delete(&self, playlist_id: &str) -> BoxFuture<'_, DomainResult<bool>> {
        let playlist_id = playlist_id.to_string();
        let store = self.store.clone();
        Box::pin(async move { Ok(store.write().await.remove(&playlist_id).is_some()) })
    }

    fn list_by_owner(&self, query: &PlaylistListQuery) -> BoxFuture<'_, DomainResult<Vec<Playlist>>> {
        let query = query.clone();
        let store = self.store.clone();
        Box::pin(async move {
            let mut playlists = store
                .read()
                .await
                .values()
                .filter(|item| visible(item, &query.owner_id, query.public_only))
                .cloned()
                .collect::<Vec<_>>();
            playlists.sort_by(|a, b| {
                b.created_at_ms
                    .cmp(&a.created_at_ms)
                    .then_with(|| b.playlist_id.cmp(&a.playlist_id))
            });
            Ok(playlists
                .into_iter()
                .skip(query.offset)
                .take(query.limit)
                .collect())
        })
    }

    fn count_by_owner(&self, owner_id: &str, public_only: bool) -> BoxFuture<'_, DomainResult<u64>> {
        let owner_id = owner_id.to_string();
        let store = self.store.clone();
        Box::pin(async move {
            let items = store.read().await;
            Ok(items
                .values()
                .filter(|item| visible(item, &owner_id, public_only))
                .count() as u64)
        })
    }

    fn add_video(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> BoxFuture<'_, DomainResult<Option<Playlist>>> {
        let playlist_id = playlist_id.to_string();
        let video_id = video_id.to_string();
        let store = self.store.clone();
        Box::pin(async move {
            let mut items = store.write().await;
            let playlist = items
                .get_mut(&playlist_id)
                .ok_or_else(|| DomainError::not_found("playlist"))?;
            if playlist.video_ids.contains(&video_id) {
                return Ok(None);
            }
            playlist.video_ids.push(video_id);
            playlist.updated_at_ms = now_ms();
            Ok(Some(playlist.clone()))
        })
    }

    fn remove_video(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> BoxFuture<'_, DomainResult<Option<Playlist>>> {
        let playlist_id = playlist_id.to_string();
        let video_id = video_id.to_string();
        let store = self.store.clone();
        Box::pin(async move {
            let mut items = store.write().await;
            let playlist = items
                .get_mut(&playlist_id)
                .ok_or_else(|| DomainError::not_found("playlist"))?;
            let before = playlist.video_ids.len();
            playlist.video_ids.retain(|id| id != &video_id);
            if playlist.video_ids.len() == before {
                return Ok(None);
            }
            playlist.updated_at_ms = now_ms();
            Ok(Some(playlist.clone()))
        })
    }
}
