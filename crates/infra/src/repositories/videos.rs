use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tubegraph_domain::DomainResult;
use tubegraph_domain::error::DomainError;
use tubegraph_domain::ports::BoxFuture;
use tubegraph_domain::ports::videos::{VideoListQuery, VideoRepository};
use tubegraph_domain::videos::{Video, VideoFilter, sort_videos};

#[derive(Default)]
pub struct InMemoryVideoRepository {
    store: Arc<RwLock<HashMap<String, Video>>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VideoRepository for InMemoryVideoRepository {
    fn create(&self, video: &Video) -> BoxFuture<'_, DomainResult<Video>> {
        let video = video.clone();
        let store = self.store.clone();
        Box::pin(async move {
            let mut items = store.write().await;
            if items.contains_key(&video.video_id) {
                return Err(DomainError::Conflict("video id already exists".into()));
            }
            items.insert(video.video_id.clone(), video.clone());
            Ok(video)
        })
    }

    fn get(&self, video_id: &str) -> BoxFuture<'_, DomainResult<Option<Video>>> {
        let video_id = video_id.to_string();
        let store = self.store.clone();
        Box::pin(async move { Ok(store.read().await.get(&video_id).cloned()) })
    }

    fn get_many(&self, video_ids: &[String]) -> BoxFuture<'_, DomainResult<Vec<Video>>> {
        let video_ids = video_ids.to_vec();
        let store = self.store.clone();
        Box::pin(async move {
            let items = store.read().await;
            let mut seen = std::collections::HashSet::new();
            Ok(video_ids
                .iter()
                .filter(|id| seen.insert(id.as_str()))
                .filter_map(|id| items.get(id).cloned())
                .collect())
        })
    }

    fn update(&self, video: &Video) -> BoxFuture<'_, DomainResult<Video>> {
        let video = video.clone();
        let store = self.store.clone();
        Box::pin(async move {
            let mut items = store.write().await;
            let Some(existing) = items.get_mut(&video.video_id) else {
                return Err(DomainError::not_found("video"));
            };
            // Views only move through increment_views.
            let views = existing.views;
            *existing = Video { views, ..video };
            Ok(existing.clone())
        })
    }

    fn delete(&self, video_id: &str) -> BoxFuture<'_, DomainResult<bool>> {
        let video_id = video_id.to_string();
        let store = self.store.clone();
        Box::pin(async move { Ok(store.write().await.remove(&video_id).is_some()) })
    }

    fn increment_views(&self, video_id: &str) -> BoxFuture<'_, DomainResult<Option<Video>>> {
        let video_id = video_id.to_string();
        let store = self.store.clone();
        Box::pin(async move {
            let mut items = store.write().await;
            Ok(items.get_mut(&video_id).map(|video| {
                video.views = video.views.saturating_add(1);
                video.clone()
            }))
        })
    }

    fn list(&self, query: &VideoListQuery) -> BoxFuture<'_, DomainResult<Vec<Video>>> {
        let query = query.clone();
        let store = self.store.clone();
        Box::pin(async move {
            let mut videos: Vec<Video> = store
                .read()
                .await
                .values()
                .filter(|video| query.filter.matches(video))
                .cloned()
                .collect();
            sort_videos(&mut videos, query.sort_by, query.direction);
            let page = videos.into_iter().skip(query.offset);
            Ok(match query.limit {
                Some(limit) => page.take(limit).collect(),
                None => page.collect(),
            })
        })
    }

    fn count(&self, filter: &VideoFilter) -> BoxFuture<'_, DomainResult<u64>> {
        let filter = filter.clone();
        let store = self.store.clone();
        Box::pin(async move {
            let items = store.read().await;
            Ok(items.values().filter(|video| filter.matches(video)).count() as u64)
        })
    }
}
