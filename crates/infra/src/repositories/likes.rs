use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tubegraph_domain::DomainResult;
use tubegraph_domain::error::DomainError;
use tubegraph_domain::likes::{Like, LikeTarget, TargetKind};
use tubegraph_domain::ports::likes::LikeRepository;
use tubegraph_domain::ports::{BoxFuture, InsertOutcome};

#[derive(Default)]
struct InMemoryLikeState {
    likes: HashMap<String, Like>,
    /// One entry per (liker, target). The target carries its kind, so this covers
    /// the video, comment and tweet constraints at once.
    by_pair: HashMap<(String, LikeTarget), String>,
}

#[derive(Default)]
pub struct InMemoryLikeRepository {
    state: Arc<RwLock<InMemoryLikeState>>,
}

impl InMemoryLikeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LikeRepository for InMemoryLikeRepository {
    fn find(&self, liker_id: &str, target: &LikeTarget) -> BoxFuture<'_, DomainResult<Option<Like>>> {
        let key = (liker_id.to_string(), target.clone());
        let state = self.state.clone();
        Box::pin(async move {
            let state = state.read().await;
            Ok(state
                .by_pair
                .get(&key)
                .and_then(|like_id| state.likes.get(like_id))
                .cloned())
        })
    }

    fn insert(&self, like: &Like) -> BoxFuture<'_, DomainResult<InsertOutcome<Like>>> {
        let like = like.clone();
        let state = self.state.clone();
        Box::pin(async move {
            let mut state = state.write().await;
            if state.likes.contains_key(&like.like_id) {
                return Err(DomainError::Unknown("like id already exists".into()));
            }
            let key = (like.liker_id.clone(), like.target.clone());
            if state.by_pair.contains_key(&key) {
                return Ok(InsertOutcome::Duplicate);
            }
            state.by_pair.insert(key, like.like_id.clone());
            state.likes.insert(like.like_id.clone(), like.clone());
            Ok(InsertOutcome::Inserted(like))
        })
    }

    fn delete(&self, like_id: &str) -> BoxFuture<'_, DomainResult<bool>> {
        let like_id = like_id.to_string();
        let state = self.state.clone();
        Box::pin(async move {
            let mut state = state.write().await;
            let Some(like) = state.likes.remove(&like_id) else {
                return Ok(false);
            };
            state.by_pair.remove(&(like.liker_id, like.target));
            Ok(true)
        })
    }

    fn list_video_likes_by_liker(&self, liker_id: &str) -> BoxFuture<'_, DomainResult<Vec<Like>>> {
        let liker_id = liker_id.to_string();
        let state = self.state.clone();
        Box::pin(async move {
            let mut likes = state
                .read()
                .await
                .likes
                .values()
                .filter(|like| like.liker_id == liker_id && like.target.kind() == TargetKind::Video)
                .cloned()
                .collect::<Vec<_>>();
            likes.sort_by(|a, b| {
                b.created_at_ms
                    .cmp(&a.created_at_ms)
                    .then_with(|| b.like_id.cmp(&a.like_id))
            });
            Ok(likes)
        })
    }

    fn count_for_target(&self, target: &LikeTarget) -> BoxFuture<'_, DomainResult<u64>> {
        let target = target.clone();
        let state = self.state.clone();
        Box::pin(async move {
            let state = state.read().await;
            Ok(state.likes.values().filter(|like| like.target == target).count() as u64)
        })
    }

    fn count_by_videos(
        &self,
        video_ids: &[String],
    ) -> BoxFuture<'_, DomainResult<HashMap<String, u64>>> {
        let video_ids: std::collections::HashSet<String> = video_ids.iter().cloned().collect();
        let state = self.state.clone();
        Box::pin(async move {
            let state = state.read().await;
            let mut counts: HashMap<String, u64> = HashMap::new();
            for like in state.likes.values() {
                if let LikeTarget::Video(id) = &like.target {
                    if video_ids.contains(id) {
                        *counts.entry(id.clone()).or_default() += 1;
                    }
                }
            }
            Ok(counts)
        })
    }
}
