use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tubegraph_domain::DomainResult;
use tubegraph_domain::comments::Comment;
use tubegraph_domain::error::DomainError;
use tubegraph_domain::ports::BoxFuture;
use tubegraph_domain::ports::comments::CommentRepository;

#[derive(Default)]
pub struct InMemoryCommentRepository {
    store: Arc<RwLock<HashMap<String, Comment>>>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommentRepository for InMemoryCommentRepository {
    fn create(&self, comment: &Comment) -> BoxFuture<'_, DomainResult<Comment>> {
        let comment = comment.clone();
        let store = self.store.clone();
        Box::pin(async move {
            let mut items = store.write().await;
            if items.contains_key(&comment.comment_id) {
                return Err(DomainError::Conflict("comment id already exists".into()));
            }
            items.insert(comment.comment_id.clone(), comment.clone());
            Ok(comment)
        })
    }

    fn get(&self, comment_id: &str) -> BoxFuture<'_, DomainResult<Option<Comment>>> {
        let comment_id = comment_id.to_string();
        let store = self.store.clone();
        Box::pin(async move { Ok(store.read().await.get(&comment_id).cloned()) })
    }

    fn update(&self, comment: &Comment) -> BoxFuture<'_, DomainResult<Comment>> {
        let comment = comment.clone();
        let store = self.store.clone();
        Box::pin(async move {
            let mut items = store.write().await;
            if !items.contains_key(&comment.comment_id) {
                return Err(DomainError::not_found("comment"));
            }
            items.insert(comment.comment_id.clone(), comment.clone());
            Ok(comment)
        })
    }

    fn delete(&self, comment_id: &str) -> BoxFuture<'_, DomainResult<bool>> {
        let comment_id = comment_id.to_string();
        let store = self.store.clone();
        Box::pin(async move { Ok(store.write().await.remove(&comment_id).is_some()) })
    }

    fn list_by_video(
        &self,
        video_id: &str,
        offset: usize,
        limit: usize,
    ) -> BoxFuture<'_, DomainResult<Vec<Comment>>> {
        let video_id = video_id.to_string();
        let store = self.store.clone();
        Box::pin(async move {
            let mut comments = store
                .read()
                .await
                .values()
                .filter(|item| item.video_id == video_id)
                .cloned()
                .collect::<Vec<_>>();
            comments.sort_by(|a, b| {
                b.created_at_ms
                    .cmp(&a.created_at_ms)
                    .then_with(|| b.comment_id.cmp(&a.comment_id))
            });
            Ok(comments.into_iter().skip(offset).take(limit).collect())
        })
    }

    fn count_by_video(&self, video_id: &str) -> BoxFuture<'_, DomainResult<u64>> {
        let video_id = video_id.to_string();
        let store = self.store.clone();
        Box::pin(async move {
            let items = store.read().await;
            Ok(items.values().filter(|item| item.video_id == video_id).count() as u64)
        })
    }
}
