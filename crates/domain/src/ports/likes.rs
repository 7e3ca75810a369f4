use std::collections::HashMap;

use crate::DomainResult;
use crate::likes::{Like, LikeTarget};
use crate::ports::{BoxFuture, InsertOutcome};

/// Like documents. Implementations enforce one partial-uniqueness constraint per target kind:
/// at most one like per (liker, video), (liker, comment) and (liker, tweet).
#[allow(clippy::needless_pass_by_value)]
pub trait LikeRepository: Send + Sync {
    fn find(
        &self,
        liker_id: &str,
        target: &LikeTarget,
    ) -> BoxFuture<'_, DomainResult<Option<Like>>>;

    /// Returns `InsertOutcome::Duplicate` when the pair constraint fires. A clash on the like id
    /// itself is an `Unknown` error, never a duplicate.
    fn insert(&self, like: &Like) -> BoxFuture<'_, DomainResult<InsertOutcome<Like>>>;

    /// `false` when the like was already gone.
    fn delete(&self, like_id: &str) -> BoxFuture<'_, DomainResult<bool>>;

    /// Newest first, ties broken by like id.
    fn list_video_likes_by_liker(&self, liker_id: &str) -> BoxFuture<'_, DomainResult<Vec<Like>>>;

    fn count_for_target(&self, target: &LikeTarget) -> BoxFuture<'_, DomainResult<u64>>;

    /// Like totals keyed by video id; videos without likes are absent from the map.
    fn count_by_videos(
        &self,
        video_ids: &[String],
    ) -> BoxFuture<'_, DomainResult<HashMap<String, u64>>>;
}
