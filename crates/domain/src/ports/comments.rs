use crate::DomainResult;
use crate::comments::Comment;
use crate::ports::BoxFuture;

#[allow(clippy::needless_pass_by_value)]
pub trait CommentRepository: Send + Sync {
    fn create(&self, comment: &Comment) -> BoxFuture<'_, DomainResult<Comment>>;

    fn get(&self, comment_id: &str) -> BoxFuture<'_, DomainResult<Option<Comment>>>;

    fn update(&self, comment: &Comment) -> BoxFuture<'_, DomainResult<Comment>>;

    fn delete(&self, comment_id: &str) -> BoxFuture<'_, DomainResult<bool>>;

    /// Newest first.
    fn list_by_video(
        &self,
        video_id: &str,
        offset: usize,
        limit: usize,
    ) -> BoxFuture<'_, DomainResult<Vec<Comment>>>;

    fn count_by_video(&self, video_id: &str) -> BoxFuture<'_, DomainResult<u64>>;
}
