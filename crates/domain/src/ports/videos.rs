use crate::DomainResult;
use crate::ports::BoxFuture;
use crate::videos::{SortDirection, Video, VideoFilter, VideoSortField};

#[derive(Clone, Debug, Default)]
pub struct VideoListQuery {
    pub filter: VideoFilter,
    pub sort_by: VideoSortField,
    pub direction: SortDirection,
    pub offset: usize,
    pub limit: Option<usize>,
}

#[allow(clippy::needless_pass_by_value)]
pub trait VideoRepository: Send + Sync {
    fn create(&self, video: &Video) -> BoxFuture<'_, DomainResult<Video>>;

    fn get(&self, video_id: &str) -> BoxFuture<'_, DomainResult<Option<Video>>>;

    fn get_many(&self, video_ids: &[String]) -> BoxFuture<'_, DomainResult<Vec<Video>>>;

    /// Fails with `NotFound` if the video no longer exists.
    fn update(&self, video: &Video) -> BoxFuture<'_, DomainResult<Video>>;

    fn delete(&self, video_id: &str) -> BoxFuture<'_, DomainResult<bool>>;

    /// Atomic `views += 1`; `None` when the video does not exist.
    fn increment_views(&self, video_id: &str) -> BoxFuture<'_, DomainResult<Option<Video>>>;

    fn list(&self, query: &VideoListQuery) -> BoxFuture<'_, DomainResult<Vec<Video>>>;

    fn count(&self, filter: &VideoFilter) -> BoxFuture<'_, DomainResult<u64>>;
}
