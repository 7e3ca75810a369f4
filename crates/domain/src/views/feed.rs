use crate::DomainResult;
use crate::ports::videos::VideoListQuery;
use crate::util::parse_id;
use crate::videos::{SortDirection, VideoFilter, VideoSortField};

use super::{Page, PageRequest, VideoCard, ViewComposer};

#[derive(Clone, Debug, Default)]
pub struct FeedQuery {
    pub page: PageRequest,
    pub text: Option<String>,
    pub owner_id: Option<String>,
    pub sort_by: Option<VideoSortField>,
    pub direction: Option<SortDirection>,
}

impl ViewComposer {
    /// Published videos, newest first unless the caller picks another order.
    pub async fn feed(&self, query: FeedQuery) -> DomainResult<Page<VideoCard>> {
        let pagination = query.page.validate()?;
        let owner_id = query
            .owner_id
            .as_deref()
            .map(|raw| parse_id("owner_id", raw))
            .transpose()?;
        let text = query
            .text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        let filter = VideoFilter {
            owner_id,
            published: Some(true),
            text,
            created_since_ms: None,
        };
        let total = self.repos.videos.count(&filter).await?;
        let videos = self
            .repos
            .videos
            .list(&VideoListQuery {
                filter,
                sort_by: query.sort_by.unwrap_or_default(),
                direction: query.direction.unwrap_or_default(),
                offset: pagination.offset(),
                limit: Some(pagination.limit),
            })
            .await?;

        let items = self.cards(videos).await?;
        Ok(Page::new(items, total, &pagination))
    }
}
