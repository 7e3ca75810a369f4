use serde::{Deserialize, Serialize};

use crate::DomainResult;
use crate::error::DomainError;
use crate::util::parse_id;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Video,
    Comment,
    Tweet,
}

impl TargetKind {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        match raw.trim().to_lowercase().as_str() {
            "video" | "videos" => Ok(Self::Video),
            "comment" | "comments" => Ok(Self::Comment),
            "tweet" | "tweets" => Ok(Self::Tweet),
            other => Err(DomainError::InvalidArgument(format!(
                "unsupported like target: {other}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Comment => "comment",
            Self::Tweet => "tweet",
        }
    }
}

/// The single thing a like points at.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum LikeTarget {
    Video(String),
    Comment(String),
    Tweet(String),
}

impl LikeTarget {
    /// Builds a target from caller input, rejecting malformed ids.
    pub fn parse(kind: TargetKind, raw_id: &str) -> DomainResult<Self> {
        let id = parse_id(&format!("{}_id", kind.as_str()), raw_id)?;
        Ok(match kind {
            TargetKind::Video => Self::Video(id),
            TargetKind::Comment => Self::Comment(id),
            TargetKind::Tweet => Self::Tweet(id),
        })
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Video(_) => TargetKind::Video,
            Self::Comment(_) => TargetKind::Comment,
            Self::Tweet(_) => TargetKind::Tweet,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Video(id) | Self::Comment(id) | Self::Tweet(id) => id,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Like {
    pub like_id: String,
    pub liker_id: String,
    pub target: LikeTarget,
    pub created_at_ms: i64,
}
