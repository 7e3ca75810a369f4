#![allow(dead_code)]

use std::sync::Arc;

use tubegraph_domain::identity::ActorIdentity;
use tubegraph_domain::ports::Repositories;
use tubegraph_domain::sessions::{SessionConfig, SessionService};
use tubegraph_domain::toggle::ToggleEngine;
use tubegraph_domain::users::{RegisterInput, UserService};
use tubegraph_domain::util::uuid_v7_without_dashes;
use tubegraph_domain::videos::{Video, VideoPublish, VideoService};
use tubegraph_domain::views::ViewComposer;
use tubegraph_infra::auth::JwtTokenCodec;
use tubegraph_infra::password::BcryptPasswordHasher;
use tubegraph_infra::repositories::memory_repositories;

pub const PASSWORD: &str = "correct horse battery";

pub struct Harness {
    pub repos: Repositories,
    pub users: UserService,
    pub sessions: SessionService,
    pub toggles: ToggleEngine,
    pub videos: VideoService,
    pub views: ViewComposer,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_repos(memory_repositories())
    }

    pub fn with_repos(repos: Repositories) -> Self {
        let hasher = Arc::new(BcryptPasswordHasher::new(4));
        let codec = Arc::new(JwtTokenCodec::new("access-secret", "refresh-secret"));
        Self {
            users: UserService::new(repos.users.clone(), hasher.clone()),
            sessions: SessionService::new(
                repos.users.clone(),
                codec,
                hasher,
                SessionConfig {
                    access_ttl_secs: 300,
                    refresh_ttl_secs: 3_600,
                },
            ),
            toggles: ToggleEngine::new(repos.clone()),
            videos: VideoService::new(repos.clone()),
            views: ViewComposer::new(repos.clone()),
            repos,
        }
    }

    pub async fn register(&self, username: &str) -> ActorIdentity {
        let profile = self
            .users
            .register(RegisterInput {
                full_name: format!("{username} full"),
                email: format!("{username}@example.com"),
                username: username.to_string(),
                password: PASSWORD.to_string(),
                avatar_url: format!("https://cdn.example.com/{username}.png"),
                cover_image_url: None,
            })
            .await
            .expect("register user");
        ActorIdentity::new(profile.user_id, profile.username)
    }

    pub async fn publish(&self, actor: &ActorIdentity, title: &str) -> Video {
        self.videos
            .publish(
                actor,
                VideoPublish {
                    title: title.to_string(),
                    description: format!("about {title}"),
                    media_url: "https://cdn.example.com/video.mp4".to_string(),
                    thumbnail_url: "https://cdn.example.com/thumb.png".to_string(),
                    duration_secs: 42.0,
                },
            )
            .await
            .expect("publish video")
    }

    /// Stores a video directly, bypassing the service, with fixed timestamps and views.
    pub async fn seed_video(
        &self,
        owner: &ActorIdentity,
        title: &str,
        views: u64,
        created_at_ms: i64,
    ) -> Video {
        let video = Video {
            video_id: uuid_v7_without_dashes(),
            owner_id: owner.user_id.clone(),
            title: title.to_string(),
            description: String::new(),
            media_url: "https://cdn.example.com/video.mp4".to_string(),
            thumbnail_url: "https://cdn.example.com/thumb.png".to_string(),
            duration_secs: 10.0,
            views,
            is_published: true,
            created_at_ms,
            updated_at_ms: created_at_ms,
        };
        self.repos.videos.create(&video).await.expect("seed video")
    }
}
