use std::sync::Arc;

use tubegraph_domain::comments::CommentService;
use tubegraph_domain::playlists::PlaylistService;
use tubegraph_domain::ports::Repositories;
use tubegraph_domain::ports::db::DbAdapter;
use tubegraph_domain::sessions::{SessionConfig, SessionService};
use tubegraph_domain::toggle::ToggleEngine;
use tubegraph_domain::tweets::TweetService;
use tubegraph_domain::users::UserService;
use tubegraph_domain::videos::VideoService;
use tubegraph_domain::views::ViewComposer;
use tubegraph_infra::auth::JwtTokenCodec;
use tubegraph_infra::config::AppConfig;
use tubegraph_infra::db::build_store;
use tubegraph_infra::password::BcryptPasswordHasher;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn DbAdapter>,
    pub users: UserService,
    pub sessions: SessionService,
    pub toggles: ToggleEngine,
    pub videos: VideoService,
    pub comments: CommentService,
    pub tweets: TweetService,
    pub playlists: PlaylistService,
    pub views: ViewComposer,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let (repos, adapter) = build_store(&config)?;
        Ok(Self::with_repositories(config, repos, Arc::new(adapter)))
    }

    pub fn with_repositories(
        config: AppConfig,
        repos: Repositories,
        store: Arc<dyn DbAdapter>,
    ) -> Self {
        let hasher = Arc::new(BcryptPasswordHasher::new(config.bcrypt_cost));
        let codec = Arc::new(JwtTokenCodec::from_config(&config));
        let session_config = SessionConfig {
            access_ttl_secs: config.access_token_ttl_secs,
            refresh_ttl_secs: config.refresh_token_ttl_secs,
        };

        Self {
            users: UserService::new(repos.users.clone(), hasher.clone()),
            sessions: SessionService::new(repos.users.clone(), codec, hasher, session_config),
            toggles: ToggleEngine::new(repos.clone()),
            videos: VideoService::new(repos.clone()),
            comments: CommentService::new(repos.clone()),
            tweets: TweetService::new(repos.tweets.clone(), repos.users.clone()),
            playlists: PlaylistService::new(repos.clone()),
            views: ViewComposer::new(repos),
            store,
            config,
        }
    }
}
