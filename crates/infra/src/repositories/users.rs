use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tubegraph_domain::DomainResult;
use tubegraph_domain::error::DomainError;
use tubegraph_domain::ports::BoxFuture;
use tubegraph_domain::ports::users::UserRepository;
use tubegraph_domain::users::{User, UserProfileUpdate};
use tubegraph_domain::util::now_ms;

#[derive(Default)]
struct InMemoryUserState {
    users: HashMap<String, User>,
    by_username: HashMap<String, String>,
    by_email: HashMap<String, String>,
}

impl InMemoryUserState {
    fn get_mut(&mut self, user_id: &str) -> DomainResult<&mut User> {
        self.users
            .get_mut(user_id)
            .ok_or_else(|| DomainError::not_found("user"))
    }
}

/// Users keyed by id with unique username and email indexes.
#[derive(Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<InMemoryUserState>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn create(&self, user: &User) -> BoxFuture<'_, DomainResult<User>> {
        let user = user.clone();
        let state = self.state.clone();
        Box::pin(async move {
            let mut state = state.write().await;
            if state.users.contains_key(&user.user_id) {
                return Err(DomainError::Conflict("user id already exists".into()));
            }
            if state.by_username.contains_key(&user.username)
                || state.by_email.contains_key(&user.email)
            {
                return Err(DomainError::Conflict(
                    "user with email or username already exists".into(),
                ));
            }
            state
                .by_username
                .insert(user.username.clone(), user.user_id.clone());
            state
                .by_email
                .insert(user.email.clone(), user.user_id.clone());
            state.users.insert(user.user_id.clone(), user.clone());
            Ok(user)
        })
    }

    fn get(&self, user_id: &str) -> BoxFuture<'_, DomainResult<Option<User>>> {
        let user_id = user_id.to_string();
        let state = self.state.clone();
        Box::pin(async move { Ok(state.read().await.users.get(&user_id).cloned()) })
    }

    fn get_many(&self, user_ids: &[String]) -> BoxFuture<'_, DomainResult<Vec<User>>> {
        let user_ids = user_ids.to_vec();
        let state = self.state.clone();
        Box::pin(async move {
            let state = state.read().await;
            let mut seen = std::collections::HashSet::new();
            Ok(user_ids
                .iter()
                .filter(|id| seen.insert(id.as_str()))
                .filter_map(|id| state.users.get(id).cloned())
                .collect())
        })
    }

    fn find_by_username(&self, username: &str) -> BoxFuture<'_, DomainResult<Option<User>>> {
        let username = username.to_string();
        let state = self.state.clone();
        Box::pin(async move {
            let state = state.read().await;
            Ok(state
                .by_username
                .get(&username)
                .and_then(|id| state.users.get(id))
                .cloned())
        })
    }

    fn find_by_email(&self, email: &str) -> BoxFuture<'_, DomainResult<Option<User>>> {
        let email = email.to_string();
        let state = self.state.clone();
        Box::pin(async move {
            let state = state.read().await;
            Ok(state
                .by_email
                .get(&email)
                .and_then(|id| state.users.get(id))
                .cloned())
        })
    }

    fn update_profile(
        &self,
        user_id: &str,
        update: &UserProfileUpdate,
    ) -> BoxFuture<'_, DomainResult<User>> {
        let user_id = user_id.to_string();
        let update = update.clone();
        let state = self.state.clone();
        Box::pin(async move {
            let mut state = state.write().await;
            if let Some(email) = update.email.as_ref() {
                if let Some(owner) = state.by_email.get(email) {
                    if owner != &user_id {
                        return Err(DomainError::Conflict("email already in use".into()));
                    }
                }
            }

            let user = state.get_mut(&user_id)?;
            let previous_email = user.email.clone();
            if let Some(full_name) = update.full_name {
                user.full_name = full_name;
            }
            if let Some(email) = update.email {
                user.email = email;
            }
            if let Some(avatar_url) = update.avatar_url {
                user.avatar_url = avatar_url;
            }
            if let Some(cover_image_url) = update.cover_image_url {
                user.cover_image_url = Some(cover_image_url);
            }
            user.updated_at_ms = now_ms();
            let user = user.clone();

            if previous_email != user.email {
                state.by_email.remove(&previous_email);
                state
                    .by_email
                    .insert(user.email.clone(), user.user_id.clone());
            }
            Ok(user)
        })
    }

    fn set_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> BoxFuture<'_, DomainResult<()>> {
        let user_id = user_id.to_string();
        let password_hash = password_hash.to_string();
        let state = self.state.clone();
        Box::pin(async move {
            let mut state = state.write().await;
            let user = state.get_mut(&user_id)?;
            user.password_hash = password_hash;
            user.updated_at_ms = now_ms();
            Ok(())
        })
    }

    fn set_refresh_token(
        &self,
        user_id: &str,
        refresh_token: Option<&str>,
    ) -> BoxFuture<'_, DomainResult<()>> {
        let user_id = user_id.to_string();
        let refresh_token = refresh_token.map(str::to_string);
        let state = self.state.clone();
        Box::pin(async move {
            let mut state = state.write().await;
            state.get_mut(&user_id)?.refresh_token = refresh_token;
            Ok(())
        })
    }

    fn replace_refresh_token(
        &self,
        user_id: &str,
        expected: &str,
        replacement: &str,
    ) -> BoxFuture<'_, DomainResult<bool>> {
        let user_id = user_id.to_string();
        let expected = expected.to_string();
        let replacement = replacement.to_string();
        let state = self.state.clone();
        Box::pin(async move {
            let mut state = state.write().await;
            let Some(user) = state.users.get_mut(&user_id) else {
                return Ok(false);
            };
            if user.refresh_token.as_deref() != Some(expected.as_str()) {
                return Ok(false);
            }
            user.refresh_token = Some(replacement);
            Ok(true)
        })
    }

    fn push_watch_history(&self, user_id: &str, video_id: &str) -> BoxFuture<'_, DomainResult<()>> {
        let user_id = user_id.to_string();
        let video_id = video_id.to_string();
        let state = self.state.clone();
        Box::pin(async move {
            let mut state = state.write().await;
            let user = state.get_mut(&user_id)?;
            if !user.watch_history.contains(&video_id) {
                user.watch_history.push(video_id);
            }
            Ok(())
        })
    }
}
