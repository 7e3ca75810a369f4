use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::DomainResult;
use crate::error::DomainError;
use crate::identity::ActorIdentity;
use crate::ports::credentials::PasswordHasher;
use crate::ports::users::UserRepository;
use crate::util::{now_ms, uuid_v7_without_dashes};

const MAX_USERNAME_LENGTH: usize = 64;
const MAX_FULL_NAME_LENGTH: usize = 120;
const MIN_PASSWORD_LENGTH: usize = 8;

/// Stored account document. Never serialized directly: use [`User::profile`].
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
    pub password_hash: String,
    pub refresh_token: Option<String>,
    pub watch_history: Vec<String>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// Public projection of a user; omits the password hash and refresh token.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// The `{full_name, username, avatar}` projection joined into every denormalized view.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OwnerSummary {
    pub user_id: String,
    pub full_name: String,
    pub username: String,
    pub avatar_url: String,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            user_id: self.user_id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            avatar_url: self.avatar_url.clone(),
            cover_image_url: self.cover_image_url.clone(),
            created_at_ms: self.created_at_ms,
            updated_at_ms: self.updated_at_ms,
        }
    }

    pub fn summary(&self) -> OwnerSummary {
        OwnerSummary {
            user_id: self.user_id.clone(),
            full_name: self.full_name.clone(),
            username: self.username.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RegisterInput {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AccountUpdate {
    pub full_name: String,
    pub email: String,
}

/// Partial profile write applied by the store; `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserProfileUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub cover_image_url: Option<String>,
}

pub fn normalize_username(value: &str) -> String {
    value.trim().to_lowercase()
}

pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repository, hasher }
    }

    pub async fn register(&self, input: RegisterInput) -> DomainResult<UserProfile> {
        let input = validate_register_input(&input)?;

        if self
            .repository
            .find_by_username(&input.username)
            .await?
            .is_some()
            || self.repository.find_by_email(&input.email).await?.is_some()
        {
            return Err(DomainError::Conflict(
                "user with email or username already exists".into(),
            ));
        }

        let password_hash = self.hasher.hash(&input.password)?;
        let now = now_ms();
        let user = User {
            user_id: uuid_v7_without_dashes(),
            username: input.username,
            email: input.email,
            full_name: input.full_name,
            avatar_url: input.avatar_url,
            cover_image_url: input.cover_image_url,
            password_hash,
            refresh_token: None,
            watch_history: Vec::new(),
            created_at_ms: now,
            updated_at_ms: now,
        };
        let created = self.repository.create(&user).await?;
        info!(user_id = %created.user_id, username = %created.username, "user registered");
        Ok(created.profile())
    }

    pub async fn current(&self, actor: &ActorIdentity) -> DomainResult<UserProfile> {
        Ok(self.load(&actor.user_id).await?.profile())
    }

    pub async fn change_password(
        &self,
        actor: &ActorIdentity,
        old_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        validate_password(new_password)?;
        let user = self.load(&actor.user_id).await?;
        if !self.hasher.verify(old_password, &user.password_hash)? {
            return Err(DomainError::InvalidCredentials);
        }
        let password_hash = self.hasher.hash(new_password)?;
        self.repository
            .set_password_hash(&user.user_id, &password_hash)
            .await?;
        info!(user_id = %user.user_id, "password changed");
        Ok(())
    }

    pub async fn update_account(
        &self,
        actor: &ActorIdentity,
        input: AccountUpdate,
    ) -> DomainResult<UserProfile> {
        let full_name = validate_full_name(&input.full_name)?;
        let email = validate_email(&input.email)?;

        if let Some(existing) = self.repository.find_by_email(&email).await? {
            if existing.user_id != actor.user_id {
                return Err(DomainError::Conflict("email already in use".into()));
            }
        }

        let update = UserProfileUpdate {
            full_name: Some(full_name),
            email: Some(email),
            ..UserProfileUpdate::default()
        };
        let user = self
            .repository
            .update_profile(&actor.user_id, &update)
            .await?;
        Ok(user.profile())
    }

    pub async fn update_avatar(
        &self,
        actor: &ActorIdentity,
        avatar_url: &str,
    ) -> DomainResult<UserProfile> {
        let update = UserProfileUpdate {
            avatar_url: Some(validate_url("avatar_url", avatar_url)?),
            ..UserProfileUpdate::default()
        };
        let user = self
            .repository
            .update_profile(&actor.user_id, &update)
            .await?;
        Ok(user.profile())
    }

    pub async fn update_cover_image(
        &self,
        actor: &ActorIdentity,
        cover_image_url: &str,
    ) -> DomainResult<UserProfile> {
        let update = UserProfileUpdate {
            cover_image_url: Some(validate_url("cover_image_url", cover_image_url)?),
            ..UserProfileUpdate::default()
        };
        let user = self
            .repository
            .update_profile(&actor.user_id, &update)
            .await?;
        Ok(user.profile())
    }

    async fn load(&self, user_id: &str) -> DomainResult<User> {
        self.repository
            .get(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user"))
    }
}

fn validate_register_input(input: &RegisterInput) -> DomainResult<RegisterInput> {
    let username = normalize_username(&input.username);
    if username.is_empty() {
        return Err(DomainError::InvalidArgument("username is required".into()));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(DomainError::InvalidArgument(format!(
            "username exceeds max length of {MAX_USERNAME_LENGTH}"
        )));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidArgument(
            "username cannot contain whitespace".into(),
        ));
    }
    validate_password(&input.password)?;

    let cover_image_url = match input.cover_image_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => Some(validate_url("cover_image_url", url)?),
        _ => None,
    };

    Ok(RegisterInput {
        full_name: validate_full_name(&input.full_name)?,
        email: validate_email(&input.email)?,
        username,
        password: input.password.clone(),
        avatar_url: validate_url("avatar_url", &input.avatar_url)?,
        cover_image_url,
    })
}

fn validate_full_name(value: &str) -> DomainResult<String> {
    let full_name = value.trim();
    if full_name.is_empty() {
        return Err(DomainError::InvalidArgument("full_name is required".into()));
    }
    if full_name.chars().count() > MAX_FULL_NAME_LENGTH {
        return Err(DomainError::InvalidArgument(format!(
            "full_name exceeds max length of {MAX_FULL_NAME_LENGTH}"
        )));
    }
    Ok(full_name.to_string())
}

fn validate_email(value: &str) -> DomainResult<String> {
    let email = normalize_email(value);
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    };
    if !valid {
        return Err(DomainError::InvalidArgument("invalid email".into()));
    }
    Ok(email)
}

fn validate_password(value: &str) -> DomainResult<()> {
    if value.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(DomainError::InvalidArgument(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

pub(crate) fn validate_url(field: &str, value: &str) -> DomainResult<String> {
    let url = value.trim();
    if url.is_empty() {
        return Err(DomainError::InvalidArgument(format!("{field} is required")));
    }
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(DomainError::InvalidArgument(format!(
            "{field} must be an http(s) url"
        )));
    }
    Ok(url.to_string())
}
