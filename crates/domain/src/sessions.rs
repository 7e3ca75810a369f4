//! Access/refresh token lifecycle.
//!
//! Each user holds at most one live refresh token. Rotation swaps it with a compare-and-swap on
//! the user document, so of two concurrent rotations presenting the same token exactly one wins.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::DomainResult;
use crate::error::DomainError;
use crate::identity::ActorIdentity;
use crate::ports::credentials::PasswordHasher;
use crate::ports::tokens::{TokenClaims, TokenCodec, TokenKind};
use crate::ports::users::UserRepository;
use crate::users::{User, UserProfile, normalize_email, normalize_username};
use crate::util::{now_ms, uuid_v7_without_dashes};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            access_ttl_secs: 24 * 60 * 60,
            refresh_ttl_secs: 10 * 24 * 60 * 60,
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: i64,
    pub refresh_expires_at: i64,
}

#[derive(Clone, Debug)]
pub struct LoginInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct LoginOutcome {
    pub user: UserProfile,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

#[derive(Clone)]
pub struct SessionService {
    users: Arc<dyn UserRepository>,
    codec: Arc<dyn TokenCodec>,
    hasher: Arc<dyn PasswordHasher>,
    config: SessionConfig,
}

impl SessionService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        codec: Arc<dyn TokenCodec>,
        hasher: Arc<dyn PasswordHasher>,
        config: SessionConfig,
    ) -> Self {
        Self {
            users,
            codec,
            hasher,
            config,
        }
    }

    /// Username wins when both identifiers are supplied.
    pub async fn login(&self, input: LoginInput) -> DomainResult<LoginOutcome> {
        let username = input
            .username
            .as_deref()
            .map(normalize_username)
            .filter(|value| !value.is_empty());
        let email = input
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|value| !value.is_empty());
        if input.password.is_empty() {
            return Err(DomainError::InvalidArgument("password is required".into()));
        }

        let user = match (username, email) {
            (Some(username), _) => self.users.find_by_username(&username).await?,
            (None, Some(email)) => self.users.find_by_email(&email).await?,
            (None, None) => {
                return Err(DomainError::InvalidArgument(
                    "username or email is required".into(),
                ));
            }
        }
        .ok_or_else(|| DomainError::not_found("user"))?;

        if !self.hasher.verify(&input.password, &user.password_hash)? {
            warn!(user_id = %user.user_id, "login rejected: wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        let tokens = self.issue_for(&user).await?;
        info!(user_id = %user.user_id, "user logged in");
        Ok(LoginOutcome {
            user: user.profile(),
            tokens,
        })
    }

    /// Issues a fresh pair and makes its refresh token the only valid one for the user.
    pub async fn issue(&self, user_id: &str) -> DomainResult<TokenPair> {
        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user"))?;
        self.issue_for(&user).await
    }

    pub fn verify_access(&self, token: &str) -> DomainResult<ActorIdentity> {
        let claims = self.codec.verify(token, TokenKind::Access).map_err(|err| {
            warn!(error = %err, "access token rejected");
            err
        })?;
        Ok(ActorIdentity::new(
            claims.sub,
            claims.username.unwrap_or_default(),
        ))
    }

    pub async fn rotate(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        let claims = self
            .codec
            .verify(refresh_token, TokenKind::Refresh)
            .map_err(|err| {
                warn!(error = %err, "refresh token rejected");
                DomainError::Invalid
            })?;
        let user = self
            .users
            .get(&claims.sub)
            .await?
            .ok_or(DomainError::Invalid)?;

        match user.refresh_token.as_deref() {
            None => {
                warn!(user_id = %user.user_id, "refresh attempted on a revoked session");
                return Err(DomainError::Invalid);
            }
            Some(stored) if stored != refresh_token => {
                warn!(user_id = %user.user_id, "stale refresh token presented");
                return Err(DomainError::Reused);
            }
            Some(_) => {}
        }

        let pair = self.sign_pair(&user)?;
        let swapped = self
            .users
            .replace_refresh_token(&user.user_id, refresh_token, &pair.refresh_token)
            .await?;
        if !swapped {
            let current = self.users.get(&user.user_id).await?;
            let revoked = current.map_or(true, |user| user.refresh_token.is_none());
            warn!(user_id = %user.user_id, revoked, "refresh rotation lost a race");
            return Err(if revoked {
                DomainError::Invalid
            } else {
                DomainError::Reused
            });
        }

        info!(user_id = %user.user_id, "session rotated");
        Ok(pair)
    }

    pub async fn revoke(&self, user_id: &str) -> DomainResult<()> {
        self.users.set_refresh_token(user_id, None).await?;
        info!(user_id = %user_id, "session revoked");
        Ok(())
    }

    async fn issue_for(&self, user: &User) -> DomainResult<TokenPair> {
        let pair = self.sign_pair(user)?;
        self.users
            .set_refresh_token(&user.user_id, Some(&pair.refresh_token))
            .await?;
        Ok(pair)
    }

    fn sign_pair(&self, user: &User) -> DomainResult<TokenPair> {
        let issued_at = now_ms() / 1_000;
        let access = TokenClaims {
            sub: user.user_id.clone(),
            username: Some(user.username.clone()),
            typ: TokenKind::Access,
            jti: uuid_v7_without_dashes(),
            iat: issued_at,
            exp: issued_at + self.config.access_ttl_secs,
        };
        let refresh = TokenClaims {
            sub: user.user_id.clone(),
            username: None,
            typ: TokenKind::Refresh,
            jti: uuid_v7_without_dashes(),
            iat: issued_at,
            exp: issued_at + self.config.refresh_ttl_secs,
        };
        Ok(TokenPair {
            access_token: self.codec.sign(&access)?,
            refresh_token: self.codec.sign(&refresh)?,
            access_expires_at: access.exp,
            refresh_expires_at: refresh.exp,
        })
    }
}
