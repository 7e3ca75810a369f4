use crate::DomainResult;
use crate::ports::BoxFuture;
use crate::users::{User, UserProfileUpdate};

#[allow(clippy::needless_pass_by_value)]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the username or email is already taken.
    fn create(&self, user: &User) -> BoxFuture<'_, DomainResult<User>>;

    fn get(&self, user_id: &str) -> BoxFuture<'_, DomainResult<Option<User>>>;

    fn get_many(&self, user_ids: &[String]) -> BoxFuture<'_, DomainResult<Vec<User>>>;

    fn find_by_username(&self, username: &str) -> BoxFuture<'_, DomainResult<Option<User>>>;

    fn find_by_email(&self, email: &str) -> BoxFuture<'_, DomainResult<Option<User>>>;

    fn update_profile(
        &self,
        user_id: &str,
        update: &UserProfileUpdate,
    ) -> BoxFuture<'_, DomainResult<User>>;

    fn set_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> BoxFuture<'_, DomainResult<()>>;

    /// Unconditionally overwrites (or clears) the stored refresh token.
    fn set_refresh_token(
        &self,
        user_id: &str,
        refresh_token: Option<&str>,
    ) -> BoxFuture<'_, DomainResult<()>>;

    /// Atomically replaces the stored refresh token only if it still equals `expected`.
    /// Returns `false` when the stored value differs or is absent.
    fn replace_refresh_token(
        &self,
        user_id: &str,
        expected: &str,
        replacement: &str,
    ) -> BoxFuture<'_, DomainResult<bool>>;

    /// Appends to the watch history unless the video is already present.
    fn push_watch_history(&self, user_id: &str, video_id: &str)
    -> BoxFuture<'_, DomainResult<()>>;
}
