use crate::DomainResult;

/// One-way password hashing, provided outside the core.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> DomainResult<String>;

    fn verify(&self, password: &str, password_hash: &str) -> DomainResult<bool>;
}
