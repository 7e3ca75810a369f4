use tubegraph_domain::DomainResult;
use tubegraph_domain::error::DomainError;
use tubegraph_domain::ports::credentials::PasswordHasher;

pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &str) -> DomainResult<String> {
        bcrypt::hash(password, self.cost)
            .map_err(|err| DomainError::Unknown(format!("hash password: {err}")))
    }

    fn verify(&self, password: &str, password_hash: &str) -> DomainResult<bool> {
        bcrypt::verify(password, password_hash)
            .map_err(|err| DomainError::Unknown(format!("verify password: {err}")))
    }
}
