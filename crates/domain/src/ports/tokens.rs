use serde::{Deserialize, Serialize};

use crate::DomainResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// Claims carried by both token kinds. `iat`/`exp` are epoch seconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub typ: TokenKind,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies self-contained credentials.
pub trait TokenCodec: Send + Sync {
    /// Signing failures surface as `Unknown`.
    fn sign(&self, claims: &TokenClaims) -> DomainResult<String>;

    /// `Expired` for a valid signature past `exp`; `Invalid` for anything else wrong,
    /// including a token of the other kind.
    fn verify(&self, token: &str, kind: TokenKind) -> DomainResult<TokenClaims>;
}
