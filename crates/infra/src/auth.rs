use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tubegraph_domain::DomainResult;
use tubegraph_domain::error::DomainError;
use tubegraph_domain::ports::tokens::{TokenClaims, TokenCodec, TokenKind};

use crate::config::AppConfig;

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// HS256 tokens with one secret per token kind, so a refresh token never verifies as an
/// access token and the reverse.
pub struct JwtTokenCodec {
    access: KeyPair,
    refresh: KeyPair,
    validation: Validation,
}

impl JwtTokenCodec {
    pub fn new(access_secret: &str, refresh_secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        Self {
            access: KeyPair::from_secret(access_secret),
            refresh: KeyPair::from_secret(refresh_secret),
            validation,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.access_token_secret, &config.refresh_token_secret)
    }

    fn keys(&self, kind: TokenKind) -> &KeyPair {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }
}

impl TokenCodec for JwtTokenCodec {
    fn sign(&self, claims: &TokenClaims) -> DomainResult<String> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.keys(claims.typ).encoding,
        )
        .map_err(|err| DomainError::Unknown(format!("sign {} token: {err}", claims.typ.as_str())))
    }

    fn verify(&self, token: &str, kind: TokenKind) -> DomainResult<TokenClaims> {
        let data = decode::<TokenClaims>(token, &self.keys(kind).decoding, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => DomainError::Expired,
                _ => DomainError::Invalid,
            })?;
        if data.claims.typ != kind {
            return Err(DomainError::Invalid);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubegraph_domain::util::now_ms;

    fn claims(typ: TokenKind, exp_offset_secs: i64) -> TokenClaims {
        let now = now_ms() / 1_000;
        TokenClaims {
            sub: "0192f0c2a1b27c3d8e9f001122334455".into(),
            username: Some("ada".into()),
            typ,
            jti: "jti-1".into(),
            iat: now,
            exp: now + exp_offset_secs,
        }
    }

    #[test]
    fn signed_token_verifies_with_same_kind() {
        let codec = JwtTokenCodec::new("access", "refresh");
        let token = codec.sign(&claims(TokenKind::Access, 60)).expect("sign");
        let decoded = codec.verify(&token, TokenKind::Access).expect("verify");
        assert_eq!(decoded.username.as_deref(), Some("ada"));
        assert_eq!(decoded.typ, TokenKind::Access);
    }

    #[test]
    fn token_of_other_kind_is_invalid() {
        let codec = JwtTokenCodec::new("access", "refresh");
        let refresh = codec.sign(&claims(TokenKind::Refresh, 60)).expect("sign");
        assert!(matches!(
            codec.verify(&refresh, TokenKind::Access),
            Err(DomainError::Invalid)
        ));

        let same_secret = JwtTokenCodec::new("shared", "shared");
        let refresh = same_secret.sign(&claims(TokenKind::Refresh, 60)).expect("sign");
        assert!(matches!(
            same_secret.verify(&refresh, TokenKind::Access),
            Err(DomainError::Invalid)
        ));
    }

    #[test]
    fn expired_and_garbage_tokens_are_rejected() {
        let codec = JwtTokenCodec::new("access", "refresh");
        let expired = codec.sign(&claims(TokenKind::Access, -10)).expect("sign");
        assert!(matches!(
            codec.verify(&expired, TokenKind::Access),
            Err(DomainError::Expired)
        ));
        assert!(matches!(
            codec.verify("not.a.token", TokenKind::Access),
            Err(DomainError::Invalid)
        ));
    }
}
