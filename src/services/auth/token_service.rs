//! # JWT 토큰 서비스
//!
//! - **액세스 토큰**: HS256 JWT. `sub`(계정 ID), `email`, `roles`, `iss`, `aud`, `jti` 클레임
//! - **리프레시 토큰**: JWT가 아닌 32바이트 난수 (base64url). 계정에는 SHA-256 해시만 저장됩니다.
//!
//! 토큰 갱신 시에는 만료된 액세스 토큰도 받아야 하므로
//! [`decode_allowing_expired`](TokenService::decode_allowing_expired)는 서명, 발급자, 대상은
//! 검증하되 만료 시간은 검사하지 않습니다.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use uuid::Uuid;
use crate::config::JwtSettings;
use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::accounts::Account;
use crate::domain::models::token::{TokenClaims, TokenPair};

const REFRESH_TOKEN_BYTES: usize = 32;
const BEARER_PREFIX: &str = "Bearer ";

/// 새로 발급된 토큰과 리프레시 토큰 만료 시각
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub pair: TokenPair,
    pub refresh_expires_at: DateTime<Utc>,
}

pub struct TokenService {
    settings: JwtSettings,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(settings: JwtSettings) -> Self {
        let encoding_key = EncodingKey::from_secret(settings.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(settings.secret.as_bytes());

        Self { settings, encoding_key, decoding_key }
    }

    pub fn generate_access_token(&self, account: &Account) -> AppResult<String> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.settings.access_token_minutes);

        let claims = TokenClaims {
            sub: account.id.clone(),
            email: account.email.clone(),
            roles: account.roles.clone(),
            iss: self.settings.issuer.clone(),
            aud: self.settings.audience.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
    }

    /// 불투명 리프레시 토큰을 생성합니다.
    pub fn generate_refresh_token(&self) -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    pub fn generate_token_pair(&self, account: &Account) -> AppResult<IssuedTokens> {
        let access_token = self.generate_access_token(account)?;
        let refresh_token = self.generate_refresh_token();

        Ok(IssuedTokens {
            pair: TokenPair {
                access_token,
                refresh_token,
                token_type: "Bearer".to_string(),
                expires_in: self.settings.access_token_seconds(),
            },
            refresh_expires_at: Utc::now() + Duration::days(self.settings.refresh_token_days),
        })
    }

    /// 서명, 만료, 발급자, 대상을 모두 검증합니다.
    pub fn verify_token(&self, token: &str) -> AppResult<TokenClaims> {
        self.decode_with(token, self.validation(true))
    }

    /// 만료 시간만 검사하지 않고 디코딩합니다 (토큰 갱신 전용).
    pub fn decode_allowing_expired(&self, token: &str) -> AppResult<TokenClaims> {
        self.decode_with(token, self.validation(false))
    }

    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> AppResult<&'a str> {
        auth_header
            .strip_prefix(BEARER_PREFIX)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::AuthenticationError("Invalid authorization header format".to_string()))
    }

    fn validation(&self, validate_exp: bool) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.settings.issuer.as_str()]);
        validation.set_audience(&[self.settings.audience.as_str()]);
        validation.validate_exp = validate_exp;
        validation
    }

    fn decode_with(&self, token: &str, validation: Validation) -> AppResult<TokenClaims> {
        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    AppError::AuthenticationError("Token has expired".to_string())
                }
                _ => AppError::AuthenticationError("Invalid token".to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> JwtSettings {
        JwtSettings {
            secret: "a-test-secret-that-is-long-enough-123".to_string(),
            issuer: "account-service".to_string(),
            audience: "account-service-clients".to_string(),
            access_token_minutes: 15,
            refresh_token_days: 7,
        }
    }

    fn account() -> Account {
        Account::new(
            "Ana Lima".to_string(),
            "ana".to_string(),
            "ana@example.com".to_string(),
            "0123456789".to_string(),
            "hash".to_string(),
        )
    }

    fn expired_token(service: &TokenService, account: &Account) -> String {
        let past = Utc::now() - Duration::hours(2);
        let claims = TokenClaims {
            sub: account.id.clone(),
            email: account.email.clone(),
            roles: account.roles.clone(),
            iss: service.settings.issuer.clone(),
            aud: service.settings.audience.clone(),
            iat: past.timestamp(),
            exp: (past + Duration::minutes(15)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &service.encoding_key).unwrap()
    }

    #[test]
    fn test_token_pair_round_trip() {
        let service = TokenService::new(settings());
        let account = account();

        let issued = service.generate_token_pair(&account).unwrap();
        let claims = service.verify_token(&issued.pair.access_token).unwrap();

        assert_eq!(claims.sub, account.id);
        assert_eq!(claims.roles, vec!["user".to_string()]);
        assert_eq!(issued.pair.token_type, "Bearer");
        assert_eq!(issued.pair.expires_in, 900);
        assert_eq!(issued.pair.access_token.split('.').count(), 3);
        assert_eq!(issued.pair.refresh_token.split('.').count(), 1);
    }

    #[test]
    fn test_refresh_tokens_are_unique() {
        let service = TokenService::new(settings());
        assert_ne!(service.generate_refresh_token(), service.generate_refresh_token());
    }

    #[test]
    fn test_expired_token_is_rejected_but_decodable_for_refresh() {
        let service = TokenService::new(settings());
        let account = account();
        let token = expired_token(&service, &account);

        match service.verify_token(&token) {
            Err(AppError::AuthenticationError(msg)) => assert_eq!(msg, "Token has expired"),
            other => panic!("expected expiry error, got {:?}", other),
        }
        assert_eq!(service.decode_allowing_expired(&token).unwrap().sub, account.id);
    }

    #[test]
    fn test_foreign_signature_is_rejected_even_when_expired_is_allowed() {
        let service = TokenService::new(settings());
        let other = TokenService::new(JwtSettings {
            secret: "another-secret-that-is-also-long-enough".to_string(),
            ..settings()
        });
        let token = other.generate_access_token(&account()).unwrap();

        assert!(service.verify_token(&token).is_err());
        assert!(service.decode_allowing_expired(&token).is_err());
    }

    #[test]
    fn test_wrong_audience_is_rejected() {
        let service = TokenService::new(settings());
        let other = TokenService::new(JwtSettings {
            audience: "someone-else".to_string(),
            ..settings()
        });
        let token = other.generate_access_token(&account()).unwrap();

        assert!(service.verify_token(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        let service = TokenService::new(settings());

        assert_eq!(service.extract_bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(service.extract_bearer_token("Basic abc").is_err());
        assert!(service.extract_bearer_token("Bearer ").is_err());
    }
}
