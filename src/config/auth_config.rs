//! JWT 관련 설정

use super::Lookup;
use super::data_config::Environment;

/// JWT 발급/검증 설정
///
/// `JWT_SECRET`은 필수입니다. 기본값으로 대체하지 않습니다.
#[derive(Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
}

impl JwtSettings {
    /// 운영 환경에서 요구하는 최소 시크릿 길이 (바이트)
    pub const MIN_PRODUCTION_SECRET_LEN: usize = 32;

    pub(super) fn load<F>(lookup: &mut Lookup<F>, env: Environment) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup.required("JWT_SECRET");
        if env.is_production() && !secret.is_empty() && secret.len() < Self::MIN_PRODUCTION_SECRET_LEN {
            lookup.problem(format!(
                "JWT_SECRET must be at least {} bytes in production",
                Self::MIN_PRODUCTION_SECRET_LEN
            ));
        }

        let access_token_minutes = lookup.parse("JWT_ACCESS_TOKEN_MINUTES", 15i64);
        let refresh_token_days = lookup.parse("JWT_REFRESH_TOKEN_DAYS", 7i64);
        if access_token_minutes <= 0 || refresh_token_days <= 0 {
            lookup.problem("JWT token lifetimes must be positive");
        }

        Self {
            secret,
            issuer: lookup.string("JWT_ISSUER", "account-service"),
            audience: lookup.string("JWT_AUDIENCE", "account-service-clients"),
            access_token_minutes,
            refresh_token_days,
        }
    }

    /// 액세스 토큰 수명 (초)
    pub fn access_token_seconds(&self) -> i64 {
        self.access_token_minutes * 60
    }
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("access_token_minutes", &self.access_token_minutes)
            .field("refresh_token_days", &self.refresh_token_days)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_output_redacts_secret() {
        let settings = JwtSettings {
            secret: "super-secret-value".to_string(),
            issuer: "issuer".to_string(),
            audience: "audience".to_string(),
            access_token_minutes: 15,
            refresh_token_days: 7,
        };

        let debug = format!("{:?}", settings);
        assert!(!debug.contains("super-secret-value"));
        assert_eq!(settings.access_token_seconds(), 900);
    }
}
