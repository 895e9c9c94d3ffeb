//! # Configuration Module
//!
//! 애플리케이션 설정을 시작 시점에 한 번 읽어 검증합니다.
//! 잘못된 값이 하나라도 있으면 모든 문제를 모아 [`ConfigError::Invalid`]로 반환하고,
//! `main`은 서버를 띄우지 않고 종료합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 서버, 저장소, 비밀번호 해싱, 메시징, 이메일, Rate Limiting
//! - [`auth_config`] - JWT
//!
//! ## 환경 변수
//!
//! | 변수 | 기본값 | 설명 |
//! |------|--------|------|
//! | `ENVIRONMENT` | `production` | development / test / staging / production |
//! | `HOST`, `PORT` | `0.0.0.0`, `8080` | 바인딩 주소 |
//! | `WORKERS` | `4` | actix 워커 수 |
//! | `REQUEST_TIMEOUT_SECS` | `30` | 요청 취소 타임아웃 |
//! | `STORAGE_BACKEND` | `mongo` | `memory` 또는 `mongo` |
//! | `MONGODB_URI`, `DATABASE_NAME` | `mongodb://localhost:27017`, `account_service` | |
//! | `REDIS_URL` | `redis://localhost:6379` | 캐시 및 Redis 메시징 |
//! | `JWT_SECRET` | **필수** | HS256 서명 키 |
//! | `JWT_ISSUER`, `JWT_AUDIENCE` | `account-service`, `account-service-clients` | |
//! | `BCRYPT_COST` | 환경별 | 4-15 |
//! | `MESSAGING_TRANSPORT` | `memory` | `memory` 또는 `redis` |
//! | `MESSAGING_MAX_DELIVERY_ATTEMPTS` | `5` | 확인 이메일 이벤트 최대 전달 시도 |
//! | `EMAIL_SERVICE_URL` | 없음 | 없으면 발송 대신 로그 기록 |
//! | `CONFIRMATION_URL` | `http://localhost:3000/confirm-email` | |
//! | `RATE_LIMIT_PER_SECOND`, `RATE_LIMIT_BURST_SIZE` | `100`, `200` | |
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! let settings = AppSettings::from_env()?;
//! info!("바인딩 주소: {}", settings.server.bind_address());
//! ```

pub mod auth_config;
pub mod data_config;

use std::str::FromStr;
use thiserror::Error;

pub use auth_config::JwtSettings;
pub use data_config::{
    EmailSettings, Environment, MessagingSettings, MessagingTransport, PasswordSettings,
    RateLimitSettings, ServerSettings, StorageBackend, StorageSettings,
};

/// 설정 로딩 에러
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// 전체 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub environment: Environment,
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub jwt: JwtSettings,
    pub password: PasswordSettings,
    pub messaging: MessagingSettings,
    pub email: EmailSettings,
    pub rate_limit: RateLimitSettings,
}

impl AppSettings {
    /// 프로세스 환경 변수에서 설정을 읽습니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 키-값 조회 함수로 설정을 읽습니다.
    ///
    /// 테스트에서는 `HashMap` 기반 조회 함수를 넘겨 전역 환경 변수를 건드리지 않습니다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut lookup = Lookup::new(lookup);

        let environment = Environment::from_name(&lookup.string("ENVIRONMENT", "production"));
        let server = ServerSettings::load(&mut lookup);
        let storage = StorageSettings::load(&mut lookup);
        let jwt = JwtSettings::load(&mut lookup, environment);
        let password = PasswordSettings::load(&mut lookup, environment);
        let messaging = MessagingSettings::load(&mut lookup);
        let email = EmailSettings::load(&mut lookup);
        let rate_limit = RateLimitSettings::load(&mut lookup);

        lookup.finish()?;

        Ok(Self {
            environment,
            server,
            storage,
            jwt,
            password,
            messaging,
            email,
            rate_limit,
        })
    }
}

/// 문제를 모으면서 값을 읽는 조회 도우미
pub(crate) struct Lookup<F> {
    source: F,
    problems: Vec<String>,
}

impl<F> Lookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn new(source: F) -> Self {
        Self { source, problems: Vec::new() }
    }

    /// 비어 있지 않은 값만 반환합니다.
    pub(crate) fn optional(&self, key: &str) -> Option<String> {
        (self.source)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub(crate) fn string(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    pub(crate) fn required(&mut self, key: &str) -> String {
        match self.optional(key) {
            Some(value) => value,
            None => {
                self.problem(format!("{} must be set", key));
                String::new()
            }
        }
    }

    pub(crate) fn parse<T>(&mut self, key: &str, default: T) -> T
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(key) {
            None => default,
            Some(raw) => match raw.parse::<T>() {
                Ok(value) => value,
                Err(e) => {
                    self.problem(format!("{} has an invalid value '{}': {}", key, raw, e));
                    default
                }
            },
        }
    }

    pub(crate) fn problem(&mut self, message: impl Into<String>) {
        self.problems.push(message.into());
    }

    fn finish(self) -> Result<(), ConfigError> {
        if self.problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(self.problems))
        }
    }
}
