//! 서버, 저장소, 메시징, 이메일 관련 설정 섹션
//!
//! 각 섹션은 [`Lookup`]을 통해 읽히며, 잘못된 값은 즉시 실패하지 않고
//! 문제 목록에 모였다가 [`ConfigError::Invalid`](super::ConfigError::Invalid)로 한 번에 보고됩니다.

use std::time::Duration;
use reqwest::Url;
use super::Lookup;

/// 실행 환경
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    /// 환경 이름을 해석합니다. 알 수 없는 값은 가장 보수적인 `Production`으로 취급합니다.
    pub fn from_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// HTTP 서버 설정
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    /// 요청 하나에 허용되는 최대 처리 시간 (초과 시 취소 토큰 발동)
    pub request_timeout: Duration,
    pub allowed_origins: Vec<String>,
}

impl ServerSettings {
    pub(super) fn load<F>(lookup: &mut Lookup<F>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let workers = lookup.parse("WORKERS", 4usize);
        if workers == 0 {
            lookup.problem("WORKERS must be at least 1");
        }

        let timeout_secs = lookup.parse("REQUEST_TIMEOUT_SECS", 30u64);
        if timeout_secs == 0 {
            lookup.problem("REQUEST_TIMEOUT_SECS must be at least 1");
        }

        let allowed_origins = lookup
            .string(
                "CORS_ALLOWED_ORIGINS",
                "http://localhost:3000,http://127.0.0.1:3000,http://localhost:8080,http://127.0.0.1:8080",
            )
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            host: lookup.string("HOST", "0.0.0.0"),
            port: lookup.parse("PORT", 8080u16),
            workers,
            request_timeout: Duration::from_secs(timeout_secs),
            allowed_origins,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 계정/감사 로그 저장소 백엔드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// 프로세스 메모리 (개발/테스트)
    Memory,
    /// MongoDB + Redis 캐시
    Mongo,
}

/// 저장소 설정
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub mongodb_uri: String,
    pub database_name: String,
    pub redis_url: String,
    /// 계정 캐시 TTL (초)
    pub cache_ttl_secs: u64,
}

impl StorageSettings {
    pub(super) fn load<F>(lookup: &mut Lookup<F>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup.string("STORAGE_BACKEND", "mongo").to_lowercase().as_str() {
            "memory" => StorageBackend::Memory,
            "mongo" | "mongodb" => StorageBackend::Mongo,
            other => {
                lookup.problem(format!("STORAGE_BACKEND must be 'memory' or 'mongo', got '{}'", other));
                StorageBackend::Memory
            }
        };

        Self {
            backend,
            mongodb_uri: lookup.string("MONGODB_URI", "mongodb://localhost:27017"),
            database_name: lookup.string("DATABASE_NAME", "account_service"),
            redis_url: lookup.string("REDIS_URL", "redis://localhost:6379"),
            cache_ttl_secs: lookup.parse("CACHE_TTL_SECS", 600u64),
        }
    }
}

/// 비밀번호 해싱 설정
#[derive(Debug, Clone, Copy)]
pub struct PasswordSettings {
    pub bcrypt_cost: u32,
}

impl PasswordSettings {
    /// 환경별 기본 bcrypt cost
    ///
    /// | 환경 | cost |
    /// |------|------|
    /// | Development / Test | 4 |
    /// | Staging | 10 |
    /// | Production | 12 |
    pub fn bcrypt_cost_for_env(env: Environment) -> u32 {
        match env {
            Environment::Development => 4,
            Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }

    pub(super) fn load<F>(lookup: &mut Lookup<F>, env: Environment) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let bcrypt_cost = lookup.parse("BCRYPT_COST", Self::bcrypt_cost_for_env(env));
        if !(4..=15).contains(&bcrypt_cost) {
            lookup.problem(format!("BCRYPT_COST must be between 4 and 15, got {}", bcrypt_cost));
        }

        Self { bcrypt_cost }
    }
}

/// 확인 이메일 이벤트 전송 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagingTransport {
    /// 프로세스 내부 채널
    Memory,
    /// Redis 리스트 큐
    Redis,
}

/// 메시징 설정
#[derive(Debug, Clone)]
pub struct MessagingSettings {
    pub transport: MessagingTransport,
    pub queue_name: String,
    /// 이 횟수만큼 실패하면 이벤트를 버립니다 (dead-letter)
    pub max_delivery_attempts: u32,
    pub channel_capacity: usize,
}

impl MessagingSettings {
    pub(super) fn load<F>(lookup: &mut Lookup<F>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let transport = match lookup.string("MESSAGING_TRANSPORT", "memory").to_lowercase().as_str() {
            "memory" => MessagingTransport::Memory,
            "redis" => MessagingTransport::Redis,
            other => {
                lookup.problem(format!("MESSAGING_TRANSPORT must be 'memory' or 'redis', got '{}'", other));
                MessagingTransport::Memory
            }
        };

        let max_delivery_attempts = lookup.parse("MESSAGING_MAX_DELIVERY_ATTEMPTS", 5u32);
        if max_delivery_attempts == 0 {
            lookup.problem("MESSAGING_MAX_DELIVERY_ATTEMPTS must be at least 1");
        }

        let channel_capacity = lookup.parse("MESSAGING_CHANNEL_CAPACITY", 1024usize);
        if channel_capacity == 0 {
            lookup.problem("MESSAGING_CHANNEL_CAPACITY must be at least 1");
        }

        Self {
            transport,
            queue_name: lookup.string("MESSAGING_QUEUE", "account-service:confirmation-emails"),
            max_delivery_attempts,
            channel_capacity,
        }
    }
}

/// 이메일 발송 설정
#[derive(Debug, Clone)]
pub struct EmailSettings {
    /// 외부 이메일 서비스 엔드포인트. 없으면 로그로만 남깁니다.
    pub service_url: Option<Url>,
    pub api_key: Option<String>,
    pub sender: String,
    /// 확인 링크의 기준 URL (`?userId=..&code=..`가 붙습니다)
    pub confirmation_url: String,
}

impl EmailSettings {
    pub(super) fn load<F>(lookup: &mut Lookup<F>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_url = lookup.optional("EMAIL_SERVICE_URL").and_then(|raw| {
            Url::parse(&raw)
                .map_err(|e| lookup.problem(format!("EMAIL_SERVICE_URL is not a valid URL: {}", e)))
                .ok()
        });

        let confirmation_url = lookup.string("CONFIRMATION_URL", "http://localhost:3000/confirm-email");
        if let Err(e) = Url::parse(&confirmation_url) {
            lookup.problem(format!("CONFIRMATION_URL is not a valid URL: {}", e));
        }

        Self {
            service_url,
            api_key: lookup.optional("EMAIL_SERVICE_API_KEY"),
            sender: lookup.string("EMAIL_SENDER", "no-reply@localhost"),
            confirmation_url,
        }
    }
}

/// Rate Limiting 설정
#[derive(Debug, Clone, Copy)]
pub struct RateLimitSettings {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitSettings {
    pub(super) fn load<F>(lookup: &mut Lookup<F>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let per_second = lookup.parse("RATE_LIMIT_PER_SECOND", 100u64);
        let burst_size = lookup.parse("RATE_LIMIT_BURST_SIZE", 200u32);
        if per_second == 0 || burst_size == 0 {
            lookup.problem("RATE_LIMIT_PER_SECOND and RATE_LIMIT_BURST_SIZE must be positive");
        }

        Self { per_second, burst_size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_name() {
        assert_eq!(Environment::from_name("development"), Environment::Development);
        assert_eq!(Environment::from_name("test"), Environment::Test);
        assert_eq!(Environment::from_name("production"), Environment::Production);
        assert_eq!(Environment::from_name("unknown"), Environment::Production);
    }

    #[test]
    fn test_bcrypt_cost_for_each_environment() {
        assert_eq!(PasswordSettings::bcrypt_cost_for_env(Environment::Development), 4);
        assert_eq!(PasswordSettings::bcrypt_cost_for_env(Environment::Test), 4);
        assert_eq!(PasswordSettings::bcrypt_cost_for_env(Environment::Staging), 10);
        assert_eq!(PasswordSettings::bcrypt_cost_for_env(Environment::Production), 12);
    }
}
