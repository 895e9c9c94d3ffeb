//! 캐싱 계층 모듈
//!
//! Redis를 백엔드로 하는 조회 캐시와 리스트 큐를 제공합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::caching::redis::RedisClient;
//!
//! let redis = RedisClient::connect("redis://localhost:6379").await?;
//! redis.set_with_expiry("account:id:123", &account, 600).await?;
//!
//! let cached: Option<Account> = redis.get("account:id:123").await?;
//! ```
//!
//! # 환경 설정
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

pub mod redis;
