//! # Redis 클라이언트
//!
//! 두 가지 용도로 쓰입니다.
//!
//! - **조회 캐시**: MongoDB 계정 저장소가 `account:id:{id}` 키로
//!   JSON 직렬화된 계정을 TTL과 함께 보관합니다 (표시용 조회 전용).
//! - **리스트 큐**: 확인 이메일 이벤트 전송 계층 (`LPUSH` / `BRPOPLPUSH` / `RPOPLPUSH` / `LREM`).
//!
//! 내부적으로 [`ConnectionManager`]를 사용하므로 연결이 끊기면 자동으로 재연결합니다.
//! 하나의 연결은 명령을 순서대로 처리하므로, `BRPOPLPUSH`처럼 대기하는 명령은
//! 캐시/발행과 공유하지 않는 별도 클라이언트에서 실행합니다.

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use serde::{Serialize, de::DeserializeOwned};
use crate::core::errors::{AppError, AppResult};

#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
}

impl RedisClient {
    /// 연결하고 `PING`으로 서버 가용성을 확인합니다.
    pub async fn connect(redis_url: &str) -> AppResult<Self> {
        let client = Client::open(redis_url)?;
        let mut manager = ConnectionManager::new(client).await?;

        redis::cmd("PING").query_async::<()>(&mut manager).await?;

        log::info!("✅ Redis 연결 성공");
        Ok(Self { manager })
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await?;

        match value {
            Some(json) => {
                let deserialized = serde_json::from_str(&json)
                    .map_err(|e| AppError::RedisError(format!("캐시 역직렬화 실패 ({}): {}", key, e)))?;
                Ok(Some(deserialized))
            }
            None => Ok(None),
        }
    }

    pub async fn set_with_expiry<T: Serialize>(&self, key: &str, value: &T, seconds: u64) -> AppResult<()> {
        let mut conn = self.manager.clone();
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::RedisError(format!("캐시 직렬화 실패 ({}): {}", key, e)))?;
        conn.set_ex::<_, _, ()>(key, json, seconds).await?;
        Ok(())
    }

    pub async fn del_multiple(&self, keys: &[String]) -> AppResult<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.manager.clone();
        conn.del::<_, ()>(keys).await?;
        Ok(())
    }

    /// 리스트 왼쪽에 값을 넣습니다.
    pub async fn push(&self, list: &str, payload: &str) -> AppResult<()> {
        let mut conn = self.manager.clone();
        conn.lpush::<_, _, ()>(list, payload).await?;
        Ok(())
    }

    /// `source` 오른쪽에서 꺼내 `destination`에 옮깁니다. 시간 초과 시 `None`.
    pub async fn move_blocking(
        &self,
        source: &str,
        destination: &str,
        timeout_secs: f64,
    ) -> AppResult<Option<String>> {
        let mut conn = self.manager.clone();
        let payload: Option<String> = conn.brpoplpush(source, destination, timeout_secs).await?;
        Ok(payload)
    }

    /// 대기 없이 `source` 오른쪽에서 꺼내 `destination`에 옮깁니다. 비어 있으면 `None`.
    pub async fn move_one(&self, source: &str, destination: &str) -> AppResult<Option<String>> {
        let mut conn = self.manager.clone();
        let payload: Option<String> = conn.rpoplpush(source, destination).await?;
        Ok(payload)
    }

    /// 리스트에서 값 하나를 제거합니다.
    pub async fn remove(&self, list: &str, payload: &str) -> AppResult<()> {
        let mut conn = self.manager.clone();
        conn.lrem::<_, _, ()>(list, 1, payload).await?;
        Ok(())
    }
}

impl std::fmt::Debug for RedisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisClient").finish_non_exhaustive()
    }
}
