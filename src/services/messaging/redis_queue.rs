//! Redis 리스트 기반 이벤트 큐
//!
//! | 동작 | 명령 | 연결 |
//! |------|------|------|
//! | 발행 | `LPUSH {queue}` | 공유 |
//! | 수신 | `BRPOPLPUSH {queue} {queue}:processing` | 소비자 전용 |
//! | 확인 | `LREM {queue}:processing 1 {payload}` | 소비자 전용 |
//! | 재전달 | `attempt + 1` 페이로드를 `LPUSH` 후 `LREM` | 소비자 전용 |
//! | 복구 | 처리 중 리스트가 빌 때까지 `RPOPLPUSH {queue}:processing {queue}` | 소비자 전용 |
//!
//! 처리 중 리스트에 남은 항목은 이전 소비자가 확인 전에 종료된 이벤트입니다.
//! 소비자를 시작하기 전에 [`RedisEventQueue::recover_in_flight`]로 큐에 되돌립니다.
//! 큐 하나에는 소비자 프로세스 하나만 붙습니다.

use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use crate::caching::redis::RedisClient;
use crate::core::errors::{AppError, AppResult};
use crate::domain::models::ConfirmationEmailEvent;
use super::{Delivery, EventPublisher, EventSource};

/// `BRPOPLPUSH` 대기 시간 (초). 이 주기로 취소 여부를 확인합니다.
const POLL_TIMEOUT_SECS: f64 = 1.0;

/// 큐가 사용하는 Redis 리스트 명령
#[async_trait]
pub trait QueueConnection: Send + Sync {
    async fn push(&self, list: &str, payload: &str) -> AppResult<()>;

    async fn move_blocking(
        &self,
        source: &str,
        destination: &str,
        timeout_secs: f64,
    ) -> AppResult<Option<String>>;

    async fn move_one(&self, source: &str, destination: &str) -> AppResult<Option<String>>;

    async fn remove(&self, list: &str, payload: &str) -> AppResult<()>;
}

#[async_trait]
impl QueueConnection for RedisClient {
    async fn push(&self, list: &str, payload: &str) -> AppResult<()> {
        RedisClient::push(self, list, payload).await
    }

    async fn move_blocking(
        &self,
        source: &str,
        destination: &str,
        timeout_secs: f64,
    ) -> AppResult<Option<String>> {
        RedisClient::move_blocking(self, source, destination, timeout_secs).await
    }

    async fn move_one(&self, source: &str, destination: &str) -> AppResult<Option<String>> {
        RedisClient::move_one(self, source, destination).await
    }

    async fn remove(&self, list: &str, payload: &str) -> AppResult<()> {
        RedisClient::remove(self, list, payload).await
    }
}

/// 큐에 저장되는 페이로드
#[derive(Debug, Serialize, Deserialize)]
struct QueuedEvent {
    event: ConfirmationEmailEvent,
    attempt: u32,
}

pub struct RedisEventQueue {
    /// 캐시와 함께 쓰는 연결. 발행에만 사용합니다.
    shared: Arc<dyn QueueConnection>,
    /// 대기 명령을 실행하는 소비자 전용 연결
    consumer: Arc<dyn QueueConnection>,
    queue: String,
    processing: String,
}

impl RedisEventQueue {
    pub fn new(
        shared: Arc<dyn QueueConnection>,
        consumer: Arc<dyn QueueConnection>,
        queue: impl Into<String>,
    ) -> Self {
        let queue = queue.into();
        let processing = format!("{}:processing", queue);
        Self { shared, consumer, queue, processing }
    }

    /// 처리 중 리스트에 남은 이벤트를 모두 큐로 되돌리고 개수를 반환합니다.
    pub async fn recover_in_flight(&self) -> AppResult<usize> {
        let mut recovered = 0;
        while self
            .consumer
            .move_one(&self.processing, &self.queue)
            .await?
            .is_some()
        {
            recovered += 1;
        }

        if recovered > 0 {
            log::warn!("확인되지 않은 이벤트 {}건을 {} 큐로 되돌렸습니다", recovered, self.queue);
        }
        Ok(recovered)
    }
}

fn encode(event: &ConfirmationEmailEvent, attempt: u32) -> AppResult<String> {
    serde_json::to_string(&QueuedEvent { event: event.clone(), attempt })
        .map_err(|e| AppError::MessagingError(format!("이벤트 직렬화 실패: {}", e)))
}

fn decode(payload: &str) -> AppResult<Delivery> {
    let queued: QueuedEvent = serde_json::from_str(payload)
        .map_err(|e| AppError::MessagingError(format!("이벤트 역직렬화 실패: {}", e)))?;

    Ok(Delivery {
        event: queued.event,
        attempt: queued.attempt,
        receipt: Some(payload.to_string()),
    })
}

#[async_trait]
impl EventPublisher for RedisEventQueue {
    async fn publish(&self, event: &ConfirmationEmailEvent) -> AppResult<()> {
        let payload = encode(event, 1)?;
        self.shared.push(&self.queue, &payload).await
    }
}

#[async_trait]
impl EventSource for RedisEventQueue {
    async fn receive(&self, cancel: &CancellationToken) -> AppResult<Option<Delivery>> {
        loop {
            if cancel.is_cancelled() {
                return Ok(None);
            }

            let payload = self
                .consumer
                .move_blocking(&self.queue, &self.processing, POLL_TIMEOUT_SECS)
                .await?;

            let Some(payload) = payload else {
                continue;
            };

            match decode(&payload) {
                Ok(delivery) => return Ok(Some(delivery)),
                Err(e) => {
                    // 해석할 수 없는 페이로드는 처리 목록에서 제거
                    log::error!("잘못된 이벤트 페이로드를 버립니다: {} ({})", payload, e);
                    self.consumer.remove(&self.processing, &payload).await?;
                }
            }
        }
    }

    async fn acknowledge(&self, delivery: &Delivery) -> AppResult<()> {
        match delivery.receipt.as_deref() {
            Some(payload) => self.consumer.remove(&self.processing, payload).await,
            None => Ok(()),
        }
    }

    async fn redeliver(&self, delivery: Delivery) -> AppResult<()> {
        let payload = encode(&delivery.event, delivery.attempt + 1)?;
        self.consumer.push(&self.queue, &payload).await?;
        self.acknowledge(&delivery).await
    }
}
