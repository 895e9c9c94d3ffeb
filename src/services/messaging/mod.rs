//! # 확인 이메일 메시징
//!
//! 계정 생성과 확인 메일 재전송이 성공한 뒤 [`ConfirmationEmailEvent`]를 발행하고,
//! 백그라운드 소비자가 받아 이메일 발송을 예약합니다.
//!
//! ```text
//! Handler ──publish──▶ EventPublisher ══ transport ══▶ EventSource ──▶ run_consumer
//!                                                                        │
//!                                                  ConfirmationEmailConsumer::consume
//!                                                                        │
//!                                                                  EmailScheduler
//! ```
//!
//! ## 전달 보장
//!
//! - 발행은 한 번만 시도합니다. 실패하면 요청 자체가 `Event.PublishFailed`로 실패합니다.
//! - 소비는 최소 한 번(at-least-once)입니다. 처리 실패 시 `attempt + 1`로 재전달하며,
//!   `max_delivery_attempts`에 도달하면 error 로그를 남기고 버립니다.
//! - 재전달은 이메일을 다시 보낼 수 있지만 계정을 만들지는 않습니다.
//!
//! ## 전송 계층
//!
//! | `MESSAGING_TRANSPORT` | 구현체 |
//! |------------------------|--------|
//! | `memory` | [`InMemoryEventBus`] (tokio mpsc) |
//! | `redis` | [`RedisEventQueue`] (`LPUSH` / `BRPOPLPUSH` / `LREM`) |

pub mod consumer;
pub mod email;
pub mod memory_bus;
pub mod redis_queue;

pub use consumer::{process_delivery, run_consumer, ConfirmationEmailConsumer};
pub use email::{EmailMessage, EmailScheduler, HttpEmailScheduler, LogEmailScheduler};
pub use memory_bus::InMemoryEventBus;
pub use redis_queue::{QueueConnection, RedisEventQueue};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use crate::core::errors::AppResult;
use crate::domain::models::ConfirmationEmailEvent;

/// 전송 계층에서 꺼낸 이벤트 한 건
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub event: ConfirmationEmailEvent,
    /// 1부터 시작하는 전달 시도 횟수
    pub attempt: u32,
    /// 확인 응답에 필요한 전송 계층 식별자 (Redis: 처리 중 리스트의 원본 페이로드)
    pub receipt: Option<String>,
}

impl Delivery {
    pub fn first(event: ConfirmationEmailEvent) -> Self {
        Self { event, attempt: 1, receipt: None }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &ConfirmationEmailEvent) -> AppResult<()>;
}

#[async_trait]
pub trait EventSource: Send + Sync {
    /// 다음 이벤트를 기다립니다. 취소되었거나 전송 계층이 닫히면 `None`.
    async fn receive(&self, cancel: &CancellationToken) -> AppResult<Option<Delivery>>;

    /// 처리 완료를 알립니다.
    async fn acknowledge(&self, delivery: &Delivery) -> AppResult<()>;

    /// 시도 횟수를 올려 다시 넣습니다.
    async fn redeliver(&self, delivery: Delivery) -> AppResult<()>;
}
