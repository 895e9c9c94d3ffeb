//! 프로세스 내부 이벤트 버스 (tokio mpsc)
//!
//! 단일 소비자 큐입니다. 발행은 제한된 버퍼를 쓰며 가득 차면 실패합니다.
//! 재전달은 별도의 무제한 채널로 들어가므로 버퍼 상태와 관계없이 항상 성공하고,
//! `receive`는 재전달 대기열을 먼저 비웁니다.

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use crate::core::errors::{AppError, AppResult};
use crate::domain::models::ConfirmationEmailEvent;
use super::{Delivery, EventPublisher, EventSource};

#[derive(Debug)]
struct Receivers {
    retries: mpsc::UnboundedReceiver<Delivery>,
    published: mpsc::Receiver<Delivery>,
}

#[derive(Debug)]
pub struct InMemoryEventBus {
    published: mpsc::Sender<Delivery>,
    retries: mpsc::UnboundedSender<Delivery>,
    receivers: Mutex<Receivers>,
}

impl InMemoryEventBus {
    pub fn new(capacity: usize) -> Self {
        let (published, published_rx) = mpsc::channel(capacity.max(1));
        let (retries, retries_rx) = mpsc::unbounded_channel();
        Self {
            published,
            retries,
            receivers: Mutex::new(Receivers {
                retries: retries_rx,
                published: published_rx,
            }),
        }
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: &ConfirmationEmailEvent) -> AppResult<()> {
        self.published
            .try_send(Delivery::first(event.clone()))
            .map_err(|e| AppError::MessagingError(format!("이벤트 큐에 넣지 못했습니다: {}", e)))
    }
}

#[async_trait]
impl EventSource for InMemoryEventBus {
    async fn receive(&self, cancel: &CancellationToken) -> AppResult<Option<Delivery>> {
        let mut receivers = self.receivers.lock().await;
        let Receivers { retries, published } = &mut *receivers;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Ok(None),
            Some(delivery) = retries.recv() => Ok(Some(delivery)),
            delivery = published.recv() => Ok(delivery),
        }
    }

    async fn acknowledge(&self, _delivery: &Delivery) -> AppResult<()> {
        Ok(())
    }

    async fn redeliver(&self, delivery: Delivery) -> AppResult<()> {
        self.retries
            .send(Delivery {
                attempt: delivery.attempt + 1,
                ..delivery
            })
            .map_err(|e| AppError::MessagingError(format!("재전달 대기열이 닫혔습니다: {}", e)))
    }
}
