//! 확인 이메일 이벤트 소비자

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use crate::config::EmailSettings;
use crate::core::errors::AppResult;
use crate::domain::models::ConfirmationEmailEvent;
use super::email::{EmailMessage, EmailScheduler};
use super::{Delivery, EventSource};

/// 수신 오류 후 다시 시도하기까지 대기 시간
const RECEIVE_BACKOFF: Duration = Duration::from_secs(1);

const CONFIRMATION_SUBJECT: &str = "Confirm your email address";

pub struct ConfirmationEmailConsumer {
    scheduler: Arc<dyn EmailScheduler>,
    sender: String,
    confirmation_url: String,
}

impl ConfirmationEmailConsumer {
    pub fn new(scheduler: Arc<dyn EmailScheduler>, settings: &EmailSettings) -> Self {
        Self {
            scheduler,
            sender: settings.sender.clone(),
            confirmation_url: settings.confirmation_url.clone(),
        }
    }

    /// `{confirmation_url}?userId=..&code=..` 형태의 확인 링크
    pub fn confirmation_link(&self, event: &ConfirmationEmailEvent) -> String {
        let separator = if self.confirmation_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}userId={}&code={}",
            self.confirmation_url,
            separator,
            urlencoding::encode(&event.user_id),
            urlencoding::encode(&event.verification_code)
        )
    }

    pub fn build_message(&self, event: &ConfirmationEmailEvent) -> EmailMessage {
        let link = self.confirmation_link(event);
        EmailMessage {
            from: self.sender.clone(),
            to: event.email.clone(),
            subject: CONFIRMATION_SUBJECT.to_string(),
            text: format!(
                "Welcome!\n\nPlease confirm your email address by opening the link below:\n{}\n\n\
                 Your verification code is {}. It expires in 24 hours.",
                link, event.verification_code
            ),
        }
    }

    pub async fn consume(&self, event: &ConfirmationEmailEvent) -> AppResult<()> {
        let message = self.build_message(event);
        self.scheduler.schedule(&message).await
    }
}

/// 전달 한 건을 처리하고 확인/재전달/폐기 중 하나를 수행합니다.
pub async fn process_delivery(
    source: &dyn EventSource,
    consumer: &ConfirmationEmailConsumer,
    delivery: Delivery,
    max_delivery_attempts: u32,
) -> AppResult<()> {
    match consumer.consume(&delivery.event).await {
        Ok(()) => source.acknowledge(&delivery).await,
        Err(e) if delivery.attempt >= max_delivery_attempts => {
            log::error!(
                "[dead-letter] 확인 이메일 이벤트를 버립니다 - user_id: {}, attempts: {}, error: {}",
                delivery.event.user_id, delivery.attempt, e
            );
            source.acknowledge(&delivery).await
        }
        Err(e) => {
            log::warn!(
                "확인 이메일 처리 실패, 재전달합니다 - user_id: {}, attempt: {}, error: {}",
                delivery.event.user_id, delivery.attempt, e
            );
            source.redeliver(delivery).await
        }
    }
}

/// 종료 토큰이 취소될 때까지 이벤트를 소비합니다.
pub async fn run_consumer(
    source: Arc<dyn EventSource>,
    consumer: Arc<ConfirmationEmailConsumer>,
    max_delivery_attempts: u32,
    shutdown: CancellationToken,
) {
    log::info!("확인 이메일 소비자 시작 (max attempts: {})", max_delivery_attempts);

    loop {
        match source.receive(&shutdown).await {
            Ok(Some(delivery)) => {
                if let Err(e) = process_delivery(source.as_ref(), &consumer, delivery, max_delivery_attempts).await {
                    log::error!("이벤트 확인/재전달 실패: {}", e);
                }
            }
            Ok(None) => break,
            Err(e) => {
                log::error!("이벤트 수신 실패: {}", e);
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = tokio::time::sleep(RECEIVE_BACKOFF) => {}
                }
            }
        }
    }

    log::info!("확인 이메일 소비자 종료");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use async_trait::async_trait;
    use crate::core::errors::AppError;
    use crate::services::messaging::email::MockEmailScheduler;
    use crate::services::messaging::{EventPublisher, InMemoryEventBus};

    /// 예약 요청을 세기만 하는 스케줄러
    #[derive(Default)]
    struct CountingScheduler {
        scheduled: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl EmailScheduler for CountingScheduler {
        async fn schedule(&self, _message: &EmailMessage) -> AppResult<()> {
            self.scheduled.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(AppError::ExternalServiceError("smtp down".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn settings() -> EmailSettings {
        EmailSettings {
            service_url: None,
            api_key: None,
            sender: "no-reply@example.com".to_string(),
            confirmation_url: "https://app.example.com/confirm-email".to_string(),
        }
    }

    fn event() -> ConfirmationEmailEvent {
        ConfirmationEmailEvent::new("user 1/2", "ana@example.com", "123456")
    }

    async fn assert_drained(bus: &InMemoryEventBus) {
        let next = tokio::time::timeout(
            Duration::from_millis(50),
            bus.receive(&CancellationToken::new()),
        )
        .await;
        assert!(next.is_err(), "queue should be empty");
    }

    #[test]
    fn test_link_escapes_query_values() {
        let consumer = ConfirmationEmailConsumer::new(Arc::new(CountingScheduler::default()), &settings());

        assert_eq!(
            consumer.confirmation_link(&event()),
            "https://app.example.com/confirm-email?userId=user%201%2F2&code=123456"
        );
    }

    #[test]
    fn test_link_appends_to_existing_query() {
        let consumer = ConfirmationEmailConsumer::new(
            Arc::new(CountingScheduler::default()),
            &EmailSettings {
                confirmation_url: "https://app.example.com/confirm?lang=en".to_string(),
                ..settings()
            },
        );

        assert!(consumer.confirmation_link(&event()).starts_with("https://app.example.com/confirm?lang=en&userId="));
    }

    #[tokio::test]
    async fn test_consume_schedules_message_for_recipient() {
        let mut scheduler = MockEmailScheduler::new();
        scheduler
            .expect_schedule()
            .withf(|message| {
                message.to == "ana@example.com"
                    && message.from == "no-reply@example.com"
                    && message.text.contains("code=123456")
            })
            .times(1)
            .returning(|_| Ok(()));

        let consumer = ConfirmationEmailConsumer::new(Arc::new(scheduler), &settings());
        consumer.consume(&event()).await.unwrap();
    }

    #[tokio::test]
    async fn test_same_event_published_twice_is_sent_at_most_twice() {
        let bus = InMemoryEventBus::new(8);
        let scheduler = Arc::new(CountingScheduler::default());
        let consumer = ConfirmationEmailConsumer::new(scheduler.clone(), &settings());
        let cancel = CancellationToken::new();

        bus.publish(&event()).await.unwrap();
        bus.publish(&event()).await.unwrap();

        for _ in 0..2 {
            let delivery = bus.receive(&cancel).await.unwrap().unwrap();
            process_delivery(&bus, &consumer, delivery, 5).await.unwrap();
        }

        assert_drained(&bus).await;
        assert!(scheduler.scheduled.load(Ordering::SeqCst) <= 2);
        assert_eq!(scheduler.scheduled.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_delivery_is_dropped_after_max_attempts() {
        let bus = InMemoryEventBus::new(8);
        let scheduler = Arc::new(CountingScheduler { fail: true, ..CountingScheduler::default() });
        let consumer = ConfirmationEmailConsumer::new(scheduler.clone(), &settings());
        let cancel = CancellationToken::new();

        bus.publish(&event()).await.unwrap();

        for expected_attempt in 1..=3 {
            let delivery = bus.receive(&cancel).await.unwrap().unwrap();
            assert_eq!(delivery.attempt, expected_attempt);
            process_delivery(&bus, &consumer, delivery, 3).await.unwrap();
        }

        assert_drained(&bus).await;
        assert_eq!(scheduler.scheduled.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failed_delivery_is_kept_when_buffer_is_full() {
        let bus = InMemoryEventBus::new(1);
        let scheduler = Arc::new(CountingScheduler { fail: true, ..CountingScheduler::default() });
        let consumer = ConfirmationEmailConsumer::new(scheduler, &settings());
        let cancel = CancellationToken::new();

        bus.publish(&ConfirmationEmailEvent::new("u1", "ana@example.com", "111111")).await.unwrap();
        let delivery = bus.receive(&cancel).await.unwrap().unwrap();
        bus.publish(&ConfirmationEmailEvent::new("u2", "bia@example.com", "222222")).await.unwrap();

        process_delivery(&bus, &consumer, delivery, 5).await.unwrap();

        let retried = bus.receive(&cancel).await.unwrap().unwrap();
        assert_eq!((retried.event.user_id.as_str(), retried.attempt), ("u1", 2));
        let queued = bus.receive(&cancel).await.unwrap().unwrap();
        assert_eq!((queued.event.user_id.as_str(), queued.attempt), ("u2", 1));
    }

    #[tokio::test]
    async fn test_run_consumer_stops_on_shutdown() {
        let bus = Arc::new(InMemoryEventBus::new(8));
        let scheduler = Arc::new(CountingScheduler::default());
        let consumer = Arc::new(ConfirmationEmailConsumer::new(scheduler.clone(), &settings()));
        let shutdown = CancellationToken::new();

        bus.publish(&event()).await.unwrap();
        let task = tokio::spawn(run_consumer(bus.clone(), consumer, 3, shutdown.clone()));

        tokio::time::timeout(Duration::from_secs(2), async {
            while scheduler.scheduled.load(Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(2), task).await.unwrap().unwrap();
    }
}
