//! # Handler Pipeline
//!
//! 모든 유스케이스 핸들러가 공유하는 3단계 흐름입니다.
//!
//! ```text
//! Start ──▶ Delegate ──┬──▶ Completed   (ErrorOr::Value)
//!                      └──▶ Failed      (ErrorOr::Errors / 장애 / 취소)
//! ```
//!
//! - **Start**: 작업 이름과 대상 식별자로 스팬을 엽니다. 제어 흐름에는 영향이 없습니다.
//! - **Delegate**: 리포지토리 호출 하나를 실행합니다. 취소 토큰과 경쟁합니다.
//! - **Completed / Failed**: 도메인 오류는 그대로 반환하고, 장애(`AppError`, panic)는
//!   critical 로그 한 건을 남긴 뒤 `Unexpected`로 바꿉니다. 재시도는 하지 않습니다.
//!
//! 이 함수 밖으로 장애나 panic이 새어 나가지 않습니다.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use futures_util::FutureExt;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use crate::core::errors::AppResult;
use crate::core::result::{ErrorDetail, ErrorOr};
use crate::core::telemetry::OperationTelemetry;

/// Delegate 단계의 결과
enum Delegated<T> {
    Returned(ErrorOr<T>),
    Faulted(String),
    Cancelled,
}

/// 핸들러 흐름을 실행합니다.
///
/// # 인자
///
/// * `telemetry` - 핸들러에 주입된 스코프 텔레메트리
/// * `subject` - 로그 상관관계용 대상 식별자 (사용자 ID, 이메일 등)
/// * `cancel` - 요청 취소 토큰
/// * `delegate` - 리포지토리 호출 하나를 담은 future
pub async fn execute<T, F>(
    telemetry: &OperationTelemetry,
    subject: &str,
    cancel: &CancellationToken,
    delegate: F,
) -> ErrorOr<T>
where
    F: Future<Output = AppResult<ErrorOr<T>>>,
{
    let operation = telemetry.operation();
    let logger = telemetry.logger();
    let span = telemetry.span(subject);

    if cancel.is_cancelled() {
        logger.cancelled(operation, subject);
        return ErrorDetail::cancelled().into();
    }

    let guarded = AssertUnwindSafe(delegate).catch_unwind().instrument(span);

    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => Delegated::Cancelled,
        result = guarded => match result {
            Ok(Ok(value)) => Delegated::Returned(value),
            Ok(Err(fault)) if fault.is_cancelled() => Delegated::Cancelled,
            Ok(Err(fault)) => Delegated::Faulted(fault.to_string()),
            Err(panic) => Delegated::Faulted(panic_message(panic.as_ref())),
        },
    };

    match outcome {
        Delegated::Returned(ErrorOr::Value(value)) => {
            logger.completed(operation, subject);
            ErrorOr::Value(value)
        }
        Delegated::Returned(ErrorOr::Errors(errors)) => {
            logger.failed(operation, subject, &errors);
            ErrorOr::Errors(errors)
        }
        Delegated::Faulted(fault) => {
            logger.critical(operation, subject, &fault);
            ErrorDetail::unexpected().into()
        }
        Delegated::Cancelled => {
            logger.cancelled(operation, subject);
            ErrorDetail::cancelled().into()
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        format!("panic: {}", msg)
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        format!("panic: {}", msg)
    } else {
        "panic: <non-string payload>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::AppError;
    use crate::core::result::ErrorKind;
    use crate::core::telemetry::testing::{recording, LogEntry};
    use std::time::Duration;

    #[tokio::test]
    async fn test_value_is_returned_unchanged() {
        let (telemetry, logger) = recording("GetAccount");
        let cancel = CancellationToken::new();

        let result = execute(&telemetry, "user-1", &cancel, async { Ok(ErrorOr::Value(42u32)) }).await;

        assert_eq!(result, ErrorOr::Value(42));
        assert_eq!(
            logger.entries(),
            vec![LogEntry::Completed { operation: "GetAccount".into(), subject: "user-1".into() }]
        );
    }

    #[tokio::test]
    async fn test_domain_errors_pass_through() {
        let (telemetry, logger) = recording("GetAccount");
        let cancel = CancellationToken::new();

        let result: ErrorOr<u32> = execute(&telemetry, "user-1", &cancel, async {
            Ok(ErrorDetail::not_found("User.NotFound", "User").into())
        })
        .await;

        let error = result.first_error().unwrap();
        assert_eq!(error.kind, ErrorKind::NotFound);
        assert_eq!(error.code, "User.NotFound");
        assert!(logger.critical_entries().is_empty());
    }

    #[tokio::test]
    async fn test_fault_becomes_unexpected_with_one_critical_entry() {
        let (telemetry, logger) = recording("DeleteAccount");
        let cancel = CancellationToken::new();

        let result: ErrorOr<()> = execute(&telemetry, "user-9", &cancel, async {
            Err(AppError::DatabaseError("socket closed".to_string()))
        })
        .await;

        assert_eq!(result.first_error().unwrap().kind, ErrorKind::Unexpected);

        let critical = logger.critical_entries();
        assert_eq!(critical.len(), 1);
        match &critical[0] {
            LogEntry::Critical { operation, subject, fault } => {
                assert_eq!(operation, "DeleteAccount");
                assert_eq!(subject, "user-9");
                assert!(fault.contains("socket closed"));
            }
            other => panic!("unexpected entry: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_panic_is_caught_at_boundary() {
        let (telemetry, logger) = recording("Login");
        let cancel = CancellationToken::new();

        let result: ErrorOr<()> = execute(&telemetry, "alice", &cancel, async {
            panic!("store exploded");
        })
        .await;

        assert_eq!(result.first_error().unwrap().code, "General.Unexpected");
        assert_eq!(logger.critical_entries().len(), 1);
    }

    #[tokio::test]
    async fn test_cancellation_is_not_critical() {
        let (telemetry, logger) = recording("GetPagedAudits");
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let result: ErrorOr<()> = execute(&telemetry, "page-1", &cancel, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(ErrorOr::Value(()))
        })
        .await;

        assert_eq!(result.first_error().unwrap().code, "General.Cancelled");
        assert!(logger.critical_entries().is_empty());
        assert_eq!(
            logger.entries(),
            vec![LogEntry::Cancelled { operation: "GetPagedAudits".into(), subject: "page-1".into() }]
        );
    }

    #[tokio::test]
    async fn test_cancelled_fault_from_delegate_is_not_critical() {
        let (telemetry, logger) = recording("RefreshToken");
        let cancel = CancellationToken::new();

        let result: ErrorOr<()> = execute(&telemetry, "user-3", &cancel, async { Err(AppError::Cancelled) }).await;

        assert_eq!(result.first_error().unwrap().code, "General.Cancelled");
        assert!(logger.critical_entries().is_empty());
    }

    #[tokio::test]
    async fn test_already_cancelled_token_skips_delegate() {
        let (telemetry, _logger) = recording("CreateAccount");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result: ErrorOr<()> = execute(&telemetry, "a@b.com", &cancel, async {
            panic!("delegate must not run");
        })
        .await;

        assert_eq!(result.first_error().unwrap().code, "General.Cancelled");
    }
}
