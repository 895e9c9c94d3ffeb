//! # Handler Telemetry
//!
//! 각 핸들러에 생성 시점에 주입되는 스코프 로거/트레이서입니다.
//! 핸들러 타입마다 전역 static 로거를 두지 않고, 조립 단계에서
//! [`OperationTelemetry`] 인스턴스를 만들어 넘깁니다.
//!
//! - 스팬: `tracing` 크레이트의 `log` 기능을 사용하므로 별도 subscriber 없이
//!   env_logger 출력으로 흘러갑니다.
//! - 심각도: 장애는 `account_service::critical` 타깃의 error 레코드,
//!   취소는 `account_service::cancelled` 타깃의 warn 레코드로 남습니다.

use std::sync::Arc;
use crate::core::result::ErrorList;

/// critical 로그 타깃
pub const CRITICAL_TARGET: &str = "account_service::critical";
/// 취소 로그 타깃
pub const CANCELLED_TARGET: &str = "account_service::cancelled";

/// 핸들러 결과를 기록하는 로거 인터페이스
///
/// 운영 환경에서는 [`LogOperationLogger`], 테스트에서는 기록용 구현을 주입합니다.
pub trait OperationLogger: Send + Sync {
    /// 핸들러 경계에서 잡힌 장애 (정확히 한 번 호출됨)
    fn critical(&self, operation: &str, subject: &str, fault: &str);

    /// 취소 신호로 중단된 요청
    fn cancelled(&self, operation: &str, subject: &str);

    /// 리포지토리가 도메인 오류를 반환한 경우
    fn failed(&self, operation: &str, subject: &str, errors: &ErrorList);

    /// 정상 완료
    fn completed(&self, operation: &str, subject: &str);
}

/// `log` 파사드로 기록하는 기본 구현
#[derive(Debug, Default, Clone)]
pub struct LogOperationLogger;

impl OperationLogger for LogOperationLogger {
    fn critical(&self, operation: &str, subject: &str, fault: &str) {
        log::error!(
            target: CRITICAL_TARGET,
            "[CRITICAL] {} 처리 중 장애 발생 - subject: {}, error: {}",
            operation, subject, fault
        );
    }

    fn cancelled(&self, operation: &str, subject: &str) {
        log::warn!(
            target: CANCELLED_TARGET,
            "{} 요청이 취소되었습니다 - subject: {}",
            operation, subject
        );
    }

    fn failed(&self, operation: &str, subject: &str, errors: &ErrorList) {
        let codes: Vec<&str> = errors.iter().map(|e| e.code.as_str()).collect();
        log::info!("{} 실패 - subject: {}, errors: {:?}", operation, subject, codes);
    }

    fn completed(&self, operation: &str, subject: &str) {
        log::debug!("{} 완료 - subject: {}", operation, subject);
    }
}

/// 핸들러 하나에 묶인 텔레메트리
///
/// 작업 이름(`CreateAccount` 등)과 로거를 함께 들고 다닙니다.
#[derive(Clone)]
pub struct OperationTelemetry {
    operation: &'static str,
    logger: Arc<dyn OperationLogger>,
}

impl OperationTelemetry {
    pub fn new(operation: &'static str, logger: Arc<dyn OperationLogger>) -> Self {
        Self { operation, logger }
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn logger(&self) -> &dyn OperationLogger {
        self.logger.as_ref()
    }

    /// 핸들러 호출 하나를 감싸는 스팬을 엽니다.
    pub fn span(&self, subject: &str) -> tracing::Span {
        tracing::info_span!("handler", operation = self.operation, subject = subject)
    }
}

impl std::fmt::Debug for OperationTelemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationTelemetry")
            .field("operation", &self.operation)
            .finish()
    }
}
