//! # Use-case Handlers Module
//!
//! 검증을 통과한 요청 하나를 리포지토리 호출 하나로 연결하는 유스케이스 핸들러들입니다.
//! HTTP와는 무관하며, actix 엔드포인트는 [`routes`](crate::routes)에서 이 핸들러를 호출합니다.
//!
//! ## 아키텍처 위치
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   routes - HTTP 엔드포인트, 상태 코드 매핑          ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   validation::dispatch - 검증 게이트
//! ├─────────────────────────────────────────────┤
//!   handlers (이 모듈) - Start → Delegate → 결과     ← Application Layer
//! ├─────────────────────────────────────────────┤
//!   repositories::contracts - 유스케이스별 trait     ← Repository Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## 공통 흐름
//!
//! 모든 핸들러는 [`pipeline::execute`](crate::core::pipeline::execute)를 거칩니다.
//!
//! - 성공 값은 그대로 [`SuccessEnvelope`](crate::domain::dto::common::SuccessEnvelope)에 담깁니다.
//! - 리포지토리의 도메인 오류는 그대로 반환됩니다. 예외는 계정 삭제의 일반 실패
//!   (`Account.DeletionFailed`로 변환) 하나뿐입니다.
//! - 장애와 panic은 critical 로그 한 건 후 `General.Unexpected`가 됩니다.
//!
//! ## 핸들러 목록
//!
//! | 핸들러 | 리포지토리 호출 | 성공 메시지 |
//! |--------|-----------------|-------------|
//! | [`CreateAccountHandler`] | `create_account` | Account created successfully |
//! | [`DeleteAccountHandler`] | `delete_account` | Account deleted successfully |
//! | [`GetAccountHandler`] | `get_account` | Account retrieved successfully |
//! | [`UpdateAccountHandler`] | `update_account` | Account updated successfully |
//! | [`ChangeAccountStatusHandler`] | `set_account_status` | Account activated / deactivated |
//! | [`ResetPasswordHandler`] | `reset_password` | Password reset successfully |
//! | [`ResendEmailHandler`] | `regenerate_confirmation` | Confirmation email sent |
//! | [`ConfirmEmailHandler`] | `confirm_email` | Email confirmed successfully |
//! | [`LoginHandler`] | `login` | Login successful |
//! | [`RefreshTokenHandler`] | `refresh_token` | Token refreshed successfully |
//! | [`GetPagedAuditsHandler`] | `get_paged_audits` | (페이지 응답) |

pub mod accounts;
pub mod audits;
pub mod auth;

pub use accounts::{
    ChangeAccountStatusHandler, ConfirmEmailHandler, CreateAccountHandler, DeleteAccountHandler,
    GetAccountHandler, ResendEmailHandler, ResetPasswordHandler, UpdateAccountHandler,
};
pub use audits::GetPagedAuditsHandler;
pub use auth::{LoginHandler, RefreshTokenHandler};

use crate::core::result::ErrorDetail;
use crate::domain::models::ConfirmationEmailEvent;
use crate::services::messaging::EventPublisher;

/// 주요 작업이 성공한 뒤 확인 이메일 이벤트를 한 번 발행합니다.
///
/// 재시도하지 않습니다. 실패하면 요청 자체의 `Event.PublishFailed` 오류가 됩니다.
pub(crate) async fn publish_confirmation(
    publisher: &dyn EventPublisher,
    event: &ConfirmationEmailEvent,
) -> Result<(), ErrorDetail> {
    publisher.publish(event).await.map_err(|e| {
        log::error!("확인 이메일 이벤트 발행 실패 - user_id: {}, error: {}", event.user_id, e);
        ErrorDetail::failure(
            "Event.PublishFailed",
            "The confirmation email could not be queued",
        )
    })
}
