//! 유스케이스별 리포지토리 계약
//!
//! 하나의 거대한 계정 리포지토리 인터페이스 대신, 핸들러 하나가 필요로 하는
//! 동작 하나씩을 별도 trait로 나눴습니다. 핸들러는 자신이 쓰는 trait 객체만 받습니다.
//!
//! ## 반환 규약
//!
//! | 반환 | 의미 |
//! |------|------|
//! | `Ok(ErrorOr::Value(v))` | 성공 |
//! | `Ok(ErrorOr::Errors(e))` | 예상된 도메인 오류 (`User.NotFound` 등) |
//! | `Err(AppError::Cancelled)` | 취소 신호로 중단 |
//! | `Err(AppError::..)` | 장애 (DB 연결 실패 등) - 핸들러 경계에서 `Unexpected`로 변환 |

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use crate::core::errors::AppResult;
use crate::core::result::ErrorOr;
use crate::domain::dto::accounts::{
    AccountIdRequest, AccountRegistration, AccountResponse, ChangeAccountStatusRequest,
    ConfirmEmailRequest, ConfirmationTicket, CreateAccountRequest, ResendEmailRequest,
    ResetPasswordRequest, UpdateAccountRequest,
};
use crate::domain::dto::audits::AuditResponse;
use crate::domain::dto::auth::{AuthenticationResponse, LoginRequest, RefreshTokenRequest};
use crate::domain::models::paging::{PagedList, PagingParameters};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCreator: Send + Sync {
    /// 계정을 만들고 첫 인증 코드를 발급합니다.
    async fn create_account(
        &self,
        request: CreateAccountRequest,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<AccountRegistration>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountReader: Send + Sync {
    async fn get_account(
        &self,
        request: AccountIdRequest,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<AccountResponse>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRemover: Send + Sync {
    async fn delete_account(
        &self,
        request: AccountIdRequest,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<()>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountUpdater: Send + Sync {
    async fn update_account(
        &self,
        request: UpdateAccountRequest,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<AccountResponse>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountStatusChanger: Send + Sync {
    async fn set_account_status(
        &self,
        request: ChangeAccountStatusRequest,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<AccountResponse>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(
        &self,
        request: LoginRequest,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<AuthenticationResponse>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh_token(
        &self,
        request: RefreshTokenRequest,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<AuthenticationResponse>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordResetter: Send + Sync {
    async fn reset_password(
        &self,
        request: ResetPasswordRequest,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<()>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationResender: Send + Sync {
    /// 새 인증 코드를 발급합니다. 이메일 발송은 호출자가 이벤트로 처리합니다.
    async fn regenerate_confirmation(
        &self,
        request: ResendEmailRequest,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<ConfirmationTicket>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailConfirmer: Send + Sync {
    async fn confirm_email(
        &self,
        request: ConfirmEmailRequest,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<AccountResponse>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditReader: Send + Sync {
    async fn get_paged_audits(
        &self,
        paging: PagingParameters,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<PagedList<AuditResponse>>>;
}
