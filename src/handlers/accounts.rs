//! 계정 유스케이스 핸들러

use std::sync::Arc;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use crate::core::pipeline;
use crate::core::result::{ErrorDetail, ErrorKind, ErrorList, ErrorOr};
use crate::core::telemetry::OperationTelemetry;
use crate::domain::dto::accounts::{
    AccountIdRequest, AccountResponse, ChangeAccountStatusRequest, ConfirmEmailRequest,
    CreateAccountRequest, ResendEmailRequest, ResetPasswordRequest, UpdateAccountRequest,
};
use crate::domain::dto::common::SuccessEnvelope;
use crate::domain::models::ConfirmationEmailEvent;
use crate::repositories::{
    AccountCreator, AccountReader, AccountRemover, AccountStatusChanger, AccountUpdater,
    ConfirmationResender, EmailConfirmer, PasswordResetter,
};
use crate::services::messaging::EventPublisher;
use crate::validation::RequestHandler;
use super::publish_confirmation;

pub const ACCOUNT_CREATED: &str = "Account created successfully";
pub const ACCOUNT_DELETED: &str = "Account deleted successfully";
pub const ACCOUNT_RETRIEVED: &str = "Account retrieved successfully";
pub const ACCOUNT_UPDATED: &str = "Account updated successfully";
pub const ACCOUNT_ACTIVATED: &str = "Account activated";
pub const ACCOUNT_DEACTIVATED: &str = "Account deactivated";
pub const PASSWORD_RESET: &str = "Password reset successfully";
pub const CONFIRMATION_SENT: &str = "Confirmation email sent";
pub const EMAIL_CONFIRMED: &str = "Email confirmed successfully";

/// 계정 생성
///
/// 생성이 성공한 경우에만 확인 이메일 이벤트를 발행합니다.
pub struct CreateAccountHandler {
    creator: Arc<dyn AccountCreator>,
    publisher: Arc<dyn EventPublisher>,
    telemetry: OperationTelemetry,
}

impl CreateAccountHandler {
    pub const OPERATION: &'static str = "CreateAccount";

    pub fn new(
        creator: Arc<dyn AccountCreator>,
        publisher: Arc<dyn EventPublisher>,
        telemetry: OperationTelemetry,
    ) -> Self {
        Self { creator, publisher, telemetry }
    }
}

#[async_trait]
impl RequestHandler for CreateAccountHandler {
    type Request = CreateAccountRequest;
    type Response = SuccessEnvelope<AccountResponse>;

    async fn handle(
        &self,
        request: CreateAccountRequest,
        cancel: &CancellationToken,
    ) -> ErrorOr<Self::Response> {
        let subject = request.email.clone();

        pipeline::execute(&self.telemetry, &subject, cancel, async {
            let registration = match self.creator.create_account(request, cancel).await? {
                ErrorOr::Value(registration) => registration,
                ErrorOr::Errors(errors) => return Ok(ErrorOr::Errors(errors)),
            };

            let event = ConfirmationEmailEvent::new(
                registration.account.id.as_str(),
                registration.account.email.as_str(),
                registration.verification_code.as_str(),
            );
            if let Err(error) = publish_confirmation(self.publisher.as_ref(), &event).await {
                return Ok(error.into());
            }

            Ok(ErrorOr::Value(SuccessEnvelope::with_item(ACCOUNT_CREATED, registration.account)))
        })
        .await
    }
}

/// 계정 삭제
pub struct DeleteAccountHandler {
    remover: Arc<dyn AccountRemover>,
    telemetry: OperationTelemetry,
}

impl DeleteAccountHandler {
    pub const OPERATION: &'static str = "DeleteAccount";

    pub fn new(remover: Arc<dyn AccountRemover>, telemetry: OperationTelemetry) -> Self {
        Self { remover, telemetry }
    }
}

/// 저장소의 일반 실패를 삭제 전용 오류로 바꿉니다. 다른 분류는 그대로 둡니다.
fn translate_deletion_failure(errors: ErrorList) -> ErrorList {
    if errors.all_of_kind(ErrorKind::Failure) {
        ErrorList::new(ErrorDetail::failure("Account.DeletionFailed", "Account deletion failed"))
    } else {
        errors
    }
}

#[async_trait]
impl RequestHandler for DeleteAccountHandler {
    type Request = AccountIdRequest;
    type Response = SuccessEnvelope<()>;

    async fn handle(
        &self,
        request: AccountIdRequest,
        cancel: &CancellationToken,
    ) -> ErrorOr<Self::Response> {
        let subject = request.user_id.clone();

        pipeline::execute(&self.telemetry, &subject, cancel, async {
            let outcome = self.remover.delete_account(request, cancel).await?;
            Ok(outcome
                .map_errors(translate_deletion_failure)
                .map(|()| SuccessEnvelope::message_only(ACCOUNT_DELETED)))
        })
        .await
    }
}

pub struct GetAccountHandler {
    reader: Arc<dyn AccountReader>,
    telemetry: OperationTelemetry,
}

impl GetAccountHandler {
    pub const OPERATION: &'static str = "GetAccount";

    pub fn new(reader: Arc<dyn AccountReader>, telemetry: OperationTelemetry) -> Self {
        Self { reader, telemetry }
    }
}

#[async_trait]
impl RequestHandler for GetAccountHandler {
    type Request = AccountIdRequest;
    type Response = SuccessEnvelope<AccountResponse>;

    async fn handle(
        &self,
        request: AccountIdRequest,
        cancel: &CancellationToken,
    ) -> ErrorOr<Self::Response> {
        let subject = request.user_id.clone();

        pipeline::execute(&self.telemetry, &subject, cancel, async {
            let outcome = self.reader.get_account(request, cancel).await?;
            Ok(outcome.map(|account| SuccessEnvelope::with_item(ACCOUNT_RETRIEVED, account)))
        })
        .await
    }
}

pub struct UpdateAccountHandler {
    updater: Arc<dyn AccountUpdater>,
    telemetry: OperationTelemetry,
}

impl UpdateAccountHandler {
    pub const OPERATION: &'static str = "UpdateAccount";

    pub fn new(updater: Arc<dyn AccountUpdater>, telemetry: OperationTelemetry) -> Self {
        Self { updater, telemetry }
    }
}

#[async_trait]
impl RequestHandler for UpdateAccountHandler {
    type Request = UpdateAccountRequest;
    type Response = SuccessEnvelope<AccountResponse>;

    async fn handle(
        &self,
        request: UpdateAccountRequest,
        cancel: &CancellationToken,
    ) -> ErrorOr<Self::Response> {
        let subject = request.user_id.clone();

        pipeline::execute(&self.telemetry, &subject, cancel, async {
            let outcome = self.updater.update_account(request, cancel).await?;
            Ok(outcome.map(|account| SuccessEnvelope::with_item(ACCOUNT_UPDATED, account)))
        })
        .await
    }
}

/// 관리자 전용 활성/비활성 전환
pub struct ChangeAccountStatusHandler {
    changer: Arc<dyn AccountStatusChanger>,
    telemetry: OperationTelemetry,
}

impl ChangeAccountStatusHandler {
    pub const OPERATION: &'static str = "ChangeAccountStatus";

    pub fn new(changer: Arc<dyn AccountStatusChanger>, telemetry: OperationTelemetry) -> Self {
        Self { changer, telemetry }
    }
}

#[async_trait]
impl RequestHandler for ChangeAccountStatusHandler {
    type Request = ChangeAccountStatusRequest;
    type Response = SuccessEnvelope<AccountResponse>;

    async fn handle(
        &self,
        request: ChangeAccountStatusRequest,
        cancel: &CancellationToken,
    ) -> ErrorOr<Self::Response> {
        let subject = request.user_id.clone();
        let message = if request.is_active { ACCOUNT_ACTIVATED } else { ACCOUNT_DEACTIVATED };

        pipeline::execute(&self.telemetry, &subject, cancel, async {
            let outcome = self.changer.set_account_status(request, cancel).await?;
            Ok(outcome.map(|account| SuccessEnvelope::with_item(message, account)))
        })
        .await
    }
}

pub struct ResetPasswordHandler {
    resetter: Arc<dyn PasswordResetter>,
    telemetry: OperationTelemetry,
}

impl ResetPasswordHandler {
    pub const OPERATION: &'static str = "ResetPassword";

    pub fn new(resetter: Arc<dyn PasswordResetter>, telemetry: OperationTelemetry) -> Self {
        Self { resetter, telemetry }
    }
}

#[async_trait]
impl RequestHandler for ResetPasswordHandler {
    type Request = ResetPasswordRequest;
    type Response = SuccessEnvelope<()>;

    async fn handle(
        &self,
        request: ResetPasswordRequest,
        cancel: &CancellationToken,
    ) -> ErrorOr<Self::Response> {
        let subject = request.email.clone();

        pipeline::execute(&self.telemetry, &subject, cancel, async {
            let outcome = self.resetter.reset_password(request, cancel).await?;
            Ok(outcome.map(|()| SuccessEnvelope::message_only(PASSWORD_RESET)))
        })
        .await
    }
}

/// 확인 이메일 재전송
///
/// 새 인증 코드를 발급받은 뒤 이벤트를 발행합니다.
pub struct ResendEmailHandler {
    resender: Arc<dyn ConfirmationResender>,
    publisher: Arc<dyn EventPublisher>,
    telemetry: OperationTelemetry,
}

impl ResendEmailHandler {
    pub const OPERATION: &'static str = "ResendEmail";

    pub fn new(
        resender: Arc<dyn ConfirmationResender>,
        publisher: Arc<dyn EventPublisher>,
        telemetry: OperationTelemetry,
    ) -> Self {
        Self { resender, publisher, telemetry }
    }
}

#[async_trait]
impl RequestHandler for ResendEmailHandler {
    type Request = ResendEmailRequest;
    type Response = SuccessEnvelope<()>;

    async fn handle(
        &self,
        request: ResendEmailRequest,
        cancel: &CancellationToken,
    ) -> ErrorOr<Self::Response> {
        let subject = request.email.clone();

        pipeline::execute(&self.telemetry, &subject, cancel, async {
            let ticket = match self.resender.regenerate_confirmation(request, cancel).await? {
                ErrorOr::Value(ticket) => ticket,
                ErrorOr::Errors(errors) => return Ok(ErrorOr::Errors(errors)),
            };

            let event = ConfirmationEmailEvent::new(ticket.user_id, ticket.email, ticket.verification_code);
            if let Err(error) = publish_confirmation(self.publisher.as_ref(), &event).await {
                return Ok(error.into());
            }

            Ok(ErrorOr::Value(SuccessEnvelope::message_only(CONFIRMATION_SENT)))
        })
        .await
    }
}

pub struct ConfirmEmailHandler {
    confirmer: Arc<dyn EmailConfirmer>,
    telemetry: OperationTelemetry,
}

impl ConfirmEmailHandler {
    pub const OPERATION: &'static str = "ConfirmEmail";

    pub fn new(confirmer: Arc<dyn EmailConfirmer>, telemetry: OperationTelemetry) -> Self {
        Self { confirmer, telemetry }
    }
}

#[async_trait]
impl RequestHandler for ConfirmEmailHandler {
    type Request = ConfirmEmailRequest;
    type Response = SuccessEnvelope<AccountResponse>;

    async fn handle(
        &self,
        request: ConfirmEmailRequest,
        cancel: &CancellationToken,
    ) -> ErrorOr<Self::Response> {
        let subject = request.user_id.clone();

        pipeline::execute(&self.telemetry, &subject, cancel, async {
            let outcome = self.confirmer.confirm_email(request, cancel).await?;
            Ok(outcome.map(|account| SuccessEnvelope::with_item(EMAIL_CONFIRMED, account)))
        })
        .await
    }
}
