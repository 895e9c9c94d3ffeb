//! # Handler Registry
//!
//! 조립 시점에 모든 유스케이스 핸들러를 명시적으로 생성하는 레지스트리입니다.
//! 런타임 타입 탐색이나 전역 싱글톤 없이, `main`에서 한 번 [`HandlerRegistry::compose`]를
//! 호출해 만든 값을 `web::Data`로 공유합니다.
//!
//! ```text
//! IdentityService ─┬─▶ CreateAccountHandler ... ConfirmEmailHandler
//!                  ├─▶ LoginHandler, RefreshTokenHandler
//! AuditReader ─────┴─▶ GetPagedAuditsHandler
//! EventPublisher ──▶ CreateAccountHandler, ResendEmailHandler
//! OperationLogger ─▶ 핸들러마다 OperationTelemetry 하나
//! ```

use std::sync::Arc;
use crate::core::telemetry::{OperationLogger, OperationTelemetry};
use crate::handlers::{
    ChangeAccountStatusHandler, ConfirmEmailHandler, CreateAccountHandler, DeleteAccountHandler,
    GetAccountHandler, GetPagedAuditsHandler, LoginHandler, RefreshTokenHandler,
    ResendEmailHandler, ResetPasswordHandler, UpdateAccountHandler,
};
use crate::repositories::AuditReader;
use crate::services::identity::IdentityService;
use crate::services::messaging::EventPublisher;

/// 등록되는 작업 이름 (조립 순서)
pub const OPERATIONS: &[&str] = &[
    CreateAccountHandler::OPERATION,
    DeleteAccountHandler::OPERATION,
    GetAccountHandler::OPERATION,
    UpdateAccountHandler::OPERATION,
    ChangeAccountStatusHandler::OPERATION,
    ResetPasswordHandler::OPERATION,
    ResendEmailHandler::OPERATION,
    ConfirmEmailHandler::OPERATION,
    LoginHandler::OPERATION,
    RefreshTokenHandler::OPERATION,
    GetPagedAuditsHandler::OPERATION,
];

/// 조립된 핸들러 묶음
pub struct HandlerRegistry {
    pub create_account: CreateAccountHandler,
    pub delete_account: DeleteAccountHandler,
    pub get_account: GetAccountHandler,
    pub update_account: UpdateAccountHandler,
    pub change_account_status: ChangeAccountStatusHandler,
    pub reset_password: ResetPasswordHandler,
    pub resend_email: ResendEmailHandler,
    pub confirm_email: ConfirmEmailHandler,
    pub login: LoginHandler,
    pub refresh_token: RefreshTokenHandler,
    pub get_paged_audits: GetPagedAuditsHandler,
}

impl HandlerRegistry {
    /// 의존성을 받아 모든 핸들러를 생성합니다.
    ///
    /// 각 핸들러는 자기 작업 이름이 붙은 [`OperationTelemetry`]를 받습니다.
    pub fn compose(
        identity: Arc<IdentityService>,
        audits: Arc<dyn AuditReader>,
        publisher: Arc<dyn EventPublisher>,
        logger: Arc<dyn OperationLogger>,
    ) -> Self {
        let telemetry = |operation: &'static str| OperationTelemetry::new(operation, logger.clone());

        let registry = Self {
            create_account: CreateAccountHandler::new(
                identity.clone(),
                publisher.clone(),
                telemetry(CreateAccountHandler::OPERATION),
            ),
            delete_account: DeleteAccountHandler::new(identity.clone(), telemetry(DeleteAccountHandler::OPERATION)),
            get_account: GetAccountHandler::new(identity.clone(), telemetry(GetAccountHandler::OPERATION)),
            update_account: UpdateAccountHandler::new(identity.clone(), telemetry(UpdateAccountHandler::OPERATION)),
            change_account_status: ChangeAccountStatusHandler::new(
                identity.clone(),
                telemetry(ChangeAccountStatusHandler::OPERATION),
            ),
            reset_password: ResetPasswordHandler::new(identity.clone(), telemetry(ResetPasswordHandler::OPERATION)),
            resend_email: ResendEmailHandler::new(
                identity.clone(),
                publisher,
                telemetry(ResendEmailHandler::OPERATION),
            ),
            confirm_email: ConfirmEmailHandler::new(identity.clone(), telemetry(ConfirmEmailHandler::OPERATION)),
            login: LoginHandler::new(identity.clone(), telemetry(LoginHandler::OPERATION)),
            refresh_token: RefreshTokenHandler::new(identity, telemetry(RefreshTokenHandler::OPERATION)),
            get_paged_audits: GetPagedAuditsHandler::new(audits, telemetry(GetPagedAuditsHandler::OPERATION)),
        };

        log::info!("핸들러 {}개 등록 완료: {}", OPERATIONS.len(), OPERATIONS.join(", "));
        registry
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("operations", &OPERATIONS)
            .finish()
    }
}
