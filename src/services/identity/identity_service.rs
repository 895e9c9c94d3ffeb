//! # Identity Service
//!
//! 계정 유스케이스 trait 전부를 [`AccountStore`] 위에서 구현합니다.
//!
//! ## 동작 규칙
//!
//! - 예상된 실패(중복, 미존재, 잘못된 자격 증명)는 `Ok(ErrorOr::Errors)`로 반환합니다.
//! - 각 단계 사이에서 취소 토큰을 확인하고, 취소되었으면 `Err(AppError::Cancelled)`를 반환합니다.
//! - 변경 작업이 성공하면 감사 로그를 한 건 기록합니다. 감사 로그 기록 실패는
//!   error 로그만 남기고 요청 결과를 바꾸지 않습니다.
//! - 로그인 식별자에 `@`가 있으면 이메일, 없으면 사용자명으로 조회합니다.

use std::sync::Arc;
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use crate::config::PasswordSettings;
use crate::core::errors::{AppError, AppResult};
use crate::core::result::ErrorOr;
use crate::domain::dto::accounts::{
    AccountIdRequest, AccountRegistration, AccountResponse, ChangeAccountStatusRequest,
    ConfirmEmailRequest, ConfirmationTicket, CreateAccountRequest, ResendEmailRequest,
    ResetPasswordRequest, UpdateAccountRequest,
};
use crate::domain::dto::auth::{AuthenticationResponse, LoginRequest, RefreshTokenRequest};
use crate::domain::dto::common::RequestOrigin;
use crate::domain::entities::accounts::Account;
use crate::domain::entities::audits::{AuditAction, AuditTrail, AuditTrailBuilder};
use crate::repositories::{
    AccountCreator, AccountReader, AccountRemover, AccountStatusChanger, AccountStore,
    AccountUpdater, AuditWriter, Authenticator, ConfirmationResender, EmailConfirmer,
    PasswordResetter, TokenRefresher,
};
use crate::services::auth::TokenService;
use super::account_errors;
use super::password::{hash_password, verify_password};

const ACCOUNTS_TABLE: &str = "accounts";

pub struct IdentityService {
    store: Arc<dyn AccountStore>,
    audit: Arc<dyn AuditWriter>,
    tokens: Arc<TokenService>,
    password: PasswordSettings,
}

/// 취소되었으면 `Err(AppError::Cancelled)`
fn ensure_not_cancelled(cancel: &CancellationToken) -> AppResult<()> {
    if cancel.is_cancelled() {
        Err(AppError::Cancelled)
    } else {
        Ok(())
    }
}

/// 감사 로그에 남길 계정 스냅샷 (비밀 값 제외)
fn snapshot(account: &Account) -> Value {
    serde_json::to_value(AccountResponse::from(account)).unwrap_or_default()
}

/// 스냅샷에서 지정한 컬럼만 남깁니다.
fn pick(snapshot: &Value, columns: &[String]) -> Value {
    let picked: Map<String, Value> = columns
        .iter()
        .filter_map(|column| {
            snapshot
                .get(column)
                .map(|value| (column.clone(), value.clone()))
        })
        .collect();
    Value::Object(picked)
}

impl IdentityService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        audit: Arc<dyn AuditWriter>,
        tokens: Arc<TokenService>,
        password: PasswordSettings,
    ) -> Self {
        Self { store, audit, tokens, password }
    }

    async fn record_audit(&self, trail: AuditTrail) {
        let action = trail.action();
        let actor = trail.actor().to_string();

        if let Err(e) = self.audit.record(trail).await {
            log::error!(
                "감사 로그 기록 실패 - action: {}, actor: {}, error: {}",
                action.as_str(), actor, e
            );
        }
    }

    fn audit_builder(
        &self,
        origin: &RequestOrigin,
        subject_id: &str,
        action: AuditAction,
    ) -> AuditTrailBuilder {
        AuditTrail::builder(origin.actor_or(subject_id), action, ACCOUNTS_TABLE)
            .origin_address(origin.address.clone())
    }

    /// 사용자명 또는 이메일로 계정을 찾습니다.
    async fn find_for_login(&self, identifier: &str) -> AppResult<Option<Account>> {
        if identifier.contains('@') {
            self.store.find_by_email(identifier).await
        } else {
            self.store.find_by_username(identifier).await
        }
    }

    /// 새 토큰을 발급하고 리프레시 토큰 해시를 저장합니다.
    async fn issue_tokens(&self, mut account: Account) -> AppResult<ErrorOr<AuthenticationResponse>> {
        let issued = self.tokens.generate_token_pair(&account)?;
        account.store_refresh_token(&issued.pair.refresh_token, issued.refresh_expires_at);

        if let Some(error) = account_errors::from_write(self.store.save(&account).await?) {
            return Ok(error.into());
        }

        Ok(ErrorOr::Value(AuthenticationResponse::new(
            AccountResponse::from(&account),
            issued.pair,
        )))
    }
}

#[async_trait]
impl AccountCreator for IdentityService {
    async fn create_account(
        &self,
        request: CreateAccountRequest,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<AccountRegistration>> {
        if self.store.find_by_email(&request.email).await?.is_some() {
            return Ok(account_errors::duplicate_email().into());
        }
        if self.store.find_by_username(&request.username).await?.is_some() {
            return Ok(account_errors::duplicate_username().into());
        }
        ensure_not_cancelled(cancel)?;

        let password_hash = hash_password(request.password, self.password.bcrypt_cost).await?;
        ensure_not_cancelled(cancel)?;

        let mut account = Account::new(
            request.full_name,
            request.username,
            request.email,
            request.phone_number,
            password_hash,
        );
        let verification_code = account.issue_verification_code();

        // 사전 확인 이후 경쟁 요청이 같은 값을 먼저 쓴 경우에도 고유 인덱스가 막습니다
        if let Some(error) = account_errors::from_write(self.store.insert(&account).await?) {
            return Ok(error.into());
        }

        let trail = self
            .audit_builder(&request.origin, &account.id, AuditAction::Create)
            .new_values(snapshot(&account))
            .build();
        self.record_audit(trail).await;

        log::info!("계정 생성 완료: {}", account.id);
        Ok(ErrorOr::Value(AccountRegistration {
            account: AccountResponse::from(&account),
            verification_code,
        }))
    }
}

#[async_trait]
impl AccountReader for IdentityService {
    async fn get_account(
        &self,
        request: AccountIdRequest,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<AccountResponse>> {
        ensure_not_cancelled(cancel)?;

        match self.store.view_by_id(&request.user_id).await? {
            Some(account) => Ok(ErrorOr::Value(AccountResponse::from(account))),
            None => Ok(account_errors::user_not_found().into()),
        }
    }
}

#[async_trait]
impl AccountRemover for IdentityService {
    async fn delete_account(
        &self,
        request: AccountIdRequest,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<()>> {
        let Some(account) = self.store.find_by_id(&request.user_id).await? else {
            return Ok(account_errors::user_not_found().into());
        };
        ensure_not_cancelled(cancel)?;

        if !self.store.delete(&account.id).await? {
            return Ok(account_errors::delete_not_applied().into());
        }

        let trail = self
            .audit_builder(&request.origin, &account.id, AuditAction::Delete)
            .old_values(snapshot(&account))
            .build();
        self.record_audit(trail).await;

        log::info!("계정 삭제 완료: {}", account.id);
        Ok(ErrorOr::Value(()))
    }
}

#[async_trait]
impl AccountUpdater for IdentityService {
    async fn update_account(
        &self,
        request: UpdateAccountRequest,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<AccountResponse>> {
        let Some(mut account) = self.store.find_by_id(&request.user_id).await? else {
            return Ok(account_errors::user_not_found().into());
        };
        ensure_not_cancelled(cancel)?;

        let before = snapshot(&account);
        let affected = account.update(request.changes());
        if affected.is_empty() {
            return Ok(ErrorOr::Value(AccountResponse::from(account)));
        }

        if let Some(error) = account_errors::from_write(self.store.save(&account).await?) {
            return Ok(error.into());
        }

        let after = snapshot(&account);
        let trail = self
            .audit_builder(&request.origin, &account.id, AuditAction::Update)
            .old_values(pick(&before, &affected))
            .new_values(pick(&after, &affected))
            .affected_columns(affected)
            .build();
        self.record_audit(trail).await;

        Ok(ErrorOr::Value(AccountResponse::from(account)))
    }
}

#[async_trait]
impl AccountStatusChanger for IdentityService {
    async fn set_account_status(
        &self,
        request: ChangeAccountStatusRequest,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<AccountResponse>> {
        let Some(mut account) = self.store.find_by_id(&request.user_id).await? else {
            return Ok(account_errors::user_not_found().into());
        };
        ensure_not_cancelled(cancel)?;

        let was_active = account.is_active;
        if request.is_active {
            account.activate();
        } else {
            account.deactivate();
        }

        if let Some(error) = account_errors::from_write(self.store.save(&account).await?) {
            return Ok(error.into());
        }

        let trail = self
            .audit_builder(&request.origin, &account.id, AuditAction::Update)
            .old_values(serde_json::json!({ "is_active": was_active }))
            .new_values(serde_json::json!({ "is_active": account.is_active }))
            .affected_columns(vec!["is_active".to_string()])
            .build();
        self.record_audit(trail).await;

        Ok(ErrorOr::Value(AccountResponse::from(account)))
    }
}

#[async_trait]
impl Authenticator for IdentityService {
    async fn login(
        &self,
        request: LoginRequest,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<AuthenticationResponse>> {
        let Some(account) = self.find_for_login(request.username.trim()).await? else {
            return Ok(account_errors::invalid_credentials().into());
        };
        ensure_not_cancelled(cancel)?;

        if !verify_password(request.password, account.password_hash.clone()).await? {
            return Ok(account_errors::invalid_credentials().into());
        }
        if !account.is_active {
            return Ok(account_errors::account_inactive().into());
        }
        ensure_not_cancelled(cancel)?;

        self.issue_tokens(account).await
    }
}

#[async_trait]
impl TokenRefresher for IdentityService {
    async fn refresh_token(
        &self,
        request: RefreshTokenRequest,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<AuthenticationResponse>> {
        let claims = match self.tokens.decode_allowing_expired(&request.access_token) {
            Ok(claims) => claims,
            Err(AppError::AuthenticationError(reason)) => {
                log::debug!("토큰 갱신 거부: {}", reason);
                return Ok(account_errors::invalid_refresh_token().into());
            }
            Err(e) => return Err(e),
        };

        let Some(account) = self.store.find_by_id(&claims.sub).await? else {
            return Ok(account_errors::invalid_refresh_token().into());
        };
        if !account.refresh_token_matches(&request.refresh_token) {
            return Ok(account_errors::invalid_refresh_token().into());
        }
        if !account.is_active {
            return Ok(account_errors::account_inactive().into());
        }
        ensure_not_cancelled(cancel)?;

        // 이전 리프레시 토큰은 새 토큰 저장과 함께 무효화됩니다
        self.issue_tokens(account).await
    }
}

#[async_trait]
impl PasswordResetter for IdentityService {
    async fn reset_password(
        &self,
        request: ResetPasswordRequest,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<()>> {
        let Some(mut account) = self.store.find_by_email(&request.email).await? else {
            return Ok(account_errors::invalid_credentials().into());
        };
        ensure_not_cancelled(cancel)?;

        if !verify_password(request.current_password, account.password_hash.clone()).await? {
            return Ok(account_errors::invalid_credentials().into());
        }
        ensure_not_cancelled(cancel)?;

        account.password_hash = hash_password(request.new_password, self.password.bcrypt_cost).await?;
        account.revoke_refresh_token();
        account.updated_at = chrono::Utc::now();
        ensure_not_cancelled(cancel)?;

        if let Some(error) = account_errors::from_write(self.store.save(&account).await?) {
            return Ok(error.into());
        }

        let trail = self
            .audit_builder(&request.origin, &account.id, AuditAction::Update)
            .affected_columns(vec!["password_hash".to_string()])
            .build();
        self.record_audit(trail).await;

        Ok(ErrorOr::Value(()))
    }
}

#[async_trait]
impl ConfirmationResender for IdentityService {
    async fn regenerate_confirmation(
        &self,
        request: ResendEmailRequest,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<ConfirmationTicket>> {
        let Some(mut account) = self.store.find_by_email(&request.email).await? else {
            return Ok(account_errors::user_not_found().into());
        };
        if account.email_confirmed {
            return Ok(account_errors::email_already_confirmed().into());
        }
        ensure_not_cancelled(cancel)?;

        let verification_code = account.issue_verification_code();
        if let Some(error) = account_errors::from_write(self.store.save(&account).await?) {
            return Ok(error.into());
        }

        Ok(ErrorOr::Value(ConfirmationTicket {
            user_id: account.id,
            email: account.email,
            verification_code,
        }))
    }
}

#[async_trait]
impl EmailConfirmer for IdentityService {
    async fn confirm_email(
        &self,
        request: ConfirmEmailRequest,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<AccountResponse>> {
        let Some(mut account) = self.store.find_by_id(&request.user_id).await? else {
            return Ok(account_errors::user_not_found().into());
        };
        if account.email_confirmed {
            return Ok(account_errors::email_already_confirmed().into());
        }
        if !account.confirm_email(&request.verification_code) {
            return Ok(account_errors::invalid_verification_code().into());
        }
        ensure_not_cancelled(cancel)?;

        if let Some(error) = account_errors::from_write(self.store.save(&account).await?) {
            return Ok(error.into());
        }

        let trail = self
            .audit_builder(&request.origin, &account.id, AuditAction::Update)
            .old_values(serde_json::json!({ "email_confirmed": false }))
            .new_values(serde_json::json!({ "email_confirmed": true }))
            .affected_columns(vec!["email_confirmed".to_string()])
            .build();
        self.record_audit(trail).await;

        Ok(ErrorOr::Value(AccountResponse::from(account)))
    }
}
