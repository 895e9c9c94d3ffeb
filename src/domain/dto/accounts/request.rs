use serde::Deserialize;
use validator::Validate;
use crate::domain::dto::common::RequestOrigin;
use crate::domain::entities::accounts::AccountChanges;
use crate::validation::{ValidatedRequest, NO_WHITESPACE_RE, PHONE_NUMBER_RE, VERIFICATION_CODE_RE};

/// 계정 생성 요청
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,

    #[validate(length(min = 1, message = "Username is required"))]
    #[validate(regex(path = *NO_WHITESPACE_RE, message = "Username must not contain spaces"))]
    pub username: String,

    #[validate(length(min = 1, message = "Email is required"))]
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,

    #[validate(regex(path = *PHONE_NUMBER_RE, message = "Phone number must be exactly 10 digits"))]
    pub phone_number: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[validate(regex(path = *NO_WHITESPACE_RE, message = "Password must not contain spaces"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Confirm password must match password"))]
    pub confirm_password: String,

    #[serde(skip)]
    pub origin: RequestOrigin,
}

impl ValidatedRequest for CreateAccountRequest {
    const FIELD_ORDER: &'static [&'static str] = &[
        "full_name",
        "username",
        "email",
        "phone_number",
        "password",
        "confirm_password",
    ];
}

/// 계정 ID 하나로 식별되는 요청 (조회, 삭제)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AccountIdRequest {
    #[validate(length(min = 1, message = "User id is required"))]
    pub user_id: String,

    #[serde(skip)]
    pub origin: RequestOrigin,
}

impl AccountIdRequest {
    pub fn new(user_id: impl Into<String>, origin: RequestOrigin) -> Self {
        Self {
            user_id: user_id.into(),
            origin,
        }
    }
}

impl ValidatedRequest for AccountIdRequest {
    const FIELD_ORDER: &'static [&'static str] = &["user_id"];
}

/// 비밀번호 재설정 요청 (현재 비밀번호 확인 후 변경)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    #[validate(regex(path = *NO_WHITESPACE_RE, message = "New password must not contain spaces"))]
    pub new_password: String,

    #[validate(must_match(other = "new_password", message = "Confirm new password must match new password"))]
    pub confirm_new_password: String,

    #[serde(skip)]
    pub origin: RequestOrigin,
}

impl ValidatedRequest for ResetPasswordRequest {
    const FIELD_ORDER: &'static [&'static str] =
        &["email", "current_password", "new_password", "confirm_new_password"];
}

/// 확인 이메일 재전송 요청
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResendEmailRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
}

impl ValidatedRequest for ResendEmailRequest {
    const FIELD_ORDER: &'static [&'static str] = &["email"];
}

/// 이메일 확인 요청 (확인 링크의 userId, code)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConfirmEmailRequest {
    #[validate(length(min = 1, message = "User id is required"))]
    pub user_id: String,

    #[validate(regex(path = *VERIFICATION_CODE_RE, message = "Verification code must be 6 digits"))]
    pub verification_code: String,

    #[serde(skip)]
    pub origin: RequestOrigin,
}

impl ValidatedRequest for ConfirmEmailRequest {
    const FIELD_ORDER: &'static [&'static str] = &["user_id", "verification_code"];
}

/// 계정 정보 부분 수정 요청
///
/// `user_id`는 경로에서 채워집니다.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    #[serde(default, skip_deserializing)]
    #[validate(length(min = 1, message = "User id is required"))]
    pub user_id: String,

    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: Option<String>,

    #[validate(length(min = 1, message = "Username is required"))]
    #[validate(regex(path = *NO_WHITESPACE_RE, message = "Username must not contain spaces"))]
    pub username: Option<String>,

    #[validate(regex(path = *PHONE_NUMBER_RE, message = "Phone number must be exactly 10 digits"))]
    pub phone_number: Option<String>,

    #[serde(skip)]
    pub origin: RequestOrigin,
}

impl UpdateAccountRequest {
    pub fn changes(&self) -> AccountChanges {
        AccountChanges {
            full_name: self.full_name.clone(),
            username: self.username.clone(),
            phone_number: self.phone_number.clone(),
        }
    }
}

impl ValidatedRequest for UpdateAccountRequest {
    const FIELD_ORDER: &'static [&'static str] = &["user_id", "full_name", "username", "phone_number"];
}

/// 계정 활성/비활성 전환 요청 (관리자)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangeAccountStatusRequest {
    #[serde(default, skip_deserializing)]
    #[validate(length(min = 1, message = "User id is required"))]
    pub user_id: String,

    pub is_active: bool,

    #[serde(skip)]
    pub origin: RequestOrigin,
}

impl ValidatedRequest for ChangeAccountStatusRequest {
    const FIELD_ORDER: &'static [&'static str] = &["user_id"];
}
