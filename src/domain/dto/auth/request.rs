use serde::Deserialize;
use validator::Validate;
use crate::validation::{validate_jwt_shape, ValidatedRequest};

/// 로그인 요청
///
/// `username`에는 사용자명 또는 이메일을 넣을 수 있습니다.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username or email is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl ValidatedRequest for LoginRequest {
    const FIELD_ORDER: &'static [&'static str] = &["username", "password"];
}

/// 토큰 갱신 요청
///
/// 만료된 액세스 토큰과 리프레시 토큰을 함께 보냅니다.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(custom(function = "validate_jwt_shape"))]
    pub access_token: String,

    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

impl ValidatedRequest for RefreshTokenRequest {
    const FIELD_ORDER: &'static [&'static str] = &["access_token", "refresh_token"];
}
