//! 계정/인증 도메인 오류
//!
//! 코드 문자열은 클라이언트 계약입니다. 바꾸지 마세요.

use crate::core::result::ErrorDetail;
use crate::repositories::WriteOutcome;

pub fn user_not_found() -> ErrorDetail {
    ErrorDetail::not_found("User.NotFound", "User was not found")
}

pub fn duplicate_email() -> ErrorDetail {
    ErrorDetail::conflict("User.DuplicateEmail", "Email is already in use")
}

pub fn duplicate_username() -> ErrorDetail {
    ErrorDetail::conflict("User.DuplicateUsername", "Username is already in use")
}

pub fn invalid_credentials() -> ErrorDetail {
    ErrorDetail::unauthorized("Auth.InvalidCredentials", "Invalid username or password")
}

pub fn account_inactive() -> ErrorDetail {
    ErrorDetail::forbidden("Auth.AccountInactive", "Account is deactivated")
}

pub fn invalid_refresh_token() -> ErrorDetail {
    ErrorDetail::unauthorized("Auth.InvalidRefreshToken", "Refresh token is invalid or expired")
}

pub fn email_already_confirmed() -> ErrorDetail {
    ErrorDetail::conflict("Account.EmailAlreadyConfirmed", "Email is already confirmed")
}

pub fn invalid_verification_code() -> ErrorDetail {
    ErrorDetail::unprocessable("Account.InvalidVerificationCode", "Verification code is invalid or expired")
}

/// 조회 직후 다른 요청이 계정을 지운 경우
pub fn delete_not_applied() -> ErrorDetail {
    ErrorDetail::failure("User.DeleteNotApplied", "Account was not removed from the store")
}

/// 쓰기 결과를 도메인 오류로 바꿉니다. 성공이면 `None`.
pub fn from_write(outcome: WriteOutcome) -> Option<ErrorDetail> {
    match outcome {
        WriteOutcome::Written => None,
        WriteOutcome::NotFound => Some(user_not_found()),
        WriteOutcome::DuplicateEmail => Some(duplicate_email()),
        WriteOutcome::DuplicateUsername => Some(duplicate_username()),
    }
}
