//! # HTTP 응답 매핑
//!
//! 핸들러 결과([`Dispatch`])를 HTTP 응답으로 바꾸는 유일한 지점입니다.
//!
//! | ErrorKind | HTTP Status |
//! |-----------|-------------|
//! | `NotFound` | 404 Not Found |
//! | `Conflict` | 409 Conflict |
//! | `Validation`, `BadRequest` | 400 Bad Request |
//! | `Unprocessable` | 422 Unprocessable Entity |
//! | `Unauthorized` | 401 Unauthorized |
//! | `Forbidden` | 403 Forbidden |
//! | `Failure`, `Unexpected` | 500 Internal Server Error |
//! | `Failure` 중 `General.Cancelled` | 503 Service Unavailable |
//!
//! 대표 상태 코드는 첫 번째 오류의 분류로 정합니다. 취소는 분류가 `Failure`이지만
//! [`AppError::Cancelled`](crate::core::errors::AppError::Cancelled)와 같은 503으로 응답합니다.
//!
//! ```json
//! {
//!   "title": "Not Found",
//!   "status": 404,
//!   "errors": [{ "code": "User.NotFound", "description": "User was not found", "kind": "NotFound" }]
//! }
//! ```

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::json;
use crate::core::result::{ErrorKind, ErrorList, ErrorOr};
use crate::validation::{Dispatch, ValidationRejection};

pub const VALIDATION_TITLE: &str = "Validation failed";

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Validation | ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ErrorKind::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Failure | ErrorKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 오류 목록의 대표 상태 코드
pub fn status_for_errors(errors: &ErrorList) -> StatusCode {
    let first = errors.first();
    if first.is_cancelled() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        status_for(first.kind)
    }
}

/// 도메인 오류 목록 응답
pub fn error_response(errors: &ErrorList) -> HttpResponse {
    let status = status_for_errors(errors);

    HttpResponse::build(status).json(json!({
        "title": status.canonical_reason().unwrap_or("Error"),
        "status": status.as_u16(),
        "errors": errors,
    }))
}

/// 검증 실패 응답 (핸들러는 호출되지 않음)
pub fn validation_response(rejection: ValidationRejection) -> HttpResponse {
    validation_messages_response(rejection.into_messages())
}

pub fn validation_messages_response(messages: Vec<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "title": VALIDATION_TITLE,
        "status": StatusCode::BAD_REQUEST.as_u16(),
        "errors": messages,
    }))
}

/// 핸들러 결과를 응답으로 바꿉니다. 성공 시 `success` 상태 코드를 씁니다.
pub fn respond<T>(outcome: Dispatch<T>, success: StatusCode) -> HttpResponse
where
    T: Serialize,
{
    match outcome {
        Dispatch::Rejected(rejection) => validation_response(rejection),
        Dispatch::Handled(ErrorOr::Value(body)) => HttpResponse::build(success).json(body),
        Dispatch::Handled(ErrorOr::Errors(errors)) => error_response(&errors),
    }
}
