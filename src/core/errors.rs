//! # Application Fault Handling
//!
//! 인프라 계층에서 발생하는 "장애"를 표현하는 에러 타입입니다.
//!
//! 도메인 오류(사용자 없음, 중복 이메일 등)는 [`ErrorOr`](crate::core::result::ErrorOr)
//! 값으로 반환되고, 이 모듈의 [`AppError`]는 데이터베이스 연결 실패, 외부 서비스 장애,
//! 취소처럼 "예상하지 못한" 상황만 담당합니다. 핸들러 경계([`pipeline`](crate::core::pipeline))에서
//! `AppError`는 로그로 남고 `Unexpected` 결과로 바뀌므로, 호출자에게 원본 메시지가
//! 전달되지 않습니다.
//!
//! ## HTTP 응답 매핑 (미들웨어/경계에서 직접 반환되는 경우)
//!
//! | AppError | HTTP Status |
//! |----------|-------------|
//! | `AuthenticationError` | 401 Unauthorized |
//! | `AuthorizationError` | 403 Forbidden |
//! | `Cancelled` | 503 Service Unavailable |
//! | 나머지 | 500 Internal Server Error |
//!
//! ## 에러 변환 패턴
//!
//! ```rust,ignore
//! // MongoDB 에러 변환
//! collection.find_one(filter).await
//!     .map_err(|e| AppError::DatabaseError(e.to_string()))?;
//!
//! // 컨텍스트와 함께 변환
//! serde_json::to_string(&event).context("이벤트 직렬화 실패")?;
//! ```

use thiserror::Error;

/// 애플리케이션 장애 타입
#[derive(Error, Debug)]
pub enum AppError {
    /// 데이터베이스 관련 에러
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis 관련 에러 (캐시, 메시지 큐)
    #[error("Redis error: {0}")]
    RedisError(String),

    /// 메시지 발행/수신 에러
    #[error("Messaging error: {0}")]
    MessagingError(String),

    /// 인증 실패 에러 (401 Unauthorized)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 권한 부족 에러 (403 Forbidden)
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// 외부 서비스 에러 (이메일 발송 서비스 등)
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 호출자의 취소 신호로 작업이 중단됨
    ///
    /// 일반 장애와 구분되어 critical이 아닌 "cancelled"로 기록됩니다.
    #[error("Operation cancelled")]
    Cancelled,

    /// 내부 서버 에러
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::RedisError(e.to_string())
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            AppError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 5xx 응답에는 내부 메시지를 싣지 않습니다. 서버 로그에만 자세한 내용을 남깁니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let status = self.status_code();
        let message = match self {
            AppError::AuthenticationError(msg) | AppError::AuthorizationError(msg) => msg.clone(),
            AppError::Cancelled => "The request was cancelled".to_string(),
            _ => {
                log::error!("처리되지 않은 장애가 HTTP 경계에 도달했습니다: {}", self);
                "An unexpected error occurred".to_string()
            }
        };

        actix_web::HttpResponse::build(status)
            .json(serde_json::json!({
                "title": message,
                "status": status.as_u16(),
            }))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::body::MessageBody;

    #[test]
    fn test_authentication_error_response() {
        let error = AppError::AuthenticationError("Invalid token".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_authorization_error_response() {
        let error = AppError::AuthorizationError("Insufficient permissions".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_internal_error_response_hides_details() {
        let error = AppError::DatabaseError("connection refused to 10.0.0.3:27017".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.into_body().try_into_bytes().unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("10.0.0.3"));
        assert!(text.contains("An unexpected error occurred"));
    }

    #[test]
    fn test_cancelled_is_distinguished() {
        assert!(AppError::Cancelled.is_cancelled());
        assert!(!AppError::InternalError("x".to_string()).is_cancelled());
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        assert!(app_result.is_err());
        if let Err(AppError::InternalError(msg)) = app_result {
            assert!(msg.contains("Additional context"));
            assert!(msg.contains("original error"));
        } else {
            panic!("Expected InternalError");
        }
    }
}
