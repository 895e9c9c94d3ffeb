//! # Authentication HTTP Endpoints
//!
//! - `POST /api/v1/auth/login` - 사용자명(또는 이메일) + 비밀번호 로그인
//! - `POST /api/v1/auth/refresh-token` - 만료된 액세스 토큰 + 리프레시 토큰으로 재발급

use actix_web::http::StatusCode;
use actix_web::{post, web, HttpResponse};
use crate::core::cancellation::RequestScopes;
use crate::core::HandlerRegistry;
use crate::domain::dto::auth::{LoginRequest, RefreshTokenRequest};
use crate::validation::dispatch;
use super::responses::respond;

/// 로컬 로그인
///
/// ```bash
/// curl -X POST http://localhost:8080/api/v1/auth/login \
///   -H "Content-Type: application/json" \
///   -d '{"username":"ana","password":"secret1"}'
/// ```
#[post("/login")]
pub async fn login(
    registry: web::Data<HandlerRegistry>,
    scopes: web::Data<RequestScopes>,
    payload: web::Json<LoginRequest>,
) -> HttpResponse {
    let scope = scopes.begin();
    let outcome = dispatch(&registry.login, payload.into_inner(), scope.token()).await;
    respond(outcome, StatusCode::OK)
}

/// 토큰 재발급
///
/// 리프레시 토큰은 한 번 쓰면 교체됩니다 (회전).
#[post("/refresh-token")]
pub async fn refresh_token(
    registry: web::Data<HandlerRegistry>,
    scopes: web::Data<RequestScopes>,
    payload: web::Json<RefreshTokenRequest>,
) -> HttpResponse {
    let scope = scopes.begin();
    let outcome = dispatch(&registry.refresh_token, payload.into_inner(), scope.token()).await;
    respond(outcome, StatusCode::OK)
}
