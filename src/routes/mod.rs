//! # HTTP Routes Module
//!
//! actix-web 엔드포인트와 라우트 구성을 담당합니다. 엔드포인트는 요청을 DTO로 바꾸고
//! 경로/출처 정보를 채운 뒤 [`validation::dispatch`](crate::validation::dispatch)로
//! 핸들러를 호출하고, 결과를 [`responses`]로 HTTP 응답에 매핑합니다.
//!
//! ## Route Groups
//!
//! ### Public 라우트 (인증 불필요)
//! - `GET /health`
//! - `POST /api/v1/accounts`, `/confirm-email`, `/resend-email`, `/reset-password`
//! - `POST /api/v1/auth/login`, `/refresh-token`
//!
//! ### Protected 라우트 (Bearer 토큰 필요)
//! - `GET | PUT | DELETE /api/v1/accounts/{user_id}` - 본인 또는 admin
//! - `PATCH /api/v1/accounts/{user_id}/status` - admin
//! - `GET /api/v1/audits` - admin
//!
//! # Examples
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//!
//! let app = App::new()
//!     .app_data(web::Data::new(registry))
//!     .app_data(web::Data::new(scopes))
//!     .app_data(web::Data::new(token_service))
//!     .configure(configure_all_routes);
//! ```

pub mod accounts;
pub mod audits;
pub mod auth;
pub mod responses;

use actix_web::{error, web, HttpRequest, HttpResponse};
use serde_json::json;
use crate::core::result::{ErrorDetail, ErrorList};
use crate::domain::dto::common::RequestOrigin;
use crate::domain::models::auth::authenticated_user::ADMIN_ROLE;
use crate::domain::models::AuthenticatedUser;
use crate::middlewares::AuthMiddleware;

pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());
    cfg.app_data(query_config());

    cfg.service(health_check);

    configure_account_routes(cfg);
    configure_auth_routes(cfg);
    configure_audit_routes(cfg);
}

/// 계정 라우트
///
/// 고정 경로(`/confirm-email` 등)를 `/{user_id}` 스코프보다 먼저 등록해야 합니다.
fn configure_account_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/accounts")
            .service(accounts::create_account)
            .service(accounts::confirm_email)
            .service(accounts::resend_email)
            .service(accounts::reset_password)
            .service(
                web::scope("/{user_id}")
                    .wrap(AuthMiddleware::required())
                    .service(accounts::get_account)
                    .service(accounts::update_account)
                    .service(accounts::delete_account)
                    .service(
                        web::scope("/status")
                            .wrap(AuthMiddleware::required_with_role(ADMIN_ROLE))
                            .service(accounts::change_account_status),
                    ),
            ),
    );
}

fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .service(auth::login)
            .service(auth::refresh_token),
    );
}

fn configure_audit_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/audits")
            .wrap(AuthMiddleware::required_with_role(ADMIN_ROLE))
            .service(audits::get_paged_audits),
    );
}

pub const MALFORMED_BODY: &str = "Request body is malformed";
pub const MALFORMED_QUERY: &str = "Query string is malformed";

/// 본문 역직렬화 실패도 검증 실패와 같은 형태로 응답합니다.
/// serde 진단 메시지는 debug 로그에만 남깁니다.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        log::debug!("요청 본문 해석 실패 ({}): {}", req.path(), err);
        let response = responses::validation_messages_response(vec![MALFORMED_BODY.to_string()]);
        error::InternalError::from_response(err, response).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, req| {
        log::debug!("쿼리 문자열 해석 실패 ({}): {}", req.path(), err);
        let response = responses::validation_messages_response(vec![MALFORMED_QUERY.to_string()]);
        error::InternalError::from_response(err, response).into()
    })
}

/// 감사 로그에 남길 요청 출처
pub(crate) fn request_origin(req: &HttpRequest, user: Option<&AuthenticatedUser>) -> RequestOrigin {
    let address = req.connection_info().realip_remote_addr().map(str::to_string);
    RequestOrigin::new(user.map(|u| u.user_id.clone()), address)
}

/// 다른 사람의 계정에 접근하려는 일반 사용자
pub(crate) fn forbidden_account_access(user: &AuthenticatedUser, account_id: &str) -> HttpResponse {
    log::warn!("계정 접근 거부 - 호출자: {}, 대상: {}", user.user_id, account_id);
    responses::error_response(&ErrorList::new(ErrorDetail::forbidden(
        "Auth.Forbidden",
        "You are not allowed to access this account",
    )))
}

#[actix_web::get("/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "account_service",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use tokio_util::sync::CancellationToken;
    use crate::config::{JwtSettings, PasswordSettings};
    use crate::core::cancellation::RequestScopes;
    use crate::core::telemetry::LogOperationLogger;
    use crate::core::HandlerRegistry;
    use crate::domain::entities::accounts::Account;
    use crate::repositories::{InMemoryAccountStore, InMemoryAuditLog};
    use crate::services::auth::TokenService;
    use crate::services::identity::IdentityService;
    use crate::services::messaging::{EventSource, InMemoryEventBus};

    fn jwt_settings() -> JwtSettings {
        JwtSettings {
            secret: "a-test-secret-that-is-long-enough-123".to_string(),
            issuer: "account-service".to_string(),
            audience: "account-service-clients".to_string(),
            access_token_minutes: 15,
            refresh_token_days: 7,
        }
    }

    struct TestState {
        registry: web::Data<HandlerRegistry>,
        scopes: web::Data<RequestScopes>,
        tokens: web::Data<TokenService>,
        bus: Arc<InMemoryEventBus>,
    }

    fn state() -> TestState {
        let tokens = Arc::new(TokenService::new(jwt_settings()));
        let audit_log = Arc::new(InMemoryAuditLog::new());
        let identity = Arc::new(IdentityService::new(
            Arc::new(InMemoryAccountStore::new()),
            audit_log.clone(),
            tokens,
            PasswordSettings { bcrypt_cost: 4 },
        ));
        let bus = Arc::new(InMemoryEventBus::new(16));
        let registry = HandlerRegistry::compose(identity, audit_log, bus.clone(), Arc::new(LogOperationLogger));

        TestState {
            registry: web::Data::new(registry),
            scopes: web::Data::new(RequestScopes::new(CancellationToken::new(), Duration::from_secs(5))),
            tokens: web::Data::new(TokenService::new(jwt_settings())),
            bus,
        }
    }

    fn bearer(tokens: &TokenService, id: &str, roles: &[&str]) -> String {
        let mut account = Account::new(
            "Test Caller".to_string(),
            "caller".to_string(),
            "caller@example.com".to_string(),
            "0123456789".to_string(),
            "hash".to_string(),
        );
        account.id = id.to_string();
        account.roles = roles.iter().map(|r| r.to_string()).collect();
        format!("Bearer {}", tokens.generate_access_token(&account).unwrap())
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state.registry.clone())
                    .app_data($state.scopes.clone())
                    .app_data($state.tokens.clone())
                    .configure(configure_all_routes),
            )
            .await
        };
    }

    fn create_body(full_name: &str) -> serde_json::Value {
        json!({
            "full_name": full_name,
            "username": "ana",
            "email": "ana@example.com",
            "phone_number": "0123456789",
            "password": "secret1",
            "confirm_password": "secret1"
        })
    }

    #[actix_web::test]
    async fn test_health() {
        let state = state();
        let app = app!(state);

        let response = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_create_account_returns_created_and_queues_email() {
        let state = state();
        let app = app!(state);

        let request = test::TestRequest::post()
            .uri("/api/v1/accounts")
            .set_json(create_body("Ana Lima"))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["message"], "Account created successfully");
        assert_eq!(body["item"]["email"], "ana@example.com");
        assert!(body["item"].get("password_hash").is_none());

        let delivery = state.bus.receive(&CancellationToken::new()).await.unwrap().unwrap();
        assert_eq!(delivery.event.email, "ana@example.com");
    }

    #[actix_web::test]
    async fn test_empty_full_name_is_rejected() {
        let state = state();
        let app = app!(state);

        let request = test::TestRequest::post()
            .uri("/api/v1/accounts")
            .set_json(create_body(""))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(
            body,
            json!({ "title": "Validation failed", "status": 400, "errors": ["Full name is required"] })
        );
    }

    #[actix_web::test]
    async fn test_malformed_json_is_validation_failure() {
        let state = state();
        let app = app!(state);

        let request = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{ not json")
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(
            body,
            json!({ "title": "Validation failed", "status": 400, "errors": [MALFORMED_BODY] })
        );
    }

    #[actix_web::test]
    async fn test_malformed_query_hides_parser_details() {
        let state = state();
        let app = app!(state);

        let request = test::TestRequest::get()
            .uri("/api/v1/audits?page_size=many")
            .insert_header(("Authorization", bearer(&state.tokens, "admin-1", &["admin"])))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["errors"], json!([MALFORMED_QUERY]));
        assert!(!body.to_string().contains("invalid digit"));
    }

    #[actix_web::test]
    async fn test_unknown_user_is_not_found() {
        let state = state();
        let app = app!(state);

        let request = test::TestRequest::get()
            .uri("/api/v1/accounts/does-not-exist")
            .insert_header(("Authorization", bearer(&state.tokens, "admin-1", &["user", "admin"])))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["errors"][0]["code"], "User.NotFound");
        assert_eq!(body["errors"][0]["kind"], "NotFound");
    }

    #[actix_web::test]
    async fn test_other_users_account_is_forbidden() {
        let state = state();
        let app = app!(state);

        let request = test::TestRequest::get()
            .uri("/api/v1/accounts/someone-else")
            .insert_header(("Authorization", bearer(&state.tokens, "u1", &["user"])))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_account_routes_require_token() {
        let state = state();
        let app = app!(state);

        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/accounts/u1").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_audits_require_admin() {
        let state = state();
        let app = app!(state);

        let request = test::TestRequest::get()
            .uri("/api/v1/audits")
            .insert_header(("Authorization", bearer(&state.tokens, "u1", &["user"])))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let request = test::TestRequest::get()
            .uri("/api/v1/audits?page_size=5&page_number=1&sort_descending=true")
            .insert_header(("Authorization", bearer(&state.tokens, "admin-1", &["admin"])))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["metadata"]["page_size"], 5);
    }

    #[actix_web::test]
    async fn test_two_segment_refresh_token_is_rejected() {
        let state = state();
        let app = app!(state);

        let request = test::TestRequest::post()
            .uri("/api/v1/auth/refresh-token")
            .set_json(json!({
                "access_token": "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxIn0",
                "refresh_token": "opaque"
            }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["errors"], json!(["Access token must be a valid JWT"]));
    }
}
