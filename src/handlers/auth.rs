//! 인증 유스케이스 핸들러 (로그인, 토큰 갱신)

use std::sync::Arc;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use crate::core::pipeline;
use crate::core::result::ErrorOr;
use crate::core::telemetry::OperationTelemetry;
use crate::domain::dto::auth::{AuthenticationResponse, LoginRequest, RefreshTokenRequest};
use crate::domain::dto::common::SuccessEnvelope;
use crate::repositories::{Authenticator, TokenRefresher};
use crate::validation::RequestHandler;

pub const LOGIN_SUCCEEDED: &str = "Login successful";
pub const TOKEN_REFRESHED: &str = "Token refreshed successfully";

/// 토큰 갱신 로그의 대상 식별자 (토큰 값은 로그에 남기지 않습니다)
const REFRESH_SUBJECT: &str = "refresh-token";

pub struct LoginHandler {
    authenticator: Arc<dyn Authenticator>,
    telemetry: OperationTelemetry,
}

impl LoginHandler {
    pub const OPERATION: &'static str = "Login";

    pub fn new(authenticator: Arc<dyn Authenticator>, telemetry: OperationTelemetry) -> Self {
        Self { authenticator, telemetry }
    }
}

#[async_trait]
impl RequestHandler for LoginHandler {
    type Request = LoginRequest;
    type Response = SuccessEnvelope<AuthenticationResponse>;

    async fn handle(
        &self,
        request: LoginRequest,
        cancel: &CancellationToken,
    ) -> ErrorOr<Self::Response> {
        let subject = request.username.clone();

        pipeline::execute(&self.telemetry, &subject, cancel, async {
            let outcome = self.authenticator.login(request, cancel).await?;
            Ok(outcome.map(|response| SuccessEnvelope::with_item(LOGIN_SUCCEEDED, response)))
        })
        .await
    }
}

/// 만료된 액세스 토큰 + 리프레시 토큰으로 새 토큰 쌍을 발급합니다.
pub struct RefreshTokenHandler {
    refresher: Arc<dyn TokenRefresher>,
    telemetry: OperationTelemetry,
}

impl RefreshTokenHandler {
    pub const OPERATION: &'static str = "RefreshToken";

    pub fn new(refresher: Arc<dyn TokenRefresher>, telemetry: OperationTelemetry) -> Self {
        Self { refresher, telemetry }
    }
}

#[async_trait]
impl RequestHandler for RefreshTokenHandler {
    type Request = RefreshTokenRequest;
    type Response = SuccessEnvelope<AuthenticationResponse>;

    async fn handle(
        &self,
        request: RefreshTokenRequest,
        cancel: &CancellationToken,
    ) -> ErrorOr<Self::Response> {
        pipeline::execute(&self.telemetry, REFRESH_SUBJECT, cancel, async {
            let outcome = self.refresher.refresh_token(request, cancel).await?;
            Ok(outcome.map(|response| SuccessEnvelope::with_item(TOKEN_REFRESHED, response)))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::result::{ErrorDetail, ErrorKind};
    use crate::core::telemetry::testing::recording;
    use crate::repositories::{MockAuthenticator, MockTokenRefresher};
    use crate::validation::{dispatch, Dispatch};

    #[tokio::test]
    async fn test_two_segment_access_token_never_reaches_repository() {
        let mut refresher = MockTokenRefresher::new();
        refresher.expect_refresh_token().times(0);

        let (telemetry, logger) = recording(RefreshTokenHandler::OPERATION);
        let handler = RefreshTokenHandler::new(Arc::new(refresher), telemetry);

        let request = RefreshTokenRequest {
            access_token: "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxIn0".to_string(),
            refresh_token: "opaque".to_string(),
        };
        let outcome = dispatch(&handler, request, &CancellationToken::new()).await;

        match outcome {
            Dispatch::Rejected(rejection) => assert_eq!(
                rejection.messages(),
                &["Access token must be a valid JWT".to_string()]
            ),
            other => panic!("expected rejection, got {:?}", other),
        }
        assert!(logger.entries().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_credentials_pass_through() {
        let mut authenticator = MockAuthenticator::new();
        authenticator.expect_login().times(1).returning(|_, _| {
            Ok(ErrorDetail::unauthorized("Auth.InvalidCredentials", "Invalid username or password").into())
        });

        let (telemetry, logger) = recording(LoginHandler::OPERATION);
        let handler = LoginHandler::new(Arc::new(authenticator), telemetry);

        let request = LoginRequest {
            username: "ana".to_string(),
            password: "wrong-password".to_string(),
        };
        let result = handler.handle(request, &CancellationToken::new()).await;

        let error = result.first_error().unwrap();
        assert_eq!(error.kind, ErrorKind::Unauthorized);
        assert_eq!(error.code, "Auth.InvalidCredentials");
        assert!(logger.critical_entries().is_empty());
    }
}
