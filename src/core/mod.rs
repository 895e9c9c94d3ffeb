//! # Core Framework Module
//!
//! 모든 유스케이스 핸들러가 공유하는 실행 기반입니다.
//!
//! ## 모듈 구성
//!
//! ### [`result`] - 도메인 결과 모델
//! - **ErrorOr**: 성공 값 또는 비어 있지 않은 오류 목록
//! - **ErrorKind**: HTTP 상태 코드 매핑의 기준이 되는 오류 분류
//!
//! ### [`errors`] - 장애 처리
//! - **AppError**: 인프라 장애 (thiserror)
//! - **HTTP 통합**: 미들웨어 경계용 Actix-Web `ResponseError` 구현
//!
//! ### [`pipeline`] - 핸들러 흐름
//! - Start → Delegate → Completed / Failed
//! - 장애와 panic을 한곳에서 잡아 critical 로그 한 건으로 남깁니다
//!
//! ### [`telemetry`] - 스코프 텔레메트리
//! - 핸들러마다 주입되는 `OperationTelemetry`
//!
//! ### [`cancellation`] - 요청 취소
//! - 서버 종료 토큰의 자식 토큰, 타임아웃과 연결 끊김 시 취소
//!
//! ### [`registry`] - 핸들러 조립
//! - `HandlerRegistry::compose`로 모든 핸들러를 명시적으로 생성
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! let registry = HandlerRegistry::compose(identity, audit_reader, publisher, Arc::new(LogOperationLogger));
//! let scopes = RequestScopes::new(shutdown.clone(), settings.server.request_timeout);
//!
//! App::new()
//!     .app_data(web::Data::new(registry))
//!     .app_data(web::Data::new(scopes))
//! ```

pub mod cancellation;
pub mod errors;
pub mod pipeline;
pub mod registry;
pub mod result;
pub mod telemetry;

pub use errors::*;
pub use registry::HandlerRegistry;
