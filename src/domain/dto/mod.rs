//! # Data Transfer Objects (DTO) Module
//!
//! API 경계에서 주고받는 데이터 계약입니다. 요청 DTO는 `validator` derive로
//! 규칙을 선언하고 [`ValidatedRequest`](crate::validation::ValidatedRequest)로 필드 순서를 밝힙니다.
//!
//! ## 모듈 구조
//!
//! ```text
//! dto/
//! ├── accounts/   # 계정 생성, 조회, 수정, 삭제, 비밀번호 재설정, 이메일 확인
//! ├── auth/       # 로그인, 토큰 갱신
//! ├── audits/     # 감사 로그 응답
//! └── common.rs   # 성공 응답 봉투, 요청 출처
//! ```
//!
//! ## 검증 규칙 예시
//!
//! ```rust,ignore
//! #[derive(Debug, Deserialize, Validate)]
//! pub struct ResetPasswordRequest {
//!     #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
//!     pub new_password: String,
//!
//!     #[validate(must_match(other = "new_password", message = "Confirm new password must match new password"))]
//!     pub confirm_new_password: String,
//! }
//! ```
//!
//! 요청 DTO는 본문에서 역직렬화된 뒤 변경되지 않습니다. 경로 파라미터와 요청 출처는
//! 라우트가 구조체 생성 시점에 채웁니다.

pub mod accounts;
pub mod audits;
pub mod auth;
pub mod common;

pub use common::{PagedEnvelope, RequestOrigin, SuccessEnvelope};
