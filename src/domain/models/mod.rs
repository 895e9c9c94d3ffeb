//! # Domain Models Module
//!
//! 식별자보다 값 자체가 중요한 값 객체들입니다.
//!
//! ## Entities vs Models
//!
//! | 구분 | 위치 | 예시 |
//! |------|------|------|
//! | 영속 엔티티 | `../entities/` | `Account`, `AuditTrail` |
//! | 값 객체 | `./` (이 모듈) | `PagingParameters`, `ConfirmationEmailEvent`, `TokenPair` |
//!
//! ## 모듈 구성
//!
//! - [`paging`] - 페이징 파라미터, 페이지 메타데이터, `PagedList<T>`
//! - [`events`] - 확인 이메일 이벤트
//! - [`token`] - JWT 클레임과 토큰 쌍
//! - [`auth`] - 인증된 호출자, 인증 모드/요구 역할

pub mod auth;
pub mod events;
pub mod paging;
pub mod token;

pub use auth::{AuthMode, AuthenticatedUser, RequiredRole};
pub use events::ConfirmationEmailEvent;
pub use paging::{PageMetadata, PagedList, PagingParameters};
pub use token::{TokenClaims, TokenPair};
