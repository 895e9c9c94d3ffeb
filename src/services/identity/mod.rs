//! 계정/인증 유스케이스 서비스
//!
//! [`IdentityService`]가 `repositories::contracts`의 계정 관련 trait를 모두 구현합니다.

pub mod account_errors;
pub mod identity_service;
pub mod password;

pub use identity_service::IdentityService;
