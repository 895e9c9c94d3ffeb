//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 도메인별로 나뉘어 계정 생명주기, 토큰 발급, 확인 이메일 전달을 담당합니다.
//!
//! - [`identity`] - 계정 유스케이스 구현 ([`IdentityService`](identity::IdentityService))
//! - [`auth`] - JWT 액세스 토큰과 불투명 리프레시 토큰
//! - [`messaging`] - 확인 이메일 이벤트 발행/소비
//!
//! # Examples
//!
//! ```rust,ignore
//! let tokens = Arc::new(TokenService::new(settings.jwt.clone()));
//! let identity = Arc::new(IdentityService::new(store, audits, tokens, settings.password));
//! ```

pub mod auth;
pub mod identity;
pub mod messaging;
