//! 인증 토큰 서비스 모듈
//!
//! # Security
//!
//! - HMAC-SHA256 액세스 토큰 서명, 발급자/대상 검증
//! - 리프레시 토큰은 평문으로 저장하지 않습니다 (SHA-256 해시만 계정에 보관)
//! - 토큰 만료 시간 관리

pub mod token_service;

pub use token_service::{IssuedTokens, TokenService};
