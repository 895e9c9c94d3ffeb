//! # Domain Layer
//!
//! 엔티티, 값 객체, DTO를 모은 도메인 계층입니다.
//! 이 계층은 저장소나 HTTP 구현에 의존하지 않습니다.

pub mod dto;
pub mod entities;
pub mod models;
