//! 계정 서비스 백엔드
//!
//! 계정 생성, 이메일 확인, 로그인/토큰 갱신, 계정 관리와 감사 로그 조회를 제공하는
//! Actix-web 기반 서비스입니다.
//!
//! # Features
//!
//! - **계정 관리**: 생성, 조회, 수정, 삭제, 활성 상태 전환, 비밀번호 재설정
//! - **이메일 확인**: 확인 이벤트 발행과 백그라운드 소비자의 메일 발송
//! - **JWT 인증**: HS256 액세스/리프레시 토큰
//! - **감사 로그**: 계정 변경마다 이전/이후 스냅샷 기록, 페이지 조회
//! - **파이프라인**: 모든 유스케이스에 공통 검증, 로깅, 취소, 예외 격리 적용
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트, 인증 미들웨어
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   Validation    │ ← 요청 검증 게이트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 파이프라인 (로깅, 취소, 오류 격리)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 계정/토큰/메시징 로직
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← 메모리 또는 MongoDB + Redis 캐시
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use account_service_backend::core::HandlerRegistry;
//! use account_service_backend::validation::dispatch;
//!
//! let registry = HandlerRegistry::compose(identity, audits, publisher, logger);
//! let outcome = dispatch(&registry.login, request, &token).await;
//! ```

pub mod caching;
pub mod config;
pub mod core;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod validation;
