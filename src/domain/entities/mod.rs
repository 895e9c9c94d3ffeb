//! # Domain Entities Module
//!
//! 저장소에 그대로 저장되는 핵심 엔티티입니다.
//!
//! ```text
//! Domain Layer
//! ├── entities/     ← 이 모듈 (Account, AuditTrail)
//! ├── models/       ← 값 객체 (페이징, 이벤트, 토큰, 인증 사용자)
//! └── dto/          ← 요청/응답 데이터 전송 객체
//! ```
//!
//! ## 저장 형식
//!
//! - `_id`는 UUID v4 문자열입니다. MongoDB와 인메모리 저장소가 같은 식별자를 씁니다.
//! - 시각은 `chrono::DateTime<Utc>`로 보관합니다.
//! - 엔티티는 HTTP 응답으로 직접 나가지 않습니다. 응답은 항상 DTO로 변환합니다
//!   (비밀번호 해시, 인증 코드 노출 방지).

pub mod accounts;
pub mod audits;

pub use accounts::*;
pub use audits::*;
