//! 감사 로그 DTO
//!
//! 조회 요청은 [`PagingParameters`](crate::domain::models::paging::PagingParameters)를 그대로 씁니다.

pub mod response;

pub use response::*;
