//! # 감사 로그 저장소
//!
//! 변경 작업마다 [`AuditTrail`] 한 건을 기록하고([`AuditWriter`]),
//! 관리자 조회용 페이지 목록을 제공합니다([`AuditReader`](super::contracts::AuditReader)).
//!
//! ## 조회 규칙
//!
//! - 페이지 파라미터는 [`PagingParameters::normalized`]로 보정합니다 (크기 1-100, 번호 ≥ 1).
//! - `filter`: actor, table, action에 대한 대소문자 무시 부분 일치
//! - `sort_by`: `timestamp`(기본), `actor`, `action`, `table`. 알 수 없는 값은 `timestamp`

pub mod memory_log;
pub mod mongo_repository;

pub use memory_log::InMemoryAuditLog;
pub use mongo_repository::MongoAuditRepository;

use async_trait::async_trait;
use crate::core::errors::AppResult;
use crate::domain::entities::audits::AuditTrail;
use crate::domain::models::paging::PagingParameters;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditWriter: Send + Sync {
    async fn record(&self, trail: AuditTrail) -> AppResult<()>;
}

/// 정렬 가능한 필드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditSortField {
    Timestamp,
    Actor,
    Action,
    Table,
}

impl AuditSortField {
    pub fn from_paging(paging: &PagingParameters) -> Self {
        match paging.sort_by.as_deref().map(str::to_lowercase).as_deref() {
            Some("actor") => Self::Actor,
            Some("action") => Self::Action,
            Some("table") => Self::Table,
            _ => Self::Timestamp,
        }
    }

    /// 문서 필드 이름
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::Actor => "actor",
            Self::Action => "action",
            Self::Table => "table",
        }
    }
}
