//! 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! - [`contracts`] - 핸들러가 의존하는 유스케이스별 trait (계정 생성, 조회, 삭제 ...)
//! - [`accounts`] - 저수준 계정 저장소 ([`AccountStore`]) 와 MongoDB/인메모리 구현
//! - [`audits`] - 감사 로그 기록/조회 ([`AuditWriter`]) 와 MongoDB/인메모리 구현
//!
//! 계정 유스케이스 trait는 [`IdentityService`](crate::services::identity::IdentityService)가
//! `AccountStore` 위에서 구현합니다. 감사 로그 조회 trait는 감사 저장소가 직접 구현합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! let store: Arc<dyn AccountStore> = Arc::new(InMemoryAccountStore::new());
//! let account = store.find_by_email("user@example.com").await?;
//! ```

pub mod accounts;
pub mod audits;
pub mod contracts;

pub use accounts::{AccountStore, InMemoryAccountStore, MongoAccountStore, WriteOutcome};
pub use audits::{AuditWriter, InMemoryAuditLog, MongoAuditRepository};
pub use contracts::*;
