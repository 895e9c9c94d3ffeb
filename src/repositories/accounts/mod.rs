//! # 계정 저장소
//!
//! 유스케이스 로직이 의존하는 저수준 계정 영속성 인터페이스와 구현체입니다.
//!
//! | 구현체 | 용도 |
//! |--------|------|
//! | [`MongoAccountStore`] | MongoDB `accounts` 컬렉션 + Redis 조회 캐시 |
//! | [`InMemoryAccountStore`] | 개발/테스트용 (`STORAGE_BACKEND=memory`) |
//!
//! 중복 이메일/사용자명은 `Err`가 아니라 [`WriteOutcome`]으로 보고됩니다.
//! `Err(AppError)`는 저장소 장애에만 사용합니다.

pub mod memory_store;
pub mod mongo_store;

pub use memory_store::InMemoryAccountStore;
pub use mongo_store::MongoAccountStore;

use async_trait::async_trait;
use crate::core::errors::AppResult;
use crate::domain::entities::accounts::Account;

/// 쓰기 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// 갱신 대상 문서가 없음
    NotFound,
    DuplicateEmail,
    DuplicateUsername,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// 저장소 원본을 읽습니다. 자격 증명 확인과 읽은 뒤 쓰는 흐름은 모두 이 조회를 씁니다.
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Account>>;

    /// 표시용 조회. 캐시를 거칠 수 있어 TTL 동안 이전 값을 돌려줄 수 있습니다.
    async fn view_by_id(&self, id: &str) -> AppResult<Option<Account>> {
        self.find_by_id(id).await
    }

    /// 대소문자를 구분하지 않고 조회합니다.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>>;

    async fn insert(&self, account: &Account) -> AppResult<WriteOutcome>;

    /// 기존 계정 전체를 교체합니다.
    async fn save(&self, account: &Account) -> AppResult<WriteOutcome>;

    /// 삭제된 경우 `true`
    async fn delete(&self, id: &str) -> AppResult<bool>;
}
