//! # MongoDB 계정 저장소
//!
//! MongoDB를 주 저장소로 사용하고, Redis를 조회 캐시로 사용합니다.
//!
//! ## 캐싱 전략
//!
//! - **키 패턴**: `account:id:{id}`
//! - **TTL**: `CACHE_TTL_SECS` (기본 600초)
//! - **쓰기 후 무효화**: `save`, `delete` 성공 시 키를 지웁니다.
//! - **사용 범위**: 표시용 [`view_by_id`](AccountStore::view_by_id)만 캐시를 거칩니다.
//!   `find_by_*`는 항상 MongoDB를 읽으므로, 조회와 무효화가 엇갈려 남은 이전 값이
//!   비밀번호/리프레시 토큰 확인이나 갱신에 쓰이지 않습니다.
//!
//! 캐시 오류는 요청을 실패시키지 않습니다. 경고 로그만 남기고 MongoDB로 진행합니다.
//!
//! ## 인덱스
//!
//! | 이름 | 키 | 옵션 |
//! |------|----|------|
//! | `email_unique` | `email` | unique |
//! | `username_unique` | `username` | unique |
//! | `created_at_desc` | `created_at: -1` | |
//!
//! 중복 키 오류(E11000)는 인덱스 이름으로 구분해 [`WriteOutcome`]으로 바꿉니다.

use std::sync::Arc;
use async_trait::async_trait;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{bson::doc, Collection, IndexModel};
use crate::caching::redis::RedisClient;
use crate::core::errors::AppResult;
use crate::db::Database;
use crate::domain::entities::accounts::Account;
use super::{AccountStore, WriteOutcome};

const COLLECTION: &str = "accounts";
const DUPLICATE_KEY: i32 = 11000;

pub struct MongoAccountStore {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
    cache_ttl_secs: u64,
}

impl MongoAccountStore {
    pub fn new(db: Arc<Database>, redis: Arc<RedisClient>, cache_ttl_secs: u64) -> Self {
        Self { db, redis, cache_ttl_secs }
    }

    fn collection(&self) -> Collection<Account> {
        self.db.collection::<Account>(COLLECTION)
    }

    fn id_key(id: &str) -> String {
        format!("account:id:{}", id)
    }

    async fn cached(&self, key: &str) -> Option<Account> {
        match self.redis.get::<Account>(key).await {
            Ok(hit) => hit,
            Err(e) => {
                log::warn!("계정 캐시 조회 실패 ({}): {}", key, e);
                None
            }
        }
    }

    async fn remember(&self, account: &Account) {
        let key = Self::id_key(&account.id);
        if let Err(e) = self.redis.set_with_expiry(&key, account, self.cache_ttl_secs).await {
            log::warn!("계정 캐시 저장 실패 ({}): {}", key, e);
        }
    }

    async fn forget(&self, id: &str) {
        if let Err(e) = self.redis.del_multiple(&[Self::id_key(id)]).await {
            log::warn!("계정 캐시 무효화 실패 ({}): {}", id, e);
        }
    }

    /// 고유 인덱스를 생성합니다. 시작 시 한 번 호출됩니다.
    pub async fn create_indexes(&self) -> AppResult<()> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("email_unique".to_string())
                .build())
            .build();

        let username_index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("username_unique".to_string())
                .build())
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(IndexOptions::builder()
                .name("created_at_desc".to_string())
                .build())
            .build();

        self.collection()
            .create_indexes([email_index, username_index, created_at_index])
            .await?;

        Ok(())
    }
}

/// 중복 키 오류면 어떤 고유 필드가 충돌했는지 반환합니다.
fn duplicate_outcome(error: &mongodb::error::Error) -> Option<WriteOutcome> {
    let message = match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY => {
            write_error.message.as_str()
        }
        _ => return None,
    };

    Some(duplicate_from_message(message))
}

fn duplicate_from_message(message: &str) -> WriteOutcome {
    if message.contains("username_unique") {
        WriteOutcome::DuplicateUsername
    } else {
        WriteOutcome::DuplicateEmail
    }
}

#[async_trait]
impl AccountStore for MongoAccountStore {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Account>> {
        let account = self.collection().find_one(doc! { "_id": id }).await?;
        Ok(account)
    }

    async fn view_by_id(&self, id: &str) -> AppResult<Option<Account>> {
        if let Some(cached) = self.cached(&Self::id_key(id)).await {
            return Ok(Some(cached));
        }

        let account = self.find_by_id(id).await?;

        if let Some(ref account) = account {
            self.remember(account).await;
        }
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        // 저장 시 소문자로 정규화되어 있습니다
        let email = email.to_lowercase();
        let account = self.collection().find_one(doc! { "email": email.as_str() }).await?;
        Ok(account)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let account = self.collection().find_one(doc! { "username": username }).await?;
        Ok(account)
    }

    async fn insert(&self, account: &Account) -> AppResult<WriteOutcome> {
        match self.collection().insert_one(account).await {
            Ok(_) => Ok(WriteOutcome::Written),
            Err(e) => match duplicate_outcome(&e) {
                Some(outcome) => Ok(outcome),
                None => Err(e.into()),
            },
        }
    }

    async fn save(&self, account: &Account) -> AppResult<WriteOutcome> {
        let result = match self
            .collection()
            .replace_one(doc! { "_id": account.id.as_str() }, account)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                return match duplicate_outcome(&e) {
                    Some(outcome) => Ok(outcome),
                    None => Err(e.into()),
                };
            }
        };

        if result.matched_count == 0 {
            return Ok(WriteOutcome::NotFound);
        }

        self.forget(&account.id).await;
        Ok(WriteOutcome::Written)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.collection().delete_one(doc! { "_id": id }).await?;

        if result.deleted_count == 0 {
            return Ok(false);
        }

        self.forget(id).await;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_keys() {
        assert_eq!(MongoAccountStore::id_key("42"), "account:id:42");
    }

    #[test]
    fn test_duplicate_index_is_recognized_from_server_message() {
        let username = "E11000 duplicate key error collection: account_service.accounts \
                        index: username_unique dup key: { username: \"ana\" }";
        let email = "E11000 duplicate key error collection: account_service.accounts \
                     index: email_unique dup key: { email: \"ana@example.com\" }";

        assert_eq!(duplicate_from_message(username), WriteOutcome::DuplicateUsername);
        assert_eq!(duplicate_from_message(email), WriteOutcome::DuplicateEmail);
    }
}
