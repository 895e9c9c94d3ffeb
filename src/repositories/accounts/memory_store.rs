//! 인메모리 계정 저장소 (개발/테스트용)

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::RwLock;
use crate::core::errors::AppResult;
use crate::domain::entities::accounts::Account;
use super::{AccountStore, WriteOutcome};

#[derive(Debug, Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 자기 자신을 제외한 다른 계정과 충돌하는 고유 필드를 찾습니다.
    fn conflict(accounts: &HashMap<String, Account>, candidate: &Account) -> Option<WriteOutcome> {
        let others = || accounts.values().filter(|a| a.id != candidate.id);

        if others().any(|a| a.email.eq_ignore_ascii_case(&candidate.email)) {
            return Some(WriteOutcome::DuplicateEmail);
        }
        if others().any(|a| a.username == candidate.username) {
            return Some(WriteOutcome::DuplicateUsername);
        }
        None
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.username == username).cloned())
    }

    async fn insert(&self, account: &Account) -> AppResult<WriteOutcome> {
        let mut accounts = self.accounts.write().await;

        if let Some(conflict) = Self::conflict(&accounts, account) {
            return Ok(conflict);
        }

        accounts.insert(account.id.clone(), account.clone());
        tracing::info!(account_id = %account.id, "Created account");
        Ok(WriteOutcome::Written)
    }

    async fn save(&self, account: &Account) -> AppResult<WriteOutcome> {
        let mut accounts = self.accounts.write().await;

        if !accounts.contains_key(&account.id) {
            return Ok(WriteOutcome::NotFound);
        }
        if let Some(conflict) = Self::conflict(&accounts, account) {
            return Ok(conflict);
        }

        accounts.insert(account.id.clone(), account.clone());
        Ok(WriteOutcome::Written)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let mut accounts = self.accounts.write().await;

        if accounts.remove(id).is_some() {
            tracing::info!(account_id = %id, "Deleted account");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(username: &str, email: &str) -> Account {
        Account::new(
            "Ana Lima".to_string(),
            username.to_string(),
            email.to_string(),
            "0123456789".to_string(),
            "hash".to_string(),
        )
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryAccountStore::new();
        let ana = account("ana", "ana@example.com");

        assert_eq!(store.insert(&ana).await.unwrap(), WriteOutcome::Written);

        assert_eq!(store.find_by_id(&ana.id).await.unwrap(), Some(ana.clone()));
        assert_eq!(store.find_by_email("ANA@example.com").await.unwrap(), Some(ana.clone()));
        assert_eq!(store.find_by_username("ana").await.unwrap(), Some(ana));
        assert!(store.find_by_username("Ana").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_and_username() {
        let store = InMemoryAccountStore::new();
        store.insert(&account("ana", "ana@example.com")).await.unwrap();

        assert_eq!(
            store.insert(&account("other", "Ana@Example.com")).await.unwrap(),
            WriteOutcome::DuplicateEmail
        );
        assert_eq!(
            store.insert(&account("ana", "other@example.com")).await.unwrap(),
            WriteOutcome::DuplicateUsername
        );
    }

    #[tokio::test]
    async fn test_save_detects_missing_and_conflicting_accounts() {
        let store = InMemoryAccountStore::new();
        let ana = account("ana", "ana@example.com");
        let bruno = account("bruno", "bruno@example.com");
        store.insert(&ana).await.unwrap();
        store.insert(&bruno).await.unwrap();

        let ghost = account("ghost", "ghost@example.com");
        assert_eq!(store.save(&ghost).await.unwrap(), WriteOutcome::NotFound);

        let mut renamed = bruno.clone();
        renamed.username = "ana".to_string();
        assert_eq!(store.save(&renamed).await.unwrap(), WriteOutcome::DuplicateUsername);

        // 자기 자신과는 충돌하지 않습니다
        let mut same = ana.clone();
        same.full_name = "Ana L.".to_string();
        assert_eq!(store.save(&same).await.unwrap(), WriteOutcome::Written);
        assert_eq!(store.find_by_id(&ana.id).await.unwrap().unwrap().full_name, "Ana L.");
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryAccountStore::new();
        let ana = account("ana", "ana@example.com");
        store.insert(&ana).await.unwrap();

        assert!(store.delete(&ana.id).await.unwrap());
        assert!(!store.delete(&ana.id).await.unwrap());
        assert!(store.find_by_id(&ana.id).await.unwrap().is_none());
    }
}
