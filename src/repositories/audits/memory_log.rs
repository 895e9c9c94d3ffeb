//! 인메모리 감사 로그 (개발/테스트용)

use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use crate::core::errors::{AppError, AppResult};
use crate::core::result::ErrorOr;
use crate::domain::dto::audits::AuditResponse;
use crate::domain::entities::audits::AuditTrail;
use crate::domain::models::paging::{PagedList, PagingParameters};
use crate::repositories::contracts::AuditReader;
use super::{AuditSortField, AuditWriter};

#[derive(Debug, Default, Clone)]
pub struct InMemoryAuditLog {
    trails: Arc<RwLock<Vec<AuditTrail>>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 기록된 전체 감사 로그 (기록 순서)
    pub async fn snapshot(&self) -> Vec<AuditTrail> {
        self.trails.read().await.clone()
    }
}

fn matches_filter(trail: &AuditTrail, filter: &str) -> bool {
    let filter = filter.to_lowercase();
    [trail.actor(), trail.table(), trail.action().as_str()]
        .iter()
        .any(|value| value.to_lowercase().contains(&filter))
}

#[async_trait]
impl AuditWriter for InMemoryAuditLog {
    async fn record(&self, trail: AuditTrail) -> AppResult<()> {
        self.trails.write().await.push(trail);
        Ok(())
    }
}

#[async_trait]
impl AuditReader for InMemoryAuditLog {
    async fn get_paged_audits(
        &self,
        paging: PagingParameters,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<PagedList<AuditResponse>>> {
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let paging = paging.normalized();
        let trails = self.trails.read().await;

        let mut matching: Vec<&AuditTrail> = trails
            .iter()
            .filter(|t| paging.filter.as_deref().is_none_or(|f| matches_filter(t, f)))
            .collect();

        match AuditSortField::from_paging(&paging) {
            AuditSortField::Timestamp => matching.sort_by_key(|t| t.timestamp()),
            AuditSortField::Actor => matching.sort_by(|a, b| a.actor().cmp(b.actor())),
            AuditSortField::Action => matching.sort_by(|a, b| a.action().as_str().cmp(b.action().as_str())),
            AuditSortField::Table => matching.sort_by(|a, b| a.table().cmp(b.table())),
        }
        if paging.sort_descending {
            matching.reverse();
        }

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(paging.skip() as usize)
            .take(paging.page_size as usize)
            .cloned()
            .map(AuditResponse::from)
            .collect();

        Ok(ErrorOr::Value(PagedList::new(items, &paging, total)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::audits::AuditAction;

    async fn seeded() -> InMemoryAuditLog {
        let log = InMemoryAuditLog::new();
        for (actor, action) in [
            ("ana", AuditAction::Create),
            ("bruno", AuditAction::Update),
            ("carla", AuditAction::Delete),
            ("ana", AuditAction::Update),
        ] {
            log.record(AuditTrail::builder(actor, action, "accounts").build()).await.unwrap();
        }
        log
    }

    fn value<T>(result: AppResult<ErrorOr<T>>) -> T {
        match result.unwrap() {
            ErrorOr::Value(value) => value,
            ErrorOr::Errors(errors) => panic!("unexpected errors: {:?}", errors),
        }
    }

    #[tokio::test]
    async fn test_paging_is_normalized() {
        let log = seeded().await;
        let paging = PagingParameters { page_size: 0, page_number: 0, ..PagingParameters::default() };

        let page = value(log.get_paged_audits(paging, &CancellationToken::new()).await);

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.metadata.current_page, 1);
        assert_eq!(page.metadata.page_size, 1);
        assert_eq!(page.metadata.total_count, 4);
        assert!(page.metadata.has_next);
    }

    #[tokio::test]
    async fn test_filter_and_sort() {
        let log = seeded().await;
        let paging = PagingParameters {
            filter: Some("UPDATE".to_string()),
            sort_by: Some("actor".to_string()),
            sort_descending: true,
            ..PagingParameters::default()
        };

        let page = value(log.get_paged_audits(paging, &CancellationToken::new()).await);

        let actors: Vec<&str> = page.items.iter().map(|a| a.actor.as_str()).collect();
        assert_eq!(actors, vec!["bruno", "ana"]);
        assert_eq!(page.metadata.total_count, 2);
    }

    #[tokio::test]
    async fn test_second_page() {
        let log = seeded().await;
        let paging = PagingParameters { page_size: 3, page_number: 2, ..PagingParameters::default() };

        let page = value(log.get_paged_audits(paging, &CancellationToken::new()).await);

        assert_eq!(page.items.len(), 1);
        assert!(page.metadata.has_previous);
        assert!(!page.metadata.has_next);
    }

    #[tokio::test]
    async fn test_cancelled_token_aborts_read() {
        let log = seeded().await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = log.get_paged_audits(PagingParameters::default(), &cancel).await;
        assert!(matches!(result, Err(AppError::Cancelled)));
    }
}
