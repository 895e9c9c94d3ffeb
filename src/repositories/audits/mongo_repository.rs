//! MongoDB 감사 로그 저장소 (`audit_trails` 컬렉션)

use std::sync::Arc;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};
use tokio_util::sync::CancellationToken;
use crate::core::errors::{AppError, AppResult};
use crate::core::result::ErrorOr;
use crate::db::Database;
use crate::domain::dto::audits::AuditResponse;
use crate::domain::entities::audits::AuditTrail;
use crate::domain::models::paging::{PagedList, PagingParameters};
use crate::repositories::contracts::AuditReader;
use super::{AuditSortField, AuditWriter};

const COLLECTION: &str = "audit_trails";

pub struct MongoAuditRepository {
    db: Arc<Database>,
}

impl MongoAuditRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<AuditTrail> {
        self.db.collection::<AuditTrail>(COLLECTION)
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let timestamp_index = IndexModel::builder()
            .keys(doc! { "timestamp": -1 })
            .options(IndexOptions::builder()
                .name("timestamp_desc".to_string())
                .build())
            .build();

        let actor_index = IndexModel::builder()
            .keys(doc! { "actor": 1 })
            .options(IndexOptions::builder()
                .name("actor".to_string())
                .build())
            .build();

        self.collection()
            .create_indexes([timestamp_index, actor_index])
            .await?;

        Ok(())
    }
}

/// actor, table, action 중 하나라도 부분 일치하는 문서 (대소문자 무시)
fn filter_document(paging: &PagingParameters) -> Document {
    match paging.filter.as_deref() {
        Some(filter) => {
            let pattern = regex::escape(filter);
            let clause = |field: &str| {
                let mut clause = Document::new();
                clause.insert(field, doc! { "$regex": pattern.as_str(), "$options": "i" });
                clause
            };
            doc! { "$or": [clause("actor"), clause("table"), clause("action")] }
        }
        None => Document::new(),
    }
}

fn sort_document(paging: &PagingParameters) -> Document {
    let direction = if paging.sort_descending { -1 } else { 1 };
    let mut sort = Document::new();
    sort.insert(AuditSortField::from_paging(paging).field_name(), direction);
    sort
}

#[async_trait]
impl AuditWriter for MongoAuditRepository {
    async fn record(&self, trail: AuditTrail) -> AppResult<()> {
        self.collection().insert_one(&trail).await?;
        Ok(())
    }
}

#[async_trait]
impl AuditReader for MongoAuditRepository {
    async fn get_paged_audits(
        &self,
        paging: PagingParameters,
        cancel: &CancellationToken,
    ) -> AppResult<ErrorOr<PagedList<AuditResponse>>> {
        let paging = paging.normalized();
        let filter = filter_document(&paging);

        let total = self.collection().count_documents(filter.clone()).await?;

        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let trails: Vec<AuditTrail> = self
            .collection()
            .find(filter)
            .sort(sort_document(&paging))
            .skip(paging.skip())
            .limit(i64::from(paging.page_size))
            .await?
            .try_collect()
            .await?;

        let items = trails.into_iter().map(AuditResponse::from).collect();
        Ok(ErrorOr::Value(PagedList::new(items, &paging, total)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_is_escaped_and_case_insensitive() {
        let paging = PagingParameters {
            filter: Some("a.b".to_string()),
            ..PagingParameters::default()
        };

        let filter = filter_document(&paging);
        let clauses = filter.get_array("$or").unwrap();
        assert_eq!(clauses.len(), 3);

        let actor = clauses[0].as_document().unwrap().get_document("actor").unwrap();
        assert_eq!(actor.get_str("$regex").unwrap(), "a\\.b");
        assert_eq!(actor.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_blank_filter_matches_everything() {
        let paging = PagingParameters {
            filter: Some("  ".to_string()),
            ..PagingParameters::default()
        }
        .normalized();

        assert!(filter_document(&paging).is_empty());
    }

    #[test]
    fn test_sort_document() {
        let paging = PagingParameters {
            sort_by: Some("table".to_string()),
            sort_descending: true,
            ..PagingParameters::default()
        };

        assert_eq!(sort_document(&paging), doc! { "table": -1 });
        assert_eq!(sort_document(&PagingParameters::default()), doc! { "timestamp": 1 });
    }
}
