//! 감사 로그 조회 핸들러

use std::sync::Arc;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use crate::core::pipeline;
use crate::core::result::ErrorOr;
use crate::core::telemetry::OperationTelemetry;
use crate::domain::dto::audits::AuditResponse;
use crate::domain::dto::common::PagedEnvelope;
use crate::domain::models::paging::PagingParameters;
use crate::repositories::AuditReader;
use crate::validation::RequestHandler;

pub struct GetPagedAuditsHandler {
    reader: Arc<dyn AuditReader>,
    telemetry: OperationTelemetry,
}

impl GetPagedAuditsHandler {
    pub const OPERATION: &'static str = "GetPagedAudits";

    pub fn new(reader: Arc<dyn AuditReader>, telemetry: OperationTelemetry) -> Self {
        Self { reader, telemetry }
    }
}

#[async_trait]
impl RequestHandler for GetPagedAuditsHandler {
    type Request = PagingParameters;
    type Response = PagedEnvelope<AuditResponse>;

    async fn handle(
        &self,
        request: PagingParameters,
        cancel: &CancellationToken,
    ) -> ErrorOr<Self::Response> {
        let subject = format!("page {}/{}", request.page_number, request.page_size);

        pipeline::execute(&self.telemetry, &subject, cancel, async {
            let outcome = self.reader.get_paged_audits(request, cancel).await?;
            Ok(outcome.map(PagedEnvelope::from))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::AppError;
    use crate::core::telemetry::testing::recording;
    use crate::domain::models::paging::PagedList;
    use crate::repositories::MockAuditReader;

    #[tokio::test]
    async fn test_page_is_returned_unchanged() {
        let mut reader = MockAuditReader::new();
        reader
            .expect_get_paged_audits()
            .withf(|paging, _| paging.page_number == 2 && paging.page_size == 5)
            .returning(|paging, _| Ok(ErrorOr::Value(PagedList::new(Vec::new(), &paging, 7))));

        let (telemetry, _logger) = recording(GetPagedAuditsHandler::OPERATION);
        let handler = GetPagedAuditsHandler::new(Arc::new(reader), telemetry);

        let paging = PagingParameters { page_number: 2, page_size: 5, ..PagingParameters::default() };
        let result = handler.handle(paging, &CancellationToken::new()).await;

        let page = result.value().unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.metadata.total_count, 7);
        assert_eq!(page.metadata.current_page, 2);
    }

    #[tokio::test]
    async fn test_store_fault_is_hidden() {
        let mut reader = MockAuditReader::new();
        reader
            .expect_get_paged_audits()
            .returning(|_, _| Err(AppError::DatabaseError("cursor killed".to_string())));

        let (telemetry, logger) = recording(GetPagedAuditsHandler::OPERATION);
        let handler = GetPagedAuditsHandler::new(Arc::new(reader), telemetry);

        let result = handler.handle(PagingParameters::default(), &CancellationToken::new()).await;

        let error = result.first_error().unwrap();
        assert_eq!(error.code, "General.Unexpected");
        assert!(!error.description.contains("cursor killed"));
        assert_eq!(logger.critical_entries().len(), 1);
    }
}
