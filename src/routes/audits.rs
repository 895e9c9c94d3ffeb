//! # Audit HTTP Endpoints
//!
//! `GET /api/v1/audits?page_size=10&page_number=1&filter=accounts&sort_by=timestamp&sort_descending=true`
//!
//! 관리자 전용입니다. `sort_by`는 `timestamp`(기본), `actor`, `action`, `table` 중 하나입니다.

use actix_web::http::StatusCode;
use actix_web::{get, web, HttpResponse};
use crate::core::cancellation::RequestScopes;
use crate::core::HandlerRegistry;
use crate::domain::models::paging::PagingParameters;
use crate::validation::dispatch;
use super::responses::respond;

#[get("")]
pub async fn get_paged_audits(
    registry: web::Data<HandlerRegistry>,
    scopes: web::Data<RequestScopes>,
    query: web::Query<PagingParameters>,
) -> HttpResponse {
    let scope = scopes.begin();
    let outcome = dispatch(&registry.get_paged_audits, query.into_inner(), scope.token()).await;
    respond(outcome, StatusCode::OK)
}
