//! 공통 DTO: 응답 봉투와 요청 출처 정보

use serde::{Deserialize, Serialize};
use crate::domain::models::paging::{PageMetadata, PagedList};

/// 단건 성공 응답
///
/// ```json
/// { "message": "Account retrieved successfully", "item": { ... } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<T>,
}

impl<T> SuccessEnvelope<T> {
    pub fn with_item(message: impl Into<String>, item: T) -> Self {
        Self {
            message: message.into(),
            item: Some(item),
        }
    }

    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            item: None,
        }
    }
}

/// 페이지 응답
///
/// ```json
/// { "items": [ ... ], "metadata": { "current_page": 1, ... } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedEnvelope<T> {
    pub items: Vec<T>,
    pub metadata: PageMetadata,
}

impl<T> From<PagedList<T>> for PagedEnvelope<T> {
    fn from(page: PagedList<T>) -> Self {
        Self {
            items: page.items,
            metadata: page.metadata,
        }
    }
}

/// 변경 요청의 출처 (감사 로그용)
///
/// 본문에서 역직렬화되지 않고 라우트가 채웁니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOrigin {
    /// 인증된 호출자 ID (익명 요청이면 `None`)
    pub actor: Option<String>,
    /// 클라이언트 주소
    pub address: Option<String>,
}

impl RequestOrigin {
    pub fn new(actor: Option<String>, address: Option<String>) -> Self {
        Self { actor, address }
    }

    /// 호출자가 없으면 대상 계정 ID를 행위자로 씁니다 (본인 요청).
    pub fn actor_or(&self, fallback: &str) -> String {
        self.actor.clone().unwrap_or_else(|| fallback.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_only_envelope_omits_item() {
        let envelope: SuccessEnvelope<()> = SuccessEnvelope::message_only("Account deleted successfully");
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json, serde_json::json!({ "message": "Account deleted successfully" }));
    }

    #[test]
    fn test_actor_falls_back_to_subject() {
        assert_eq!(RequestOrigin::default().actor_or("u1"), "u1");
        assert_eq!(RequestOrigin::new(Some("admin".to_string()), None).actor_or("u1"), "admin");
    }
}
