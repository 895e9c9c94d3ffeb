//! 페이징 파라미터와 페이지 결과

use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::validation::ValidatedRequest;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_PAGE_NUMBER: u32 = 1;
/// 한 페이지 최대 크기
pub const MAX_PAGE_SIZE: u32 = 100;

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_page_number() -> u32 {
    DEFAULT_PAGE_NUMBER
}

/// 목록 조회 파라미터
///
/// 검증 계층은 범위를 확인하지 않습니다. 하한(≥ 1)과 상한은 저장소가
/// [`normalized`](PagingParameters::normalized)로 맞춥니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PagingParameters {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_page_number")]
    pub page_number: u32,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_descending: bool,
}

impl Default for PagingParameters {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_number: DEFAULT_PAGE_NUMBER,
            filter: None,
            sort_by: None,
            sort_descending: false,
        }
    }
}

impl PagingParameters {
    /// 범위를 벗어난 값을 보정한 복사본
    pub fn normalized(&self) -> Self {
        Self {
            page_size: self.page_size.clamp(1, MAX_PAGE_SIZE),
            page_number: self.page_number.max(1),
            filter: self.filter.clone().filter(|f| !f.trim().is_empty()),
            sort_by: self.sort_by.clone().filter(|s| !s.trim().is_empty()),
            sort_descending: self.sort_descending,
        }
    }

    /// 건너뛸 항목 수 (`normalized` 이후 호출)
    pub fn skip(&self) -> u64 {
        u64::from(self.page_number.saturating_sub(1)) * u64::from(self.page_size)
    }
}

impl ValidatedRequest for PagingParameters {
    const FIELD_ORDER: &'static [&'static str] = &[];
}

/// 페이지 메타데이터
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub current_page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageMetadata {
    pub fn new(current_page: u32, page_size: u32, total_count: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total_count.div_ceil(u64::from(page_size))
        };

        Self {
            current_page,
            page_size,
            total_count,
            total_pages,
            has_previous: current_page > 1,
            has_next: u64::from(current_page) < total_pages,
        }
    }
}

/// 페이지 하나의 항목과 메타데이터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub metadata: PageMetadata,
}

impl<T> PagedList<T> {
    pub fn new(items: Vec<T>, paging: &PagingParameters, total_count: u64) -> Self {
        Self {
            items,
            metadata: PageMetadata::new(paging.page_number, paging.page_size, total_count),
        }
    }

    pub fn map<U, F>(self, f: F) -> PagedList<U>
    where
        F: FnMut(T) -> U,
    {
        PagedList {
            items: self.items.into_iter().map(f).collect(),
            metadata: self.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_missing_from_query() {
        let paging: PagingParameters = serde_json::from_str("{}").unwrap();
        assert_eq!(paging.page_size, 10);
        assert_eq!(paging.page_number, 1);
        assert!(!paging.sort_descending);
    }

    #[test]
    fn test_normalized_enforces_lower_and_upper_bounds() {
        let paging = PagingParameters {
            page_size: 0,
            page_number: 0,
            filter: Some("   ".to_string()),
            ..PagingParameters::default()
        }
        .normalized();

        assert_eq!(paging.page_size, 1);
        assert_eq!(paging.page_number, 1);
        assert!(paging.filter.is_none());

        let paging = PagingParameters { page_size: 5000, ..PagingParameters::default() }.normalized();
        assert_eq!(paging.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_page_metadata() {
        let metadata = PageMetadata::new(2, 10, 25);

        assert_eq!(metadata.total_pages, 3);
        assert!(metadata.has_previous);
        assert!(metadata.has_next);

        let last = PageMetadata::new(3, 10, 25);
        assert!(!last.has_next);
    }

    #[test]
    fn test_skip() {
        let paging = PagingParameters { page_size: 20, page_number: 3, ..PagingParameters::default() };
        assert_eq!(paging.skip(), 40);
    }
}
