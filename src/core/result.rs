//! # 도메인 결과 모델 (ErrorOr)
//!
//! 핸들러와 리포지토리 사이에서 주고받는 "성공 또는 오류" 태그 값입니다.
//! 예외를 던지는 대신 값으로 돌려주며, 오류 목록은 항상 비어 있지 않습니다.
//!
//! ## 구성
//!
//! | 타입 | 역할 |
//! |------|------|
//! | [`ErrorKind`] | 오류 분류 (HTTP 상태 코드 매핑의 기준) |
//! | [`ErrorDetail`] | 안정적인 머신 코드 + 사람이 읽는 설명 + 분류 |
//! | [`ErrorList`] | 비어 있지 않은 오류 목록 |
//! | [`ErrorOr`] | `Value(T)` 또는 `Errors(ErrorList)` |
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::core::result::{ErrorDetail, ErrorOr};
//!
//! fn find(id: &str) -> ErrorOr<Account> {
//!     match lookup(id) {
//!         Some(account) => ErrorOr::Value(account),
//!         None => ErrorDetail::not_found("User.NotFound", "User").into(),
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// 취소된 요청의 오류 코드
pub const CANCELLED_CODE: &str = "General.Cancelled";

/// 오류 분류
///
/// HTTP 경계 계층은 이 값으로 상태 코드를 결정합니다. 취소(`General.Cancelled`)만 503으로 따로 매핑됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// 리소스 없음 (404)
    NotFound,
    /// 중복/상태 충돌 (409)
    Conflict,
    /// 입력 규칙 위반 (400)
    Validation,
    /// 형식은 맞지만 처리할 수 없는 요청 (422)
    Unprocessable,
    /// 잘못된 요청 (400)
    BadRequest,
    /// 인증 실패 (401)
    Unauthorized,
    /// 권한 부족 (403)
    Forbidden,
    /// 처리되지 않은 장애 (500)
    Unexpected,
    /// 일반 실패 (500)
    Failure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Validation => "Validation",
            ErrorKind::Unprocessable => "Unprocessable",
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::Unexpected => "Unexpected",
            ErrorKind::Failure => "Failure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 단일 오류 항목
///
/// `code`는 클라이언트가 분기할 수 있는 안정적인 식별자(`User.NotFound` 등),
/// `description`은 사람이 읽는 설명입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub description: String,
    pub kind: ErrorKind,
}

impl ErrorDetail {
    pub fn new(kind: ErrorKind, code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            kind,
        }
    }

    pub fn not_found(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, code, description)
    }

    pub fn conflict(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, code, description)
    }

    pub fn validation(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, code, description)
    }

    pub fn unprocessable(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unprocessable, code, description)
    }

    pub fn bad_request(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, code, description)
    }

    pub fn unauthorized(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, code, description)
    }

    pub fn forbidden(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, code, description)
    }

    pub fn failure(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ErrorKind::Failure, code, description)
    }

    /// 핸들러 경계에서 잡힌 장애를 나타내는 공통 오류
    ///
    /// 원본 장애 메시지는 로그에만 남기고 호출자에게는 노출하지 않습니다.
    pub fn unexpected() -> Self {
        Self::new(
            ErrorKind::Unexpected,
            "General.Unexpected",
            "An unexpected error occurred",
        )
    }

    pub fn cancelled() -> Self {
        Self::new(
            ErrorKind::Failure,
            CANCELLED_CODE,
            "The request was cancelled",
        )
    }

    pub fn is_cancelled(&self) -> bool {
        self.code == CANCELLED_CODE
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.code, self.description)
    }
}

/// 비어 있지 않은 오류 목록
///
/// 생성 경로가 `new`(첫 오류 필수)와 `from_vec`(빈 벡터면 `None`)뿐이므로
/// 빈 목록은 만들 수 없습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorList(Vec<ErrorDetail>);

impl ErrorList {
    pub fn new(first: ErrorDetail) -> Self {
        Self(vec![first])
    }

    pub fn from_vec(errors: Vec<ErrorDetail>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    pub fn push(&mut self, error: ErrorDetail) {
        self.0.push(error);
    }

    /// 첫 번째 오류 (HTTP 응답의 대표 상태 코드 결정에 사용)
    pub fn first(&self) -> &ErrorDetail {
        // new/from_vec 모두 최소 1개를 보장합니다
        &self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ErrorDetail> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ErrorDetail] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<ErrorDetail> {
        self.0
    }

    /// 모든 항목이 주어진 분류인지 확인합니다.
    pub fn all_of_kind(&self, kind: ErrorKind) -> bool {
        self.0.iter().all(|e| e.kind == kind)
    }
}

impl<'de> Deserialize<'de> for ErrorList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let errors = Vec::<ErrorDetail>::deserialize(deserializer)?;
        ErrorList::from_vec(errors)
            .ok_or_else(|| serde::de::Error::custom("error list must not be empty"))
    }
}

impl From<ErrorDetail> for ErrorList {
    fn from(error: ErrorDetail) -> Self {
        ErrorList::new(error)
    }
}

impl IntoIterator for ErrorList {
    type Item = ErrorDetail;
    type IntoIter = std::vec::IntoIter<ErrorDetail>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// 성공 값 또는 오류 목록
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorOr<T> {
    Value(T),
    Errors(ErrorList),
}

impl<T> ErrorOr<T> {
    pub fn is_error(&self) -> bool {
        matches!(self, ErrorOr::Errors(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            ErrorOr::Value(value) => Some(value),
            ErrorOr::Errors(_) => None,
        }
    }

    pub fn errors(&self) -> Option<&ErrorList> {
        match self {
            ErrorOr::Value(_) => None,
            ErrorOr::Errors(errors) => Some(errors),
        }
    }

    /// 첫 오류 (성공이면 `None`)
    pub fn first_error(&self) -> Option<&ErrorDetail> {
        self.errors().map(ErrorList::first)
    }

    pub fn map<U, F>(self, f: F) -> ErrorOr<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            ErrorOr::Value(value) => ErrorOr::Value(f(value)),
            ErrorOr::Errors(errors) => ErrorOr::Errors(errors),
        }
    }

    /// 오류 쪽만 변환합니다. 성공 값은 건드리지 않습니다.
    pub fn map_errors<F>(self, f: F) -> ErrorOr<T>
    where
        F: FnOnce(ErrorList) -> ErrorList,
    {
        match self {
            ErrorOr::Value(value) => ErrorOr::Value(value),
            ErrorOr::Errors(errors) => ErrorOr::Errors(f(errors)),
        }
    }

    pub fn into_result(self) -> Result<T, ErrorList> {
        match self {
            ErrorOr::Value(value) => Ok(value),
            ErrorOr::Errors(errors) => Err(errors),
        }
    }
}

impl<T> From<ErrorDetail> for ErrorOr<T> {
    fn from(error: ErrorDetail) -> Self {
        ErrorOr::Errors(ErrorList::new(error))
    }
}

impl<T> From<ErrorList> for ErrorOr<T> {
    fn from(errors: ErrorList) -> Self {
        ErrorOr::Errors(errors)
    }
}

impl<T> From<Result<T, ErrorList>> for ErrorOr<T> {
    fn from(result: Result<T, ErrorList>) -> Self {
        match result {
            Ok(value) => ErrorOr::Value(value),
            Err(errors) => ErrorOr::Errors(errors),
        }
    }
}
