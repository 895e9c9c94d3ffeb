//! 도메인 이벤트

use serde::{Deserialize, Serialize};

/// 확인 이메일 발송 요청 이벤트
///
/// 계정 생성/확인 메일 재전송이 성공한 뒤에만 한 번 발행되고,
/// 소비자는 최소 한 번(at-least-once) 받습니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfirmationEmailEvent {
    pub user_id: String,
    pub email: String,
    pub verification_code: String,
}

impl ConfirmationEmailEvent {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>, verification_code: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            verification_code: verification_code.into(),
        }
    }
}
