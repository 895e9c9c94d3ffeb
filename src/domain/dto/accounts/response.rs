use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::domain::entities::accounts::Account;

/// 계정 응답 DTO
///
/// 비밀번호 해시, 인증 코드, 리프레시 토큰 해시는 포함하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub is_active: bool,
    pub email_confirmed: bool,
    pub phone_confirmed: bool,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        let Account {
            id,
            full_name,
            username,
            email,
            phone_number,
            is_active,
            email_confirmed,
            phone_confirmed,
            roles,
            created_at,
            updated_at,
            ..
        } = account;

        Self {
            id,
            full_name,
            username,
            email,
            phone_number,
            is_active,
            email_confirmed,
            phone_confirmed,
            roles,
            created_at,
            updated_at,
        }
    }
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        AccountResponse::from(account.clone())
    }
}

/// 계정 생성 결과
///
/// 확인 이메일 이벤트를 만들기 위해 인증 코드를 함께 돌려주지만,
/// HTTP 응답에는 `account`만 실립니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRegistration {
    pub account: AccountResponse,
    pub verification_code: String,
}

/// 새 인증 코드 발급 결과 (확인 메일 재전송)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationTicket {
    pub user_id: String,
    pub email: String,
    pub verification_code: String,
}
