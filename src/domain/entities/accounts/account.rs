use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// 기본 역할
pub const DEFAULT_ROLE: &str = "user";

/// 이메일 인증 코드 유효 시간 (시간)
pub const VERIFICATION_CODE_TTL_HOURS: i64 = 24;

/// 사용자 계정 엔티티
///
/// MongoDB `accounts` 컬렉션 문서이자 인메모리 저장소의 값입니다.
/// 비밀번호와 리프레시 토큰은 해시로만 보관합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub password_hash: String,
    pub is_active: bool,
    pub email_confirmed: bool,
    pub phone_confirmed: bool,
    pub roles: Vec<String>,
    #[serde(default)]
    pub claims: Vec<AccountClaim>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 계정에 부여된 클레임 (type, value)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountClaim {
    pub claim_type: String,
    pub value: String,
}

/// 부분 업데이트 필드
///
/// `None`인 필드는 그대로 둡니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountChanges {
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub phone_number: Option<String>,
}

impl AccountChanges {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.username.is_none() && self.phone_number.is_none()
    }
}

impl Account {
    /// 새 로컬 계정을 생성합니다.
    ///
    /// 이메일 확인 전까지 `email_confirmed`는 `false`이며 계정은 활성 상태로 시작합니다.
    pub fn new(
        full_name: String,
        username: String,
        email: String,
        phone_number: String,
        password_hash: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            full_name,
            username,
            email: email.to_lowercase(),
            phone_number,
            password_hash,
            is_active: true,
            email_confirmed: false,
            phone_confirmed: false,
            roles: vec![DEFAULT_ROLE.to_string()],
            claims: Vec::new(),
            verification_code: None,
            verification_expires_at: None,
            refresh_token_hash: None,
            refresh_token_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn activate(&mut self) {
        self.is_active = true;
        self.touch();
    }

    /// 비활성화하면서 발급된 리프레시 토큰도 폐기합니다.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.revoke_refresh_token();
        self.touch();
    }

    /// 변경된 필드 이름 목록을 반환합니다 (감사 로그용).
    pub fn update(&mut self, changes: AccountChanges) -> Vec<String> {
        let mut affected = Vec::new();

        if let Some(full_name) = changes.full_name {
            if full_name != self.full_name {
                self.full_name = full_name;
                affected.push("full_name".to_string());
            }
        }
        if let Some(username) = changes.username {
            if username != self.username {
                self.username = username;
                affected.push("username".to_string());
            }
        }
        if let Some(phone_number) = changes.phone_number {
            if phone_number != self.phone_number {
                self.phone_number = phone_number;
                self.phone_confirmed = false;
                affected.push("phone_number".to_string());
            }
        }

        if !affected.is_empty() {
            self.touch();
        }
        affected
    }

    /// 같은 (type, value) 클레임이 이미 있으면 무시합니다.
    pub fn add_claim(&mut self, claim_type: impl Into<String>, value: impl Into<String>) -> bool {
        let claim = AccountClaim {
            claim_type: claim_type.into(),
            value: value.into(),
        };
        if self.claims.contains(&claim) {
            return false;
        }
        self.claims.push(claim);
        self.touch();
        true
    }

    /// 새 6자리 인증 코드를 발급하고 반환합니다. 이전 코드는 무효가 됩니다.
    pub fn issue_verification_code(&mut self) -> String {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
        self.verification_code = Some(code.clone());
        self.verification_expires_at = Some(Utc::now() + Duration::hours(VERIFICATION_CODE_TTL_HOURS));
        self.touch();
        code
    }

    /// 인증 코드가 일치하고 만료되지 않았으면 이메일을 확인 처리합니다.
    pub fn confirm_email(&mut self, code: &str) -> bool {
        let valid = match (&self.verification_code, self.verification_expires_at) {
            (Some(expected), Some(expires_at)) => expected == code && Utc::now() <= expires_at,
            _ => false,
        };

        if valid {
            self.email_confirmed = true;
            self.verification_code = None;
            self.verification_expires_at = None;
            self.touch();
        }
        valid
    }

    pub fn store_refresh_token(&mut self, refresh_token: &str, expires_at: DateTime<Utc>) {
        self.refresh_token_hash = Some(hash_token(refresh_token));
        self.refresh_token_expires_at = Some(expires_at);
        self.touch();
    }

    pub fn revoke_refresh_token(&mut self) {
        self.refresh_token_hash = None;
        self.refresh_token_expires_at = None;
    }

    /// 저장된 해시와 비교합니다. 만료된 토큰은 일치하지 않는 것으로 봅니다.
    pub fn refresh_token_matches(&self, refresh_token: &str) -> bool {
        match (&self.refresh_token_hash, self.refresh_token_expires_at) {
            (Some(stored), Some(expires_at)) => {
                Utc::now() <= expires_at && *stored == hash_token(refresh_token)
            }
            _ => false,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|role| role == "admin")
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// 리프레시 토큰 SHA-256 해시 (hex)
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account::new(
            "Ana Lima".to_string(),
            "ana".to_string(),
            "Ana@Example.com".to_string(),
            "0123456789".to_string(),
            "hash".to_string(),
        )
    }

    #[test]
    fn test_new_account_defaults() {
        let account = account();

        assert!(account.is_active);
        assert!(!account.email_confirmed);
        assert_eq!(account.email, "ana@example.com");
        assert_eq!(account.roles, vec!["user".to_string()]);
        assert!(Uuid::parse_str(&account.id).is_ok());
    }

    #[test]
    fn test_deactivate_revokes_refresh_token() {
        let mut account = account();
        account.store_refresh_token("refresh", Utc::now() + Duration::days(1));
        assert!(account.refresh_token_matches("refresh"));

        account.deactivate();

        assert!(!account.is_active);
        assert!(!account.refresh_token_matches("refresh"));

        account.activate();
        assert!(account.is_active);
    }

    #[test]
    fn test_update_reports_changed_fields_only() {
        let mut account = account();
        let affected = account.update(AccountChanges {
            full_name: Some("Ana Lima".to_string()),
            username: Some("ana.l".to_string()),
            phone_number: None,
        });

        assert_eq!(affected, vec!["username".to_string()]);
        assert_eq!(account.username, "ana.l");
    }

    #[test]
    fn test_add_claim_is_deduplicated() {
        let mut account = account();
        assert!(account.add_claim("permission", "audits:read"));
        assert!(!account.add_claim("permission", "audits:read"));
        assert_eq!(account.claims.len(), 1);
    }

    #[test]
    fn test_verification_code_flow() {
        let mut account = account();
        let code = account.issue_verification_code();

        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));

        let wrong = if code == "000000" { "111111" } else { "000000" };
        assert!(!account.confirm_email(wrong));
        assert!(account.confirm_email(&code));
        assert!(account.email_confirmed);
        assert!(account.verification_code.is_none());

        // 코드는 한 번만 사용할 수 있습니다
        assert!(!account.confirm_email(&code));
    }

    #[test]
    fn test_reissued_code_invalidates_previous() {
        let mut account = account();
        let first = account.issue_verification_code();
        let second = account.issue_verification_code();

        if first != second {
            assert!(!account.confirm_email(&first));
        }
        assert!(account.confirm_email(&second));
    }

    #[test]
    fn test_expired_refresh_token_does_not_match() {
        let mut account = account();
        account.store_refresh_token("refresh", Utc::now() - Duration::seconds(1));

        assert!(!account.refresh_token_matches("refresh"));
        assert_ne!(account.refresh_token_hash.as_deref(), Some("refresh"));
    }
}
