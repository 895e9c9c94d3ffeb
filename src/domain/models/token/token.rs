use serde::{Deserialize, Serialize};

/// JWT 클레임
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 계정 ID
    pub sub: String,
    pub email: String,
    pub roles: Vec<String>,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    /// 토큰 고유 ID
    pub jti: String,
}

/// 발급된 토큰 한 쌍
///
/// 리프레시 토큰은 JWT가 아닌 불투명 난수 문자열이며,
/// 저장소에는 해시만 보관됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// 액세스 토큰 만료까지 남은 시간 (초)
    pub expires_in: i64,
}
