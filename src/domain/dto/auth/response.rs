use serde::{Deserialize, Serialize};
use crate::domain::dto::accounts::AccountResponse;
use crate::domain::models::token::TokenPair;

/// 로그인/토큰 갱신 응답
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationResponse {
    pub account: AccountResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl AuthenticationResponse {
    pub fn new(account: AccountResponse, tokens: TokenPair) -> Self {
        Self {
            account,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
        }
    }
}
