//! Accounts Entity Module
//!
//! 계정 엔티티와 계정 상태를 바꾸는 도메인 동작을 정의합니다.
//!
//! # 주요 동작
//!
//! | 메서드 | 설명 |
//! |--------|------|
//! | `activate` / `deactivate` | 활성 상태 전환 (비활성화 시 리프레시 토큰 폐기) |
//! | `update` | 부분 필드 업데이트, 변경된 컬럼 목록 반환 |
//! | `add_claim` | 중복 없는 클레임 추가 |
//! | `issue_verification_code` / `confirm_email` | 이메일 확인 코드 발급/검증 |
//! | `store_refresh_token` / `refresh_token_matches` | 리프레시 토큰 해시 보관/비교 |
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::domain::entities::accounts::Account;
//!
//! let mut account = Account::new(full_name, username, email, phone_number, password_hash);
//! let code = account.issue_verification_code();
//! ```

pub mod account;

pub use account::{Account, AccountChanges, AccountClaim};
