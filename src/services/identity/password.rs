//! bcrypt 해싱/검증
//!
//! bcrypt는 CPU를 오래 점유하므로 blocking 스레드 풀에서 실행합니다.

use crate::core::errors::{AppError, AppResult};

pub async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 작업 실패: {}", e)))?
        .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))
}

pub async fn verify_password(password: String, password_hash: String) -> AppResult<bool> {
    let verify_start = std::time::Instant::now();

    let is_valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
        .await
        .map_err(|e| AppError::InternalError(format!("비밀번호 검증 작업 실패: {}", e)))?
        .map_err(|e| AppError::InternalError(format!("비밀번호 검증 실패: {}", e)))?;

    log::debug!("Password verification took: {:?}", verify_start.elapsed());
    Ok(is_valid)
}
