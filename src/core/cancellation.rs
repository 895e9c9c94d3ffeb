//! # Request Cancellation
//!
//! 요청 하나당 [`CancellationToken`] 하나를 만들어 핸들러에 넘깁니다.
//!
//! ```text
//! shutdown token (서버 종료 시 cancel)
//!   └── request token (RequestScope)
//!         ├── 타임아웃 타이머가 만료되면 cancel
//!         └── 스코프가 drop되면 cancel (클라이언트 연결 끊김 등)
//! ```

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// 요청 스코프 생성기
///
/// 서버 종료 토큰과 요청 타임아웃을 들고 있으며 `web::Data`로 공유됩니다.
#[derive(Debug, Clone)]
pub struct RequestScopes {
    shutdown: CancellationToken,
    timeout: Duration,
}

impl RequestScopes {
    pub fn new(shutdown: CancellationToken, timeout: Duration) -> Self {
        Self { shutdown, timeout }
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// 새 요청 스코프를 시작합니다.
    ///
    /// tokio 런타임 안에서 호출해야 합니다 (actix 워커는 tokio 위에서 동작합니다).
    pub fn begin(&self) -> RequestScope {
        RequestScope::start(&self.shutdown, self.timeout)
    }
}

/// 요청 하나의 취소 범위
pub struct RequestScope {
    token: CancellationToken,
    timer: JoinHandle<()>,
}

impl RequestScope {
    fn start(parent: &CancellationToken, timeout: Duration) -> Self {
        let token = parent.child_token();
        let timer_token = token.clone();

        let timer = tokio::spawn(async move {
            tokio::select! {
                _ = timer_token.cancelled() => {}
                _ = tokio::time::sleep(timeout) => {
                    log::warn!("요청 타임아웃 ({:?}) - 취소 신호 전송", timeout);
                    timer_token.cancel();
                }
            }
        });

        Self { token, timer }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        self.timer.abort();
        self.token.cancel();
    }
}
