//! HTTP 미들웨어 모듈
//!
//! - [`AuthMiddleware`] - Bearer 액세스 토큰을 검증하고 [`AuthenticatedUser`](crate::domain::models::AuthenticatedUser)를
//!   요청 extensions에 넣습니다. 역할 요구사항([`RequiredRole`](crate::domain::models::RequiredRole))도 여기서 확인합니다.
//!
//! ```rust,ignore
//! web::scope("/api/v1/audits")
//!     .wrap(AuthMiddleware::required_with_role(ADMIN_ROLE))
//!     .service(routes::audits::get_paged_audits)
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;
