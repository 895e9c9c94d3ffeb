/// 라우트 스코프의 인증 요구 수준
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// 유효한 토큰이 없으면 401
    Required,
    /// 토큰이 있으면 검증하고, 없거나 잘못되어도 통과
    Optional,
}

/// 요구 역할
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequiredRole {
    Single(String),
    /// 하나라도 있으면 허용
    Any(Vec<String>),
}

impl RequiredRole {
    pub fn is_satisfied(&self, user_roles: &[String]) -> bool {
        match self {
            RequiredRole::Single(required) => user_roles.iter().any(|role| role == required),
            RequiredRole::Any(required) => required.iter().any(|role| user_roles.contains(role)),
        }
    }
}
