use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::domain::entities::audits::{AuditAction, AuditTrail};

/// 감사 로그 응답 DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResponse {
    pub id: String,
    pub actor: String,
    pub action: AuditAction,
    pub table: String,
    pub timestamp: DateTime<Utc>,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
    pub affected_columns: Vec<String>,
    pub origin_address: Option<String>,
}

impl From<AuditTrail> for AuditResponse {
    fn from(trail: AuditTrail) -> Self {
        Self {
            id: trail.id().to_string(),
            actor: trail.actor().to_string(),
            action: trail.action(),
            table: trail.table().to_string(),
            timestamp: trail.timestamp(),
            old_values: trail.old_values().cloned(),
            new_values: trail.new_values().cloned(),
            affected_columns: trail.affected_columns().to_vec(),
            origin_address: trail.origin_address().map(str::to_string),
        }
    }
}
