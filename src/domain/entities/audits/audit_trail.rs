use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 감사 로그 동작 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
        }
    }
}

/// 감사 로그 한 건
///
/// 저장소가 변경 작업마다 한 번 기록하며, 기록된 뒤에는 수정하지 않습니다.
/// 필드는 생성 이후 읽기 전용으로만 노출됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditTrail {
    #[serde(rename = "_id")]
    id: String,
    actor: String,
    action: AuditAction,
    table: String,
    timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    old_values: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_values: Option<serde_json::Value>,
    affected_columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    origin_address: Option<String>,
}

impl AuditTrail {
    pub fn builder(actor: impl Into<String>, action: AuditAction, table: impl Into<String>) -> AuditTrailBuilder {
        AuditTrailBuilder {
            actor: actor.into(),
            action,
            table: table.into(),
            old_values: None,
            new_values: None,
            affected_columns: Vec::new(),
            origin_address: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn action(&self) -> AuditAction {
        self.action
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn old_values(&self) -> Option<&serde_json::Value> {
        self.old_values.as_ref()
    }

    pub fn new_values(&self) -> Option<&serde_json::Value> {
        self.new_values.as_ref()
    }

    pub fn affected_columns(&self) -> &[String] {
        &self.affected_columns
    }

    pub fn origin_address(&self) -> Option<&str> {
        self.origin_address.as_deref()
    }
}

pub struct AuditTrailBuilder {
    actor: String,
    action: AuditAction,
    table: String,
    old_values: Option<serde_json::Value>,
    new_values: Option<serde_json::Value>,
    affected_columns: Vec<String>,
    origin_address: Option<String>,
}

impl AuditTrailBuilder {
    pub fn old_values(mut self, values: serde_json::Value) -> Self {
        self.old_values = Some(values);
        self
    }

    pub fn new_values(mut self, values: serde_json::Value) -> Self {
        self.new_values = Some(values);
        self
    }

    pub fn affected_columns(mut self, columns: Vec<String>) -> Self {
        self.affected_columns = columns;
        self
    }

    pub fn origin_address(mut self, address: Option<String>) -> Self {
        self.origin_address = address;
        self
    }

    pub fn build(self) -> AuditTrail {
        AuditTrail {
            id: Uuid::new_v4().to_string(),
            actor: self.actor,
            action: self.action,
            table: self.table,
            timestamp: Utc::now(),
            old_values: self.old_values,
            new_values: self.new_values,
            affected_columns: self.affected_columns,
            origin_address: self.origin_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_sets_all_fields() {
        let trail = AuditTrail::builder("user-1", AuditAction::Update, "accounts")
            .old_values(json!({"username": "ana"}))
            .new_values(json!({"username": "ana.l"}))
            .affected_columns(vec!["username".to_string()])
            .origin_address(Some("10.0.0.1".to_string()))
            .build();

        assert_eq!(trail.actor(), "user-1");
        assert_eq!(trail.action(), AuditAction::Update);
        assert_eq!(trail.table(), "accounts");
        assert_eq!(trail.affected_columns(), &["username".to_string()]);
        assert_eq!(trail.origin_address(), Some("10.0.0.1"));
        assert!(!trail.id().is_empty());
    }

    #[test]
    fn test_action_serializes_as_snake_case() {
        assert_eq!(serde_json::to_string(&AuditAction::Delete).unwrap(), "\"delete\"");
    }
}
