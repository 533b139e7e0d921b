use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Liveness {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<String>,
}

impl Liveness {
    pub fn ok(uptime: Option<String>) -> Self {
        Self {
            status: "ok".to_string(),
            uptime,
        }
    }
}

/// Outcome of a single dependency check inside a health report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(into = "String", from = "String")]
pub enum CheckStatus {
    Ok,
    Unknown,
    Error(String),
}

impl CheckStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Ok)
    }
}

impl From<CheckStatus> for String {
    fn from(status: CheckStatus) -> Self {
        match status {
            CheckStatus::Ok => "ok".to_string(),
            CheckStatus::Unknown => "unknown".to_string(),
            CheckStatus::Error(msg) => format!("error: {}", msg),
        }
    }
}

impl From<String> for CheckStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ok" => CheckStatus::Ok,
            "unknown" => CheckStatus::Unknown,
            other => CheckStatus::Error(
                other.strip_prefix("error: ").unwrap_or(other).to_string(),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub uptime: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Keyed by dependency name; always contains `api`.
    pub checks: BTreeMap<String, CheckStatus>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// Result of a bounded connection attempt against `host:port`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbeResult {
    pub host: String,
    pub port: u16,
    pub reachable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

impl ProbeResult {
    pub fn reachable(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
            reachable: true,
            error: None,
            response: None,
        }
    }

    pub fn unreachable(host: &str, port: u16, error: impl Into<String>) -> Self {
        Self {
            host: host.to_string(),
            port,
            reachable: false,
            error: Some(error.into()),
            response: None,
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub dns_server: String,
    pub resolutions: BTreeMap<String, Vec<String>>,
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTask {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub done: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.done.is_none()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Cache,
    Database,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheWrite {
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<Vec<String>>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            endpoints: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_status_serializes_as_plain_string() {
        let mut checks = BTreeMap::new();
        checks.insert("api".to_string(), CheckStatus::Ok);
        checks.insert("redis".to_string(), CheckStatus::Error("connection refused".into()));
        let report = HealthReport {
            status: HealthStatus::Degraded,
            uptime: "1.00".into(),
            environment: None,
            checks,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["checks"]["api"], "ok");
        assert_eq!(json["checks"]["redis"], "error: connection refused");
        assert!(json.get("environment").is_none());
    }

    #[test]
    fn check_status_parses_error_prefix() {
        assert_eq!(CheckStatus::from("ok".to_string()), CheckStatus::Ok);
        assert_eq!(
            CheckStatus::from("error: timed out".to_string()),
            CheckStatus::Error("timed out".into())
        );
    }

    #[test]
    fn probe_result_omits_absent_fields() {
        let json = serde_json::to_value(ProbeResult::reachable("postgres", 5432)).unwrap();
        assert_eq!(json, serde_json::json!({"host": "postgres", "port": 5432, "reachable": true}));
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(TaskPatch::default().is_empty());
        let patch: TaskPatch = serde_json::from_str(r#"{"done": false}"#).unwrap();
        assert!(!patch.is_empty());
    }
}
