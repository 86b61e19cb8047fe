use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Generic `{"ok": true}` acknowledgement returned by mutating endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct AckResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

/// Aggregate statistics for the dashboard header. Replaced wholesale on
/// every successful refresh, never merged field-by-field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarySnapshot {
    pub total_alerts: i64,
    pub avg_cpu: f64,
    pub avg_memory: f64,
    #[serde(default)]
    pub alerts_by_type: HashMap<String, i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Cpu,
    Memory,
}

/// One collected sample. The backend returns these newest-first; chart
/// consumers must reverse into chronological order (see `dashboard::series`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub id: i64,
    pub metric_type: MetricKind,
    pub value: f64,
    pub ts: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: i64,
    pub alert_type: String,
    pub value: f64,
    pub ts: String,
}

/// Alerting thresholds as stored on the backend. Both fields are optional:
/// a fresh deployment has no thresholds configured yet, and a save may
/// update just one of them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub cpu_threshold: Option<f64>,
    pub mem_threshold: Option<f64>,
}

/// Partial update body for `POST /api/thresholds`. Unset fields are left
/// out of the JSON entirely so the backend keeps their current values.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct UpdateThresholdsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mem_threshold: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateThresholdsResponse {
    pub ok: bool,
    #[serde(default)]
    pub updated: ThresholdConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_threshold_update_omits_unset_fields() {
        let body = UpdateThresholdsRequest {
            cpu_threshold: Some(92.5),
            mem_threshold: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "cpu_threshold": 92.5 }));

        let empty = serde_json::to_value(UpdateThresholdsRequest::default()).unwrap();
        assert_eq!(empty, serde_json::json!({}));
    }

    #[test]
    fn metric_kind_uses_lowercase_wire_names() {
        let sample: MetricSample = serde_json::from_value(serde_json::json!({
            "id": 7,
            "metric_type": "memory",
            "value": 63.2,
            "ts": "2025-06-01 12:00:00"
        }))
        .unwrap();
        assert_eq!(sample.metric_type, MetricKind::Memory);
        assert_eq!(
            serde_json::to_value(MetricKind::Cpu).unwrap(),
            serde_json::json!("cpu")
        );
    }
}
