use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::error::{ValidationError, Violation};

/// Structural request body with one field overwritten per target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestTemplate {
    pub body: JsonValue,
    /// Top-level field that receives the target id.
    #[serde(default = "default_placeholder_field")]
    pub placeholder_field: String,
}

fn default_placeholder_field() -> String {
    "model".to_string()
}

impl Default for RequestTemplate {
    fn default() -> Self {
        Self {
            body: json!({
                "messages": [
                    {"role": "user", "content": "Respond with 'OK'"}
                ],
                "model": "placeholder",
                "temperature": 0.1,
                "max_tokens": 5
            }),
            placeholder_field: default_placeholder_field(),
        }
    }
}

impl RequestTemplate {
    pub fn new(body: JsonValue) -> Self {
        Self {
            body,
            placeholder_field: default_placeholder_field(),
        }
    }

    /// Copy of the template with the placeholder set to `target_id`.
    pub fn render(&self, target_id: &str) -> JsonValue {
        let mut body = self.body.clone();
        if let Some(obj) = body.as_object_mut() {
            obj.insert(
                self.placeholder_field.clone(),
                JsonValue::String(target_id.to_string()),
            );
        }
        body
    }
}

/// Knobs of one run. Immutable once the run starts.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub max_workers: usize,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub global_timeout: Duration,
    pub status_refresh_interval: Duration,
    pub request_template: RequestTemplate,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_workers: 50,
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
            global_timeout: Duration::from_secs(300),
            status_refresh_interval: Duration::from_millis(200),
            request_template: RequestTemplate::default(),
        }
    }
}

impl RunConfig {
    /// Worker bound actually used for `target_count` targets.
    pub fn effective_workers(&self, target_count: usize) -> usize {
        self.max_workers.min(target_count)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        if self.max_workers == 0 {
            violations.push(Violation::new("max_workers", "must be at least 1"));
        }
        if self.request_timeout.is_zero() {
            violations.push(Violation::new("request_timeout", "must be greater than zero"));
        }
        if self.global_timeout.is_zero() {
            violations.push(Violation::new("global_timeout", "must be greater than zero"));
        }
        if self.status_refresh_interval.is_zero() {
            violations.push(Violation::new(
                "status_refresh_interval",
                "must be greater than zero",
            ));
        }
        if !self.request_template.body.is_object() {
            violations.push(Violation::new(
                "request_template.body",
                "must be a JSON object",
            ));
        }
        if self.request_template.placeholder_field.is_empty() {
            violations.push(Violation::new(
                "request_template.placeholder_field",
                "must not be empty",
            ));
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_overwrites_placeholder_only() {
        let t = RequestTemplate::default();
        let body = t.render("gpt-4o-mini");
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 5);
        assert_eq!(t.body["model"], "placeholder");
    }

    #[test]
    fn defaults_validate() {
        RunConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_workers_rejected() {
        let cfg = RunConfig {
            max_workers: 0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.violations[0].path, "max_workers");
    }

    #[test]
    fn effective_workers_is_bounded_by_targets() {
        let cfg = RunConfig {
            max_workers: 8,
            ..Default::default()
        };
        assert_eq!(cfg.effective_workers(3), 3);
        assert_eq!(cfg.effective_workers(20), 8);
    }
}
