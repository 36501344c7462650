use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::classify::Classification;

/// Why a run stopped issuing new attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    GlobalTimeout,
    External,
}

impl CancelReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CancelReason::GlobalTimeout => "global_timeout",
            CancelReason::External => "cancelled",
        }
    }
}

/// Terminal status of one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultStatus {
    Success,
    HttpError { status: u16, code: String },
    TransportError { code: String },
    Cancelled(CancelReason),
}

impl ResultStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ResultStatus::Success)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ResultStatus::Cancelled(_))
    }
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultStatus::Success => f.write_str("success"),
            ResultStatus::HttpError { status, code } => write!(f, "{status}/{code}"),
            ResultStatus::TransportError { code } => write!(f, "exception/{code}"),
            ResultStatus::Cancelled(reason) => f.write_str(reason.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised result status {0:?}")]
pub struct ResultStatusParseError(pub String);

impl std::str::FromStr for ResultStatus {
    type Err = ResultStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => return Ok(ResultStatus::Success),
            "global_timeout" => return Ok(ResultStatus::Cancelled(CancelReason::GlobalTimeout)),
            "cancelled" => return Ok(ResultStatus::Cancelled(CancelReason::External)),
            _ => {}
        }
        let (head, code) = s
            .split_once('/')
            .ok_or_else(|| ResultStatusParseError(s.to_string()))?;
        if head == "exception" {
            return Ok(ResultStatus::TransportError {
                code: code.to_string(),
            });
        }
        let status = head
            .parse::<u16>()
            .map_err(|_| ResultStatusParseError(s.to_string()))?;
        Ok(ResultStatus::HttpError {
            status,
            code: code.to_string(),
        })
    }
}

impl Serialize for ResultStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResultStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Outcome of testing one target. Produced exactly once per target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptResult {
    pub target_id: String,
    pub provider_name: String,
    pub category: Option<String>,
    pub timestamp: DateTime<Local>,
    pub status: ResultStatus,
    pub latency_ms: u64,
    pub retries_used: u32,
    pub error_code: String,
    pub error_category: String,
    pub remedy: String,
    pub raw_response: String,
}

impl AttemptResult {
    pub fn new(
        target_id: impl Into<String>,
        provider_name: impl Into<String>,
        category: Option<String>,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self {
            target_id: target_id.into(),
            provider_name: provider_name.into(),
            category,
            timestamp,
            status: ResultStatus::Cancelled(CancelReason::External),
            latency_ms: 0,
            retries_used: 0,
            error_code: String::new(),
            error_category: String::new(),
            remedy: String::new(),
            raw_response: String::new(),
        }
    }

    pub fn record_success(&mut self, latency_ms: u64, body: String) {
        self.status = ResultStatus::Success;
        self.latency_ms = latency_ms;
        self.raw_response = body;
        self.error_code.clear();
        self.error_category.clear();
        self.remedy.clear();
    }

    pub fn record_http_error(&mut self, status: u16, class: Classification, body: String) {
        self.status = ResultStatus::HttpError {
            status,
            code: class.code.clone(),
        };
        self.apply_classification(class);
        self.raw_response = body;
    }

    pub fn record_transport_error(&mut self, class: Classification, message: String) {
        self.status = ResultStatus::TransportError {
            code: class.code.clone(),
        };
        self.apply_classification(class);
        self.raw_response = message;
    }

    /// Marks the result cancelled. Diagnostics of an earlier failed attempt
    /// are kept so the report still shows what went wrong before the stop.
    pub fn record_cancelled(&mut self, reason: CancelReason) {
        self.status = ResultStatus::Cancelled(reason);
    }

    fn apply_classification(&mut self, class: Classification) {
        self.error_code = class.code;
        self.error_category = class.category;
        self.remedy = class.remedy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_parse_back() {
        let cases = [
            ResultStatus::Success,
            ResultStatus::HttpError {
                status: 401,
                code: "invalid_api_key".to_string(),
            },
            ResultStatus::TransportError {
                code: "timeout".to_string(),
            },
            ResultStatus::Cancelled(CancelReason::GlobalTimeout),
            ResultStatus::Cancelled(CancelReason::External),
        ];
        for status in cases {
            let text = status.to_string();
            assert_eq!(text.parse::<ResultStatus>().unwrap(), status, "{text}");
        }
    }

    #[test]
    fn malformed_status_is_rejected() {
        assert!("pending".parse::<ResultStatus>().is_err());
        assert!("abc/def".parse::<ResultStatus>().is_err());
    }
}
