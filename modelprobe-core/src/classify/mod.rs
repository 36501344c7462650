//! Static error handbook mapping failure signals to a category and remedy.

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::types::TransportFailureKind;

pub const UNKNOWN_CODE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub code: String,
    pub category: String,
    pub remedy: String,
}

/// Classifies failed attempts. Implementations must be pure: the same input
/// always yields the same classification, and nothing panics.
pub trait ErrorClassifier: Send + Sync {
    fn classify_http(&self, status: u16, body: &str) -> Classification;

    fn classify_transport(&self, kind: TransportFailureKind, message: &str) -> Classification;
}

/// The built-in handbook.
#[derive(Debug, Clone, Copy, Default)]
pub struct Handbook;

struct Entry {
    category: &'static str,
    remedy: &'static str,
}

fn lookup(key: &str) -> Option<Entry> {
    let (category, remedy) = match key {
        "400" => (
            "bad request",
            "Check the request parameters, in particular the model name and that values such as temperature are in range.",
        ),
        "401" => (
            "authentication failed",
            "The API key is invalid or expired; update the key.",
        ),
        "403" => (
            "permission denied",
            "The API key is not allowed to use this model; ask the provider to upgrade access.",
        ),
        "404" => (
            "not found",
            "The model does not exist or the endpoint URL is wrong; check the model id and base URL.",
        ),
        "429" => (
            "rate limited",
            "The rate limit was exceeded; lower the request rate or ask the provider for a higher limit.",
        ),
        "500" => (
            "server error",
            "The provider had an internal error; retry later or contact provider support.",
        ),
        "502" => ("bad gateway", "The provider gateway failed; retry later."),
        "503" => (
            "service unavailable",
            "The provider is temporarily unavailable, possibly for maintenance; retry later.",
        ),
        "504" => (
            "gateway timeout",
            "The provider timed out upstream; check connectivity or retry later.",
        ),
        "model_not_found" => (
            "model not found",
            "The requested model id does not exist; check the model name.",
        ),
        "context_length_exceeded" => (
            "context length exceeded",
            "The prompt is longer than the model context window; shorten it or use a longer-context model.",
        ),
        "content_filter" => (
            "content filtered",
            "The request was blocked by the provider content filter; change the prompt.",
        ),
        "quota_exceeded" => (
            "quota exceeded",
            "The account quota is used up; top up the account or raise the quota.",
        ),
        "connection_error" => (
            "connection error",
            "Could not connect to the provider API; check network connectivity and firewall settings.",
        ),
        "timeout" => (
            "request timeout",
            "The request timed out; retry later or raise the request timeout.",
        ),
        "ssl_error" => (
            "TLS error",
            "TLS certificate verification failed; check the system certificate store.",
        ),
        "protocol_error" => (
            "protocol error",
            "The server answer was not valid HTTP; check the base URL and any proxy in between.",
        ),
        UNKNOWN_CODE => (
            "unknown error",
            "An unknown error occurred; inspect the raw response and contact provider support.",
        ),
        _ => return None,
    };
    Some(Entry { category, remedy })
}

fn unknown() -> Entry {
    lookup(UNKNOWN_CODE).unwrap_or(Entry {
        category: "unknown error",
        remedy: "",
    })
}

/// Extracts `error.type`, falling back to `error.code`, from a JSON body.
fn body_error_code(body: &str) -> Option<String> {
    let parsed: JsonValue = serde_json::from_str(body).ok()?;
    let error = parsed.get("error")?;
    let code = error.get("type").or_else(|| error.get("code"))?;
    match code {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl ErrorClassifier for Handbook {
    fn classify_http(&self, status: u16, body: &str) -> Classification {
        let mut entry = lookup(&status.to_string()).unwrap_or_else(unknown);
        let code = body_error_code(body).unwrap_or_else(|| UNKNOWN_CODE.to_string());
        if code != UNKNOWN_CODE {
            if let Some(specific) = lookup(&code) {
                entry = specific;
            }
        }
        Classification {
            code,
            category: entry.category.to_string(),
            remedy: entry.remedy.to_string(),
        }
    }

    fn classify_transport(&self, kind: TransportFailureKind, message: &str) -> Classification {
        let code = kind.code();
        let entry = lookup(code).unwrap_or_else(unknown);
        let remedy = match kind {
            TransportFailureKind::Protocol if !message.is_empty() => {
                format!("HTTP client error: {message}. {}", entry.remedy)
            }
            _ => entry.remedy.to_string(),
        };
        Classification {
            code: code.to_string(),
            category: entry.category.to_string(),
            remedy,
        }
    }
}
