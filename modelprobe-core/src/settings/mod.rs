//! Optional run settings file (JSON or YAML). Every field is optional and
//! overrides the built-in default; command line flags override the file.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{ParseError, ValidationError, Violation};
use crate::types::{RequestTemplate, RunConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    Json,
    Yaml,
    Auto,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSettings {
    pub max_workers: Option<usize>,
    pub request_timeout_secs: Option<f64>,
    pub max_retries: Option<u32>,
    pub global_timeout_secs: Option<f64>,
    pub status_refresh_secs: Option<f64>,
    pub request_template: Option<JsonValue>,
    pub placeholder_field: Option<String>,
}

pub fn parse_settings_str(input: &str, format: SettingsFormat) -> Result<RunSettings, ParseError> {
    match format {
        SettingsFormat::Json => Ok(serde_json::from_str(input)?),
        SettingsFormat::Yaml => Ok(serde_yaml::from_str(input)?),
        SettingsFormat::Auto => parse_settings_auto(input),
    }
}

fn parse_settings_auto(input: &str) -> Result<RunSettings, ParseError> {
    // JSON always starts with `{` after trimming; YAML is a superset otherwise.
    let trimmed = input.trim_start();
    if trimmed.starts_with('{') {
        return match serde_json::from_str(input) {
            Ok(s) => Ok(s),
            Err(e) => serde_yaml::from_str(input).map_err(|_| ParseError::Json(e)),
        };
    }
    if trimmed.is_empty() {
        return Ok(RunSettings::default());
    }
    match serde_yaml::from_str(input) {
        Ok(s) => Ok(s),
        Err(yaml_err) => match serde_json::from_str(input) {
            Ok(s) => Ok(s),
            Err(_) => Err(ParseError::Yaml(yaml_err)),
        },
    }
}

impl RunSettings {
    /// Overlays these settings on `base`.
    pub fn apply(&self, base: RunConfig) -> Result<RunConfig, ValidationError> {
        let mut violations = Vec::new();
        let mut cfg = base;

        if let Some(n) = self.max_workers {
            cfg.max_workers = n;
        }
        if let Some(n) = self.max_retries {
            cfg.max_retries = n;
        }
        if let Some(d) = secs(self.request_timeout_secs, "request_timeout_secs", &mut violations) {
            cfg.request_timeout = d;
        }
        if let Some(d) = secs(self.global_timeout_secs, "global_timeout_secs", &mut violations) {
            cfg.global_timeout = d;
        }
        if let Some(d) = secs(self.status_refresh_secs, "status_refresh_secs", &mut violations) {
            cfg.status_refresh_interval = d;
        }
        if let Some(body) = &self.request_template {
            cfg.request_template = RequestTemplate {
                body: body.clone(),
                placeholder_field: cfg.request_template.placeholder_field,
            };
        }
        if let Some(field) = &self.placeholder_field {
            cfg.request_template.placeholder_field = field.clone();
        }

        if !violations.is_empty() {
            return Err(ValidationError::new(violations));
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn secs(value: Option<f64>, path: &str, violations: &mut Vec<Violation>) -> Option<Duration> {
    let v = value?;
    match Duration::try_from_secs_f64(v) {
        Ok(d) => Some(d),
        Err(_) => {
            violations.push(Violation::new(path, format!("{v} is not a valid number of seconds")));
            None
        }
    }
}
