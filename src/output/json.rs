//! JSON output for scripts and CI pipelines

use super::formatter::{FormattingOptions, OutputFormatter};
use crate::{
    binding::BoundConfig,
    config::ValidationWarning,
    error::{ConfigError, Result},
};
use serde_json::{json, Value as Json};

/// Formatter emitting one pretty-printed JSON document per call
pub struct JsonFormatter {
    options: FormattingOptions,
}

impl JsonFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    fn render(&self, document: &Json) -> Result<String> {
        serde_json::to_string_pretty(document)
            .map_err(|e| ConfigError::io(format!("Failed to serialize JSON output: {}", e)))
    }

    /// JSON document for a successful binding pass
    pub fn report_document(&self, config: &BoundConfig) -> Json {
        let fields: Vec<Json> = config
            .fields()
            .iter()
            .map(|field| {
                let value = if field.secret && self.options.mask_secrets {
                    Json::String(crate::defaults::SECRET_MASK.to_string())
                } else {
                    field.value.to_json()
                };
                json!({
                    "name": field.name,
                    "env_var": field.env_var,
                    "origin": field.origin,
                    "secret": field.secret,
                    "value": value,
                })
            })
            .collect();

        json!({
            "config": config.type_name(),
            "prefix": config.prefix(),
            "ok": true,
            "fields": fields,
        })
    }

    /// JSON document for any error; binding errors list their failing fields
    pub fn error_document(&self, error: &ConfigError) -> Json {
        match error {
            ConfigError::Binding { config, failures } => {
                let failures: Vec<Json> = failures
                    .iter()
                    .map(|failure| {
                        json!({
                            "field": failure.field,
                            "env_var": failure.env_var,
                            "value": failure.raw,
                            "category": failure.error.category(),
                            "kind": failure.error.value_kind().map(|k| k.as_str()),
                            "error": failure.error.to_string(),
                        })
                    })
                    .collect();
                json!({
                    "config": config,
                    "ok": false,
                    "failures": failures,
                })
            }
            other => json!({
                "ok": false,
                "category": other.category(),
                "error": other.to_string(),
            }),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        self.render(&json!({ "title": title }))
    }

    fn format_report(&self, config: &BoundConfig) -> Result<String> {
        self.render(&self.report_document(config))
    }

    fn format_failures(&self, error: &ConfigError) -> Result<String> {
        self.render(&self.error_document(error))
    }

    fn format_warnings(&self, warnings: &[ValidationWarning]) -> Result<String> {
        let warnings: Vec<Json> = warnings
            .iter()
            .map(|w| json!({ "level": w.level.as_str(), "message": w.message }))
            .collect();
        self.render(&json!({ "warnings": warnings }))
    }

    fn format_type_list(&self, types: &[&str]) -> Result<String> {
        self.render(&json!({ "types": types }))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        self.render(&json!({ "ok": false, "error": error }))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        self.render(&json!({ "ok": true, "message": message }))
    }
}
