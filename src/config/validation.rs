//! Configuration validation.
//!
//! Catches misconfigurations at startup, before any listener binds: a bad
//! telemetry endpoint or e-mail pattern should fail the process loudly, not
//! surface as per-request errors later.

use regex::Regex;
use std::net::SocketAddr;
use url::Url;

use crate::config::schema::AppConfig;

/// One rejected configuration value.
#[derive(Debug)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn err(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Validate a loaded configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(err("listener.bind_address", "not a valid socket address"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(err("timeouts.request_secs", "must be greater than zero"));
    }

    if config.database.enabled && config.database.dsn.is_empty() {
        errors.push(err("database.dsn", "required when database is enabled"));
    }

    if config.telemetry.enabled {
        match Url::parse(&config.telemetry.endpoint) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(_) => errors.push(err("telemetry.endpoint", "must be an http(s) URL")),
            Err(_) => errors.push(err("telemetry.endpoint", "not a valid URL")),
        }
        if config.telemetry.license_key.is_empty() {
            errors.push(err("telemetry.license_key", "required when telemetry is enabled"));
        }
        if config.telemetry.header_name.is_empty() {
            errors.push(err("telemetry.header_name", "must not be empty"));
        }
    }

    if config.audit.max_body_bytes == 0 {
        errors.push(err("audit.max_body_bytes", "must be greater than zero"));
    }

    if config.auth.token_ttl_secs == 0 {
        errors.push(err("auth.token_ttl_secs", "must be greater than zero"));
    }

    if let Err(parse_err) = Regex::new(&config.validation.email_pattern) {
        errors.push(err(
            "validation.email_pattern",
            format!("invalid regular expression: {parse_err}"),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(err(
            "observability.metrics_address",
            "not a valid socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
