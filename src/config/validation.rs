//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check mount paths are absolute and do not shadow each other
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue};

use crate::config::schema::ServerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending setting, e.g. `webhook.path`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("{:?} is not a socket address", config.listener.bind_address),
        ));
    }

    if config.content.data_dir.as_os_str().is_empty() {
        errors.push(ValidationError::new("content.data_dir", "must be set"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.webhook.enabled {
        check_mount_path(&mut errors, "webhook.path", &config.webhook.path);
        if config.webhook.secret.as_deref() == Some("") {
            errors.push(ValidationError::new("webhook.secret", "must not be empty when set"));
        }
    }

    if config.admin.enabled {
        check_mount_path(&mut errors, "admin.path_prefix", &config.admin.path_prefix);
        if config.admin.path_prefix.trim_end_matches('/').is_empty() {
            errors.push(ValidationError::new("admin.path_prefix", "must not be the site root"));
        }
        if config.admin.api_key.is_empty() {
            errors.push(ValidationError::new("admin.api_key", "must be set when admin is enabled"));
        }
    }

    if config.webhook.enabled && config.admin.enabled {
        let prefix = config.admin.path_prefix.trim_end_matches('/');
        let path = config.webhook.path.as_str();
        let nested = path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
        if !prefix.is_empty() && nested {
            errors.push(ValidationError::new(
                "webhook.path",
                format!("{path} is inside admin.path_prefix {prefix}"),
            ));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("{:?} is not a socket address", config.observability.metrics_address),
        ));
    }

    for (name, value) in &config.headers {
        if HeaderName::try_from(name.as_str()).is_err() {
            errors.push(ValidationError::new(format!("headers.{name}"), "invalid header name"));
        }
        if HeaderValue::try_from(value.as_str()).is_err() {
            errors.push(ValidationError::new(format!("headers.{name}"), "invalid header value"));
        }
    }

    for (i, domain) in config.domains.iter().enumerate() {
        let name = domain.strip_prefix("*.").unwrap_or(domain);
        let plain = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
        if !plain {
            errors.push(ValidationError::new(
                format!("domains[{i}]"),
                format!("{domain:?} is not a host name"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_mount_path(errors: &mut Vec<ValidationError>, field: &str, path: &str) {
    if !path.starts_with('/') {
        errors.push(ValidationError::new(field, format!("{path:?} must start with '/'")));
    }
    if path.contains(['?', '#']) || path.chars().any(char::is_whitespace) {
        errors.push(ValidationError::new(field, format!("{path:?} is not a plain path")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.webhook.path = "webhooks/reload".into();
        config.headers.insert("bad header".into(), "v".into());

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "timeouts.request_secs",
                "webhook.path",
                "headers.bad header",
            ]
        );
    }

    #[test]
    fn test_webhook_inside_admin_prefix() {
        let mut config = ServerConfig::default();
        config.admin.enabled = true;
        config.webhook.path = "/admin/reload".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "webhook.path");

        config.webhook.path = "/administrivia".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_domains_must_be_host_names() {
        let mut config = ServerConfig::default();
        config.domains = vec![
            "blog.example.com".into(),
            "*.example.org".into(),
            "https://example.com".into(),
            "example.com:8080".into(),
            "".into(),
        ];

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["domains[2]", "domains[3]", "domains[4]"]);
    }
}
