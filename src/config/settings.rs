//! Application settings loading from config.toml
//!
//! This module provides functionality to load application settings from a
//! TOML configuration file: the category names provisioned for new users,
//! the statistics cache TTL, and the optional SMTP settings for alert
//! delivery. A missing file falls back to built-in defaults; a malformed
//! file is an error.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Category names provisioned for every newly registered user
    pub default_categories: Vec<String>,
    /// Statistics cache time-to-live in seconds
    pub cache_ttl_secs: u64,
    /// SMTP settings; alert emails are disabled when absent
    pub notifications: Option<NotificationSettings>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_categories: ["Food", "Transport", "Utilities", "Entertainment"]
                .into_iter()
                .map(String::from)
                .collect(),
            cache_ttl_secs: 15 * 60,
            notifications: None,
        }
    }
}

/// SMTP relay settings for the notification worker
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationSettings {
    /// Relay host name (e.g. "smtp.example.com")
    pub smtp_server: String,
    /// Relay port
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// Relay login
    pub username: String,
    /// Relay password
    pub password: String,
    /// Sender address on outgoing alerts
    pub from_email: String,
}

const fn default_smtp_port() -> u16 {
    587
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file exists but cannot be read, the TOML syntax
/// is invalid, or required fields are missing.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<AppSettings> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(AppSettings::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.display()),
    })
}

/// Loads settings from the default location (./config.toml)
pub fn load_default_settings() -> Result<AppSettings> {
    load_settings("config.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_defaults_when_file_is_absent() {
        let settings = load_settings("/nonexistent/config.toml").unwrap();
        assert_eq!(
            settings.default_categories,
            vec!["Food", "Transport", "Utilities", "Entertainment"]
        );
        assert_eq!(settings.cache_ttl_secs, 900);
        assert!(settings.notifications.is_none());
    }

    #[test]
    fn test_parse_full_settings() {
        let toml_str = r#"
            default_categories = ["Rent", "Groceries"]
            cache_ttl_secs = 60

            [notifications]
            smtp_server = "smtp.example.com"
            username = "mailer"
            password = "hunter2"
            from_email = "alerts@example.com"
        "#;

        let settings: AppSettings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.default_categories, vec!["Rent", "Groceries"]);
        assert_eq!(settings.cache_ttl_secs, 60);

        let smtp = settings.notifications.unwrap();
        assert_eq!(smtp.smtp_server, "smtp.example.com");
        assert_eq!(smtp.smtp_port, 587);
        assert_eq!(smtp.from_email, "alerts@example.com");
    }

    #[test]
    fn test_partial_settings_keep_defaults() {
        let toml_str = r#"cache_ttl_secs = 30"#;

        let settings: AppSettings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.cache_ttl_secs, 30);
        assert_eq!(settings.default_categories.len(), 4);
    }
}
