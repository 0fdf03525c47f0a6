use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "profile_editor.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".into(),
            request_timeout_secs: 30,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then the config file, then the environment.
///
/// An explicitly named config file must exist; the default one is optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    let raw = match config_path {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read config '{}'", path.display()))?,
        ),
        None => fs::read_to_string(DEFAULT_CONFIG_FILE).ok(),
    };
    if let Some(raw) = raw {
        apply_file(&mut settings, &raw)?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut ClientSettings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw).context("invalid profile editor config")?;
    if let Some(v) = file_cfg.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    Ok(())
}

fn apply_env(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = parsed,
            Err(_) => tracing::warn!(value = %v, "ignoring non-numeric APP__REQUEST_TIMEOUT_SECS"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let mut settings = ClientSettings::default();
        apply_file(
            &mut settings,
            "api_base_url = \"https://api.example.org\"\nrequest_timeout_secs = 5\n",
        )
        .expect("parse");

        assert_eq!(settings.api_base_url, "https://api.example.org");
        assert_eq!(settings.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn prefixed_env_wins_over_plain_env() {
        let env: HashMap<&str, &str> = [
            ("API_BASE_URL", "http://plain"),
            ("APP__API_BASE_URL", "http://prefixed"),
            ("APP__REQUEST_TIMEOUT_SECS", "soon"),
        ]
        .into_iter()
        .collect();
        let mut settings = ClientSettings::default();

        apply_env(&mut settings, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.api_base_url, "http://prefixed");
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut settings = ClientSettings::default();
        assert!(apply_file(&mut settings, "request_timeout_secs = \"ten\"").is_err());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let missing = std::env::temp_dir().join("profile_editor_missing_config_for_test.toml");
        assert!(load_settings(Some(&missing)).is_err());
    }
}
