use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::errors::ConfigError;
use crate::prompt::DEFAULT_SYSTEM_CONTENT;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";
pub const DEFAULT_MODEL: &str = "qwen-plus";
pub const DEFAULT_THEME: &str = "light";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(alias = "DASHSCOPE_API_KEY")]
    pub api_key: String,
    #[serde(alias = "BASE_URL")]
    pub base_url: String,
    pub model: String,
    #[serde(alias = "SYSTEM_CONTENT")]
    pub system_content: String,
    #[serde(alias = "THEME")]
    pub theme: String,
    pub themes_dir: PathBuf,
    /// `["*"]` allows every origin.
    #[serde(alias = "CORS_ORIGIN", deserialize_with = "de_origins")]
    pub cors_origin: Vec<String>,
    pub bind_addr: String,
    pub upstream_timeout_secs: u64,
    #[serde(skip_serializing)]
    pub admin_token: Option<String>,
    /// Where admin updates are written back to.
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_content: DEFAULT_SYSTEM_CONTENT.to_string(),
            theme: DEFAULT_THEME.to_string(),
            themes_dir: PathBuf::from("themes"),
            cors_origin: vec!["*".to_string()],
            bind_addr: "0.0.0.0:3000".to_string(),
            upstream_timeout_secs: 60,
            admin_token: None,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }
}

impl AppConfig {
    /// Loads the config file named by `AI_SUMMARY_CONFIG` (if present) and
    /// overlays process environment variables on top.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` or `ConfigError::Parse` when the file exists but
    /// cannot be read or parsed, and `ConfigError::Missing` or
    /// `ConfigError::Invalid` when the merged result fails [`AppConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = env::var("AI_SUMMARY_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load(&path, |key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn load<F>(path: &Path, var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            serde_json::from_str::<AppConfig>(&raw)?
        } else {
            AppConfig::default()
        };
        config.config_path = path.to_path_buf();
        config.apply_env(var)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = var("LLM_API_KEY").or_else(|| var("DASHSCOPE_API_KEY")) {
            self.api_key = v;
        }
        if let Some(v) = var("LLM_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = var("LLM_MODEL") {
            self.model = v;
        }
        if let Some(v) = var("SYSTEM_CONTENT") {
            self.system_content = v;
        }
        if let Some(v) = var("THEME") {
            self.theme = v;
        }
        if let Some(v) = var("THEMES_DIR") {
            self.themes_dir = PathBuf::from(v);
        }
        if let Some(v) = var("CORS_ORIGIN") {
            self.cors_origin = split_origins(&v);
        }
        if let Some(v) = var("BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Some(v) = var("UPSTREAM_TIMEOUT_SECS") {
            self.upstream_timeout_secs = v
                .parse()
                .map_err(|e| ConfigError::Invalid("UPSTREAM_TIMEOUT_SECS", format!("{e}")))?;
        }
        if let Some(v) = var("ADMIN_TOKEN").filter(|v| !v.is_empty()) {
            self.admin_token = Some(v);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Missing` without an API key, and
    /// `ConfigError::Invalid` for an unparseable base URL or bind address or a
    /// zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("LLM_API_KEY"));
        }
        Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid("LLM_BASE_URL", e.to_string()))?;
        self.bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid("BIND_ADDR", e.to_string()))?;
        if self.upstream_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "UPSTREAM_TIMEOUT_SECS",
                "must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Writes `changes` into the config file, keeping every other key the file
    /// already holds. Values that only came from the environment are never
    /// written. Legacy upper-case spellings of a changed key are dropped so the
    /// file keeps one spelling per field.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read or written, and
    /// `ConfigError::Parse` if the existing file is not a JSON object.
    pub async fn persist(&self, changes: &Map<String, Value>) -> Result<(), ConfigError> {
        let existing = tokio::fs::read_to_string(&self.config_path).await;
        let mut file: Map<String, Value> = match existing {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(ConfigError::Io(e)),
        };

        for (key, value) in changes {
            for (field, legacy) in LEGACY_KEYS {
                if *field == key.as_str() {
                    file.remove(*legacy);
                }
            }
            file.insert(key.clone(), value.clone());
        }

        let body = serde_json::to_string_pretty(&Value::Object(file))?;
        tokio::fs::write(&self.config_path, body).await?;
        Ok(())
    }

    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origin.iter().any(|o| o == "*")
    }

    #[must_use]
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// API key with everything but the last four characters hidden.
    #[must_use]
    pub fn masked_api_key(&self) -> String {
        let count = self.api_key.chars().count();
        if count <= 4 {
            return "*".repeat(count);
        }
        let tail: String = self.api_key.chars().skip(count - 4).collect();
        format!("{}{tail}", "*".repeat(count - 4))
    }
}

/// Field names paired with the upper-case keys older config files use.
const LEGACY_KEYS: &[(&str, &str)] = &[
    ("api_key", "DASHSCOPE_API_KEY"),
    ("base_url", "BASE_URL"),
    ("system_content", "SYSTEM_CONTENT"),
    ("theme", "THEME"),
    ("cors_origin", "CORS_ORIGIN"),
];

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Accepts either a single origin string (possibly comma separated) or a list.
fn de_origins<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Origins {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Origins::deserialize(deserializer)? {
        Origins::One(s) => split_origins(&s),
        Origins::Many(v) => v,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_all_but_last_four() {
        let config = AppConfig {
            api_key: "sk-abcdef123456".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.masked_api_key(), "***********3456");
    }

    #[test]
    fn short_keys_are_fully_masked() {
        let config = AppConfig {
            api_key: "abc".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.masked_api_key(), "***");
    }

    #[test]
    fn splits_comma_separated_origins() {
        assert_eq!(
            split_origins("https://a.example, https://b.example,"),
            vec!["https://a.example", "https://b.example"]
        );
    }
}
