use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::markup::validate_template;
use crate::core::config::DEFAULT_THEME;
use crate::errors::ThemeError;

const MAX_THEME_NAME_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeInfo {
    pub name: String,
    pub modified: Option<DateTime<Utc>>,
}

/// File-backed theme templates, one `<name>.html` per theme.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    dir: PathBuf,
    default_theme: String,
}

/// Theme names become file names, so only `[A-Za-z0-9_-]` is accepted.
///
/// # Errors
///
/// Returns `ThemeError::InvalidName` for empty, overlong or non-conforming names.
pub fn validate_theme_name(name: &str) -> Result<(), ThemeError> {
    let ok = !name.is_empty()
        && name.len() <= MAX_THEME_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(ThemeError::InvalidName(name.to_string()))
    }
}

impl ThemeStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            default_theme: DEFAULT_THEME.to_string(),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.html"))
    }

    async fn read_if_exists(&self, name: &str) -> Result<Option<String>, ThemeError> {
        if validate_theme_name(name).is_err() {
            return Ok(None);
        }
        match tokio::fs::read_to_string(self.path_for(name)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ThemeError::Io(e)),
        }
    }

    /// Resolves the card template for `name`, falling back to the default theme.
    ///
    /// # Errors
    ///
    /// Returns `ThemeError::DefaultThemeMissing` when neither the requested
    /// theme nor the default exists, and `ThemeError::Io` on read failures.
    pub async fn get_template(&self, name: &str) -> Result<String, ThemeError> {
        if let Some(content) = self.read_if_exists(name).await? {
            return Ok(content);
        }

        if name != self.default_theme {
            warn!(theme = %name, fallback = %self.default_theme, "Theme not found, using default");
            if let Some(content) = self.read_if_exists(&self.default_theme).await? {
                return Ok(content);
            }
        }

        Err(ThemeError::DefaultThemeMissing(self.default_theme.clone()))
    }

    /// Loads a theme without fallback.
    ///
    /// # Errors
    ///
    /// Returns `ThemeError::NotFound` when the theme does not exist.
    pub async fn load(&self, name: &str) -> Result<String, ThemeError> {
        validate_theme_name(name)?;
        self.read_if_exists(name)
            .await?
            .ok_or_else(|| ThemeError::NotFound(name.to_string()))
    }

    /// Validates and writes a theme. Invalid templates are never written.
    ///
    /// # Errors
    ///
    /// Returns `ThemeError::InvalidName`, `ThemeError::MissingPlaceholder`, or
    /// `ThemeError::Io`.
    pub async fn save(&self, name: &str, content: &str) -> Result<(), ThemeError> {
        validate_theme_name(name)?;
        validate_template(content)?;

        tokio::fs::create_dir_all(&self.dir).await?;

        // Write-then-rename so readers never observe a half-written template.
        let tmp = self.dir.join(format!(".{name}.html.tmp"));
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, self.path_for(name)).await?;

        info!(theme = %name, bytes = content.len(), "Theme saved");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ThemeError::NotFound` when the theme does not exist. The default
    /// theme cannot be deleted because template resolution depends on it.
    pub async fn delete(&self, name: &str) -> Result<(), ThemeError> {
        validate_theme_name(name)?;
        if name == self.default_theme {
            return Err(ThemeError::Protected(name.to_string()));
        }
        match tokio::fs::remove_file(self.path_for(name)).await {
            Ok(()) => {
                info!(theme = %name, "Theme deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ThemeError::NotFound(name.to_string()))
            }
            Err(e) => Err(ThemeError::Io(e)),
        }
    }

    /// Lists available themes sorted by name. A missing directory is an empty list.
    ///
    /// # Errors
    ///
    /// Returns `ThemeError::Io` if the directory exists but cannot be read.
    pub async fn list(&self) -> Result<Vec<ThemeInfo>, ThemeError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ThemeError::Io(e)),
        };

        let mut themes = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("html") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if validate_theme_name(name).is_err() {
                continue;
            }
            let modified = entry
                .metadata()
                .await
                .ok()
                .and_then(|m| m.modified().ok())
                .map(DateTime::<Utc>::from);
            themes.push(ThemeInfo {
                name: name.to_string(),
                modified,
            });
        }

        themes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(themes)
    }
}
