//! アプリ設定
//!
//! `~/.config/marmat/settings.json` に保存する。
//! 起動時に読み込み、変更のたびに保存する。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 完了・エラーをポップアップで知らせる
    pub popups_enabled: bool,
    pub fullscreen_enabled: bool,
    pub default_metadata_dir: PathBuf,
    pub default_lexicon_dir: PathBuf,
    pub default_results_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            popups_enabled: true,
            fullscreen_enabled: false,
            default_metadata_dir: cwd.clone(),
            default_lexicon_dir: cwd.clone(),
            default_results_dir: cwd,
        }
    }
}

impl Settings {
    /// 既定の場所から読み込み（なければデフォルト）
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// 読めなければ警告を出してデフォルトを使う（次回の保存で上書きされる）
    pub fn load_or_default() -> Self {
        match Self::settings_path() {
            Ok(path) => Self::load_from_or_default(&path),
            Err(e) => {
                tracing::warn!("settings not loaded, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn load_from_or_default(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), "settings not loaded, using defaults: {}", e);
            Self::default()
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    pub fn settings_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("marmat").join("settings.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.popups_enabled);
        assert!(!settings.fullscreen_enabled);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("none.json")).unwrap();
        assert!(settings.popups_enabled);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = Settings::default();
        settings.popups_enabled = false;
        settings.fullscreen_enabled = true;
        settings.default_results_dir = PathBuf::from("/data/out");
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
        assert!(!loaded.popups_enabled);
        assert!(loaded.fullscreen_enabled);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "fullscreen_enabled": true }"#).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert!(loaded.fullscreen_enabled);
        assert!(loaded.popups_enabled);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ invalid }").unwrap();
        assert!(matches!(Settings::load_from(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_corrupt_file_falls_back_and_is_repaired() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ broken").unwrap();

        let mut settings = Settings::load_from_or_default(&path);
        assert_eq!(settings, Settings::default());

        settings.popups_enabled = false;
        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        assert!(!loaded.popups_enabled);
    }
}
