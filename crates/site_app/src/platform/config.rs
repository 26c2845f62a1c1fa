//! `site.ron` configuration. Every field has a default, so a missing file or a
//! partial file is fine; `SITE_API_BASE` overrides the service address.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use site_core::{CoreSettings, LoadingCatalog, LoadingStatus};
use site_engine::ClientSettings;
use site_logging::{site_info, site_warn};
use thiserror::Error;

pub const API_BASE_ENV: &str = "SITE_API_BASE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("loading catalog must not be empty")]
    EmptyCatalog,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub text: String,
    pub audio: String,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub api_base: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub error_sound: Option<String>,
    /// `None` keeps notifications until closed.
    pub notification_dismiss_ms: Option<u64>,
    /// Playback length assumed for notification cues.
    pub cue_duration_ms: u64,
    pub background_video: String,
    pub sign_in_route: String,
    pub loading_catalog: Vec<CatalogEntry>,
    pub store_dir: PathBuf,
    pub session_keys: Vec<String>,
    /// How long the driver waits for a flow to settle before giving up.
    pub settle_timeout_ms: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let core = CoreSettings::default();
        let client = ClientSettings::default();
        Self {
            api_base: client.base_url,
            connect_timeout_ms: client.connect_timeout.as_millis() as u64,
            request_timeout_ms: client.request_timeout.as_millis() as u64,
            error_sound: core.error_sound,
            notification_dismiss_ms: None,
            cue_duration_ms: 800,
            background_video: core.background_video,
            sign_in_route: core.sign_in_route,
            loading_catalog: LoadingCatalog::default()
                .entries()
                .iter()
                .map(|status| CatalogEntry {
                    text: status.text.clone(),
                    audio: status.audio.clone(),
                    duration_ms: 2_500,
                })
                .collect(),
            store_dir: PathBuf::from(".site"),
            session_keys: core.session_keys,
            settle_timeout_ms: 45_000,
        }
    }
}

impl SiteConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = match fs::read_to_string(path) {
            Ok(text) => {
                site_info!("Loaded config from {:?}", path);
                Self::parse(&text)?
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                site_info!("No config at {:?}, using defaults", path);
                Self::default()
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        config.catalog()?;
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base) = lookup(API_BASE_ENV).filter(|base| !base.trim().is_empty()) {
            site_warn!("{} overrides api_base", API_BASE_ENV);
            self.api_base = base;
        }
    }

    pub fn core_settings(&self) -> CoreSettings {
        CoreSettings {
            error_sound: self.error_sound.clone(),
            notification_dismiss: self.notification_dismiss_ms.map(Duration::from_millis),
            background_video: self.background_video.clone(),
            sign_in_route: self.sign_in_route.clone(),
            session_keys: self.session_keys.clone(),
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.api_base.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }

    pub fn catalog(&self) -> Result<LoadingCatalog, ConfigError> {
        let entries = self
            .loading_catalog
            .iter()
            .map(|entry| LoadingStatus::new(entry.text.clone(), entry.audio.clone()))
            .collect();
        LoadingCatalog::new(entries).ok_or(ConfigError::EmptyCatalog)
    }

    /// Known clip lengths by source; anything else cannot be played.
    pub fn clip_durations(&self) -> HashMap<String, Duration> {
        let mut durations: HashMap<String, Duration> = self
            .loading_catalog
            .iter()
            .map(|entry| (entry.audio.clone(), Duration::from_millis(entry.duration_ms)))
            .collect();
        if let Some(sound) = &self.error_sound {
            durations.insert(sound.clone(), Duration::from_millis(self.cue_duration_ms));
        }
        durations
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = SiteConfig::parse(
            r#"(
                api_base: "https://auth.example.com",
                notification_dismiss_ms: Some(4000),
            )"#,
        )
        .unwrap();
        assert_eq!(config.api_base, "https://auth.example.com");
        assert_eq!(
            config.core_settings().notification_dismiss,
            Some(Duration::from_secs(4))
        );
        assert_eq!(config.session_keys, SiteConfig::default().session_keys);
        assert_eq!(config.catalog().unwrap(), LoadingCatalog::default());
    }

    #[test]
    fn environment_overrides_api_base() {
        let mut config = SiteConfig::default();
        config.apply_overrides(|name| {
            (name == API_BASE_ENV).then(|| "https://staging.example.com".to_string())
        });
        assert_eq!(config.client_settings().base_url, "https://staging.example.com");

        config.apply_overrides(|_| Some("  ".to_string()));
        assert_eq!(config.api_base, "https://staging.example.com");
    }

    #[test]
    fn empty_catalog_is_a_config_error() {
        let config = SiteConfig::parse("(loading_catalog: [])").unwrap();
        assert!(matches!(config.catalog(), Err(ConfigError::EmptyCatalog)));
    }

    #[test]
    fn clip_durations_cover_catalog_and_error_cue() {
        let config = SiteConfig::default();
        let durations = config.clip_durations();
        for entry in &config.loading_catalog {
            assert_eq!(
                durations.get(&entry.audio),
                Some(&Duration::from_millis(entry.duration_ms))
            );
        }
        assert!(durations.contains_key("/sounds/error.mp3"));
    }

    #[test]
    fn example_file_matches_defaults() {
        let config = SiteConfig::parse(include_str!("../../site.example.ron")).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = SiteConfig::load(&temp.path().join("absent.ron")).unwrap();
        assert_eq!(config.loading_catalog, SiteConfig::default().loading_catalog);
    }
}
