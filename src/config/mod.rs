pub mod actions;
mod defaults;
pub mod key;
pub mod keybindings;
pub mod loader;
pub mod resolver;

use std::time::Duration;

pub use actions::*;
use keybindings::KeybindingsConfig;
pub use loader::{load, save_last_search};
pub use resolver::KeyResolver;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout. Zero disables it.
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub const fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3333".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// When false, every permission request is denied.
    pub enabled: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            latitude: None,
            longitude: None,
        }
    }
}

/// The state and city searched in the previous run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub uf: String,
    pub city: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
    #[serde(default)]
    pub last_search: Option<SearchConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();

        assert_eq!(config.api, ApiConfig::default());
        assert!(config.location.enabled);
        assert!(config.last_search.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://ecoleta.example.com"

            [location]
            latitude = -19.9167
            longitude = -43.9345

            [last_search]
            uf = "MG"
            city = "Belo Horizonte"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://ecoleta.example.com");
        assert_eq!(config.api.timeout(), Some(Duration::from_secs(10)));
        assert!(config.location.enabled);
        assert_eq!(config.location.latitude, Some(-19.9167));
        assert_eq!(config.last_search.unwrap().city, "Belo Horizonte");
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let config: AppConfig = toml::from_str(
            r#"
            [api]
            timeout_secs = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.api.timeout(), None);
    }
}
