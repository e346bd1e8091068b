use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::{AppConfig, SearchConfig};

const CONFIG_DIR: &str = "ecoleta";
const CONFIG_FILE: &str = "config.toml";

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR))
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

pub fn load() -> color_eyre::Result<AppConfig> {
    let Some(path) = config_path() else {
        debug!("No config directory found, using defaults");
        return Ok(AppConfig::default());
    };
    load_from(&path)
}

pub fn load_from(path: &Path) -> color_eyre::Result<AppConfig> {
    if !path.exists() {
        debug!("Config file not found at {path:?}, using defaults");
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    debug!("Loaded config from {path:?}");
    Ok(config)
}

pub fn save_to(path: &Path, config: &AppConfig) -> color_eyre::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    debug!("Saved config to {path:?}");
    Ok(())
}

/// Remember the state and city of this run for the next start.
pub fn save_last_search(uf: &str, city: &str) -> color_eyre::Result<()> {
    let Some(path) = config_path() else {
        warn!("Could not determine config directory");
        return Ok(());
    };

    let mut config = load_from(&path).unwrap_or_default();
    config.last_search = Some(SearchConfig {
        uf: uf.to_string(),
        city: city.to_string(),
    });
    save_to(&path, &config)
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = env::temp_dir().join("ecoleta-missing-config").join(CONFIG_FILE);
        let config = load_from(&path).unwrap();
        assert_eq!(config.theme.name, "Catppuccin Mocha");
    }

    #[test]
    fn test_save_then_load() {
        let dir = env::temp_dir().join(format!("ecoleta-config-{}", std::process::id()));
        let path = dir.join(CONFIG_FILE);

        let mut config = AppConfig::default();
        config.last_search = Some(SearchConfig {
            uf: "RS".to_string(),
            city: "Porto Alegre".to_string(),
        });
        save_to(&path, &config).unwrap();

        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.last_search, config.last_search);

        fs::remove_dir_all(dir).unwrap();
    }
}
