//! Load — config loading from file and environment variables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::model::EngineConfig;

impl EngineConfig {
    /// Load configuration from file or environment variables.
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = std::env::var("ENGINE_CONFIG_FILE")
            .unwrap_or_else(|_| "/etc/logview/engine.toml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!(
                "Config file not found at {}, using environment variables",
                config_path
            );
            Self::from_env()
        };

        // Environment variables override file config for the scalar knobs
        if let Some(sample_lines) = env_usize("ENGINE_SAMPLE_LINES") {
            config.detection.sample_lines = sample_lines;
        }
        if let Some(min_matches) = env_usize("ENGINE_MIN_MATCHES") {
            config.detection.min_matches = min_matches;
        }
        if let Ok(heavy) = std::env::var("ENGINE_HEAVY_PASS") {
            if let Ok(enabled) = heavy.parse() {
                config.heavy_pass_enabled = enabled;
            }
        }

        Ok(config)
    }

    /// Load configuration from TOML file.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: EngineConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from environment variables with built-in defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(sample_lines) = env_usize("ENGINE_SAMPLE_LINES") {
            config.detection.sample_lines = sample_lines;
        }
        if let Some(min_matches) = env_usize("ENGINE_MIN_MATCHES") {
            config.detection.min_matches = min_matches;
        }
        if let Ok(heavy) = std::env::var("ENGINE_HEAVY_PASS") {
            if let Ok(enabled) = heavy.parse() {
                config.heavy_pass_enabled = enabled;
            }
        }
        config
    }
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}
