use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the tracking API
    pub api_url: String,
    /// Directory for locally persisted state
    pub data_dir: PathBuf,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Config file the values were loaded from, if any
    #[serde(skip)]
    pub config_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            data_dir: Self::default_data_dir(),
            timeout_secs: 30,
            config_file: None,
        }
    }
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut config = Self::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            config = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;
            config.config_file = Some(path);
        }

        // Apply environment variable overrides
        if let Ok(api_url) = std::env::var("TRACKIFY_API_URL") {
            config.api_url = api_url;
        }
        if let Ok(data_dir) = std::env::var("TRACKIFY_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }
        if let Ok(timeout) = std::env::var("TRACKIFY_TIMEOUT_SECS") {
            config.timeout_secs = timeout
                .parse()
                .map_err(|_| ConfigError::EnvError("TRACKIFY_TIMEOUT_SECS", timeout.clone()))?;
        }

        Ok(config)
    }

    /// Path of the durable preferences file.
    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join("trackify-preferences.json")
    }

    /// Default config file path (platform config dir + trackify/config.yaml)
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("trackify")
            .join("config.yaml")
    }

    /// Default data directory (platform data dir + trackify)
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("trackify")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    EnvError(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    e
                )
            }
            ConfigError::EnvError(var, value) => {
                write!(f, "Invalid value for {}: '{}'", var, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert!(config.data_dir.to_string_lossy().contains("trackify"));
        assert_eq!(config.timeout_secs, 30);
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_load_no_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "api_url: https://track.example.com").unwrap();
        writeln!(file, "data_dir: /custom/state").unwrap();

        let config = Config::load(Some(config_path.clone())).unwrap();
        assert_eq!(config.api_url, "https://track.example.com");
        assert_eq!(config.data_dir, PathBuf::from("/custom/state"));
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_env_var_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "api_url: https://fromfile.example.com").unwrap();

        // Set env var
        std::env::set_var("TRACKIFY_API_URL", "https://fromenv.example.com");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.api_url, "https://fromenv.example.com");

        // Clean up
        std::env::remove_var("TRACKIFY_API_URL");
    }

    #[test]
    fn test_invalid_timeout_env_is_rejected() {
        std::env::set_var("TRACKIFY_TIMEOUT_SECS", "soon");

        let temp_dir = tempdir().unwrap();
        let result = Config::load(Some(temp_dir.path().join("missing.yaml")));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("TRACKIFY_TIMEOUT_SECS"));

        std::env::remove_var("TRACKIFY_TIMEOUT_SECS");
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_preferences_path_under_data_dir() {
        let mut config = Config::default();
        config.data_dir = PathBuf::from("/tmp/trackify-test");
        assert_eq!(
            config.preferences_path(),
            PathBuf::from("/tmp/trackify-test/trackify-preferences.json")
        );
    }
}
