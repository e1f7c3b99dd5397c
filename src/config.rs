use crate::error::{ExtractError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the empty placeholder loadcase the model always carries. Rows for
/// it are never emitted. Nobody has explained where the trailing space comes
/// from; the filter matches the value observed in practice.
pub const PLACEHOLDER_LOADCASE_NAME: &str = "0 ";

/// Default TCP port of the analysis application's remoting listener.
pub const DEFAULT_REMOTING_PORT: u16 = 8642;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub remoting: RemotingConfig,
    pub extraction: ExtractionConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemotingConfig {
    pub host: String,
    pub port: u16,
    /// Per-call timeout in seconds.
    pub timeout: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractionConfig {
    /// Position-ratio step for the workbook target.
    pub workbook_step: f64,
    /// Position-ratio step for the CSV target.
    pub csv_step: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Destination directory. `None` means the directory of the open document,
    /// matching where the source model lives.
    pub directory: Option<PathBuf>,
    pub workbook_filename: String,
    pub member_csv_filename: String,
    pub nodal_csv_filename: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remoting: RemotingConfig::default(),
            extraction: ExtractionConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for RemotingConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_REMOTING_PORT,
            timeout: 30,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            workbook_step: 0.25,
            csv_step: 0.1,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            workbook_filename: "MemberForceExtraction.xlsx".to_string(),
            member_csv_filename: "MemberForces.csv".to_string(),
            nodal_csv_filename: "NodalDisplacements.csv".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ExtractError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ExtractError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ExtractError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["tsd-extract.toml", ".tsd-extract.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, overrides: &CliOverrides) {
        if let Some(ref host) = overrides.host {
            self.remoting.host = host.clone();
        }

        if let Some(port) = overrides.port {
            self.remoting.port = port;
        }

        if let Some(timeout) = overrides.timeout {
            self.remoting.timeout = timeout;
        }

        if let Some(step) = overrides.step {
            self.extraction.workbook_step = step;
            self.extraction.csv_step = step;
        }

        if let Some(ref output_dir) = overrides.output_dir {
            self.output.directory = Some(output_dir.clone());
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| ExtractError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| ExtractError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for step in [self.extraction.workbook_step, self.extraction.csv_step] {
            if !(step > 0.0 && step <= 1.0) {
                return Err(ExtractError::InvalidStep { step });
            }
        }

        if self.remoting.timeout == 0 {
            return Err(ExtractError::Config {
                message: "Remoting timeout must be greater than 0".to_string(),
            });
        }

        if self.remoting.host.is_empty() {
            return Err(ExtractError::Config {
                message: "Remoting host must not be empty".to_string(),
            });
        }

        for name in [
            &self.output.workbook_filename,
            &self.output.member_csv_filename,
            &self.output.nodal_csv_filename,
        ] {
            if name.is_empty() {
                return Err(ExtractError::Config {
                    message: "Output filenames must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.remoting.timeout)
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub timeout: Option<u64>,
    pub step: Option<f64>,
    pub output_dir: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: Option<String>) -> Self {
        self.host = host;
        self
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<u64>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_step(mut self, step: Option<f64>) -> Self {
        self.step = step;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.remoting.port, DEFAULT_REMOTING_PORT);
        assert_eq!(config.extraction.workbook_step, 0.25);
        assert_eq!(config.extraction.csv_step, 0.1);
        assert!(config.output.directory.is_none());
        assert_eq!(config.output.nodal_csv_filename, "NodalDisplacements.csv");
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.extraction.csv_step = 0.0;
        assert!(config.validate().is_err());

        config.extraction.csv_step = 1.5;
        assert!(config.validate().is_err());

        config.extraction.csv_step = 1.0;
        assert!(config.validate().is_ok());

        config.remoting.timeout = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let config = Config::default();
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();

        let loaded = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.remoting.port, loaded.remoting.port);
        assert_eq!(config.extraction.csv_step, loaded.extraction.csv_step);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_port(Some(9000))
            .with_step(Some(0.5))
            .with_output_dir(Some(PathBuf::from("/tmp/out")));

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.remoting.port, 9000);
        assert_eq!(config.extraction.workbook_step, 0.5);
        assert_eq!(config.extraction.csv_step, 0.5);
        assert_eq!(config.output.directory, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(sample.contains("[remoting]"));
        assert!(sample.contains("[extraction]"));
        assert!(sample.contains("[output]"));
    }
}
