use crate::error::{ExtractError, Result};
use crate::strategy::ExtractionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub extraction: ExtractionSection,
    pub output: OutputConfig,
    pub cache: CacheConfig,
}

/// Per-approach extraction parameters. The flank lengths only matter for
/// site extraction but every approach reads its own table, so a user can
/// tune the length ceiling independently per dataset.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExtractionSection {
    pub sites: ApproachConfig,
    pub rebuild: ApproachConfig,
    pub sliding_window: ApproachConfig,
    pub protein: ApproachConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApproachConfig {
    pub sequence_max_length: usize,
    pub flank_small: usize,
    pub flank_default: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub base_directory: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    pub path: PathBuf,
}

impl Default for ApproachConfig {
    fn default() -> Self {
        Self {
            sequence_max_length: 50_000,
            flank_small: 10,
            flank_default: 200,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_directory: PathBuf::from("datasets"),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("datasets/progress_cache.csv"),
        }
    }
}

impl ApproachConfig {
    pub fn extraction_config(&self) -> ExtractionConfig {
        ExtractionConfig {
            sequence_max_length: self.sequence_max_length,
            flank_small: self.flank_small,
            flank_default: self.flank_default,
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
                // Try to load from default locations
                let default_paths = ["gbdatasets.toml", "gbdatasets.config.toml", ".gbdatasets.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                // If no config file found, use defaults
                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref output_dir) = cli_args.output_dir {
            self.output.base_directory = output_dir.clone();
        }

        if let Some(ref cache_path) = cli_args.cache_path {
            self.cache.path = cache_path.clone();
        }

        // Length and flank overrides apply across every approach table;
        // per-approach tuning stays in the config file.
        if let Some(max_length) = cli_args.max_length {
            for approach in self.extraction.tables_mut() {
                approach.sequence_max_length = max_length;
            }
        }

        if let Some(flank_small) = cli_args.flank_small {
            for approach in self.extraction.tables_mut() {
                approach.flank_small = flank_small;
            }
        }

        if let Some(flank_default) = cli_args.flank_default {
            for approach in self.extraction.tables_mut() {
                approach.flank_default = flank_default;
            }
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
        for (name, approach) in self.extraction.tables() {
            if approach.sequence_max_length == 0 {
                return Err(ExtractError::Config {
                    message: format!(
                        "extraction.{}: sequence_max_length must be greater than 0",
                        name
                    ),
                });
            }

            if approach.flank_small > approach.flank_default {
                return Err(ExtractError::Config {
                    message: format!(
                        "extraction.{}: flank_small ({}) must not exceed flank_default ({})",
                        name, approach.flank_small, approach.flank_default
                    ),
                });
            }
        }

        if self.output.base_directory.as_os_str().is_empty() {
            return Err(ExtractError::Config {
                message: "Output base directory must not be empty".to_string(),
            });
        }

        if self.cache.path.as_os_str().is_empty() {
            return Err(ExtractError::Config {
                message: "Cache path must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Destination of one approach's dataset inside the output directory.
    pub fn dataset_path(&self, file_stem: &str) -> PathBuf {
        self.output
            .base_directory
            .join(format!("{}_genbank.csv", file_stem))
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

impl ExtractionSection {
    fn tables(&self) -> [(&'static str, &ApproachConfig); 4] {
        [
            ("sites", &self.sites),
            ("rebuild", &self.rebuild),
            ("sliding_window", &self.sliding_window),
            ("protein", &self.protein),
        ]
    }

    fn tables_mut(&mut self) -> [&mut ApproachConfig; 4] {
        [
            &mut self.sites,
            &mut self.rebuild,
            &mut self.sliding_window,
            &mut self.protein,
        ]
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub output_dir: Option<PathBuf>,
    pub cache_path: Option<PathBuf>,
    pub max_length: Option<usize>,
    pub flank_small: Option<usize>,
    pub flank_default: Option<usize>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_cache_path(mut self, cache_path: Option<PathBuf>) -> Self {
        self.cache_path = cache_path;
        self
    }

    pub fn with_max_length(mut self, max_length: Option<usize>) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_flank_small(mut self, flank_small: Option<usize>) -> Self {
        self.flank_small = flank_small;
        self
    }

    pub fn with_flank_default(mut self, flank_default: Option<usize>) -> Self {
        self.flank_default = flank_default;
        self
    }
}
