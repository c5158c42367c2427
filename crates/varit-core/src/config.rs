//! Sampling configuration for varit.
//!
//! Controls how Gaussian operators draw their noise and which kernel path
//! they run:
//! - **Seed**: deterministic `eps` draws via an RNG key instead of the backend RNG
//! - **Fused kernels**: run the CubeCL `exp(v / 2) * e` kernel when the backend supports it
//!
//! Values are resolved in this order:
//! 1. CLI arguments (highest priority)
//! 2. Environment variables
//! 3. Config file (`~/.config/varit/config.toml`)
//! 4. Defaults
//!
//! # Example
//!
//! ```ignore
//! use varit_core::config::SamplingConfig;
//!
//! let config = SamplingConfig::builder().seed(42).build();
//! assert_eq!(config.seed(), Some(42));
//! ```

use clap::Parser;
use directories::ProjectDirs;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

static GLOBAL_CONFIG: OnceCell<SamplingConfig> = OnceCell::new();

/// CLI arguments for sampling configuration
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about = "varit sampling configuration")]
pub struct SamplingArgs {
    /// Seed for deterministic noise draws
    #[arg(long, env = "VARIT_SEED")]
    pub seed: Option<u64>,

    /// Use fused GPU kernels when the backend provides them
    #[arg(long, env = "VARIT_FUSED")]
    pub fused: Option<bool>,

    /// Path to config file
    #[arg(long, env = "VARIT_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,
}

/// Sampling configuration as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SamplingConfigFile {
    pub seed: Option<u64>,
    pub fused_kernels: Option<bool>,
}

/// Resolved sampling configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SamplingConfig {
    seed: Option<u64>,
    fused_kernels: bool,
}

impl SamplingConfig {
    /// Parse configuration from CLI arguments
    pub fn from_args() -> Self {
        Self::from_sampling_args(SamplingArgs::parse())
    }

    /// Parse configuration from CLI arguments, ignoring unknown args
    ///
    /// Use this when mixing with other CLI parsers
    pub fn from_args_relaxed() -> Self {
        let args = SamplingArgs::try_parse().unwrap_or_default();
        Self::from_sampling_args(args)
    }

    /// Create configuration from already-parsed [`SamplingArgs`]
    ///
    /// Use this when `SamplingArgs` is flattened into your own CLI parser.
    pub fn from_sampling_args(args: SamplingArgs) -> Self {
        let file_config = Self::load_config_file(args.config_file.as_deref());

        // clap already folded env vars into args
        SamplingConfig {
            seed: args.seed.or(file_config.seed),
            fused_kernels: args
                .fused
                .or(file_config.fused_kernels)
                .unwrap_or(false),
        }
    }

    pub fn builder() -> SamplingConfigBuilder {
        SamplingConfigBuilder::new()
    }

    /// Seed for deterministic noise, `None` to use the backend RNG
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn fused_kernels(&self) -> bool {
        self.fused_kernels
    }

    /// Get the global configuration instance
    ///
    /// Initializes from the process arguments on first call. Use `set_global` to customize.
    pub fn global() -> &'static SamplingConfig {
        GLOBAL_CONFIG.get_or_init(SamplingConfig::from_args_relaxed)
    }

    /// Set the global configuration
    ///
    /// Returns Err if already initialized
    pub fn set_global(config: SamplingConfig) -> Result<(), SamplingConfig> {
        GLOBAL_CONFIG.set(config)
    }

    pub fn log_summary(&self) {
        log::info!(
            "varit sampling config: seed={:?} fused_kernels={}",
            self.seed,
            self.fused_kernels
        );
    }

    /// Default config file location
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "varit").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load config file from path or default location
    ///
    /// A missing or unparsable file yields the empty config.
    fn load_config_file(path: Option<&Path>) -> SamplingConfigFile {
        let config_path = path.map(PathBuf::from).or_else(Self::default_config_path);

        if let Some(path) = config_path {
            if path.exists() {
                match fs::read_to_string(&path) {
                    Ok(contents) => match toml::from_str::<SamplingConfigFile>(&contents) {
                        Ok(config) => return config,
                        Err(e) => log::warn!("ignoring malformed config {:?}: {}", path, e),
                    },
                    Err(e) => log::warn!("could not read config {:?}: {}", path, e),
                }
            }
        }

        SamplingConfigFile::default()
    }

    /// Save current configuration to a file
    pub fn save_to_file(&self, path: &Path) -> std::io::Result<()> {
        let config = SamplingConfigFile {
            seed: self.seed,
            fused_kernels: Some(self.fused_kernels),
        };

        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, toml_str)
    }
}

/// Builder for SamplingConfig
#[derive(Debug, Clone, Default)]
pub struct SamplingConfigBuilder {
    seed: Option<u64>,
    fused_kernels: bool,
}

impl SamplingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn fused_kernels(mut self, enabled: bool) -> Self {
        self.fused_kernels = enabled;
        self
    }

    pub fn build(self) -> SamplingConfig {
        SamplingConfig {
            seed: self.seed,
            fused_kernels: self.fused_kernels,
        }
    }
}
