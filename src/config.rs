//! Layered application configuration.
//!
//! Settings are merged from, lowest to highest priority:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`--config <FILE>`, or `config.toml` in the platform
//!    config directory)
//! 3. `DUPEFINDER_*` environment variables (e.g. `DUPEFINDER_IO_THREADS=8`)
//! 4. Flags given on the command line
//!
//! A missing configuration file is not an error; a malformed one is.
//!
//! # Example file
//!
//! ```toml
//! recursive = true
//! tie_break = "by-last-modified"
//! io_threads = 2
//! ignore_patterns = ["*.tmp", "node_modules/"]
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::ScanArgs;
use crate::duplicates::{FinderConfig, TieBreakPolicy};
use crate::scanner::WalkerConfig;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "DUPEFINDER_";

/// Effective scan settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Descend into subdirectories
    pub recursive: bool,
    /// Original selection rule; `None` keeps the first file found
    pub tie_break: Option<TieBreakPolicy>,
    /// Hashing threads
    pub io_threads: usize,
    /// Skip dot-files and dot-directories
    pub skip_hidden: bool,
    /// Follow symbolic links
    pub follow_symlinks: bool,
    /// Smallest file size considered, in bytes
    pub min_size: Option<u64>,
    /// Largest file size considered, in bytes
    pub max_size: Option<u64>,
    /// Extra gitignore-style patterns
    pub ignore_patterns: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recursive: false,
            tie_break: None,
            io_threads: FinderConfig::default().io_threads,
            skip_hidden: false,
            follow_symlinks: false,
            min_size: None,
            max_size: None,
            ignore_patterns: Vec::new(),
        }
    }
}

impl Settings {
    /// Default configuration file location for this platform.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dupefinder").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Provider chain for defaults, file, and environment.
    ///
    /// `file` overrides the default path.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));

        match file.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) if path.is_file() => {
                log::debug!("Loading configuration from {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
            Some(path) => {
                log::debug!("No configuration file at {}", path.display());
            }
            None => {
                log::debug!("No platform configuration directory");
            }
        }

        figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]))
    }

    /// Load settings from defaults, file, and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or an environment variable holds a value
    /// of the wrong type.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let settings: Settings = Self::figment(file)
            .extract()
            .context("Invalid configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.io_threads == 0 {
            anyhow::bail!("Invalid configuration: io_threads must be at least 1");
        }
        if let (Some(min), Some(max)) = (self.min_size, self.max_size) {
            if min > max {
                anyhow::bail!(
                    "Invalid configuration: min_size ({}) is larger than max_size ({})",
                    min,
                    max
                );
            }
        }
        Ok(())
    }

    /// Overlay flags given on the command line.
    ///
    /// Switches only turn options on; ignore patterns are appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the combined size range is empty.
    pub fn apply_cli(mut self, args: &ScanArgs) -> Result<Self> {
        self.recursive |= args.recursive;
        self.skip_hidden |= args.skip_hidden;
        self.follow_symlinks |= args.follow_symlinks;
        if args.tie_break.is_some() {
            self.tie_break = args.tie_break;
        }
        if let Some(threads) = args.io_threads {
            self.io_threads = usize::from(threads);
        }
        if args.min_size.is_some() {
            self.min_size = args.min_size;
        }
        if args.max_size.is_some() {
            self.max_size = args.max_size;
        }
        self.ignore_patterns
            .extend(args.ignore_patterns.iter().cloned());
        self.validate()?;
        Ok(self)
    }

    /// Walker configuration derived from these settings.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            recursive: self.recursive,
            follow_symlinks: self.follow_symlinks,
            skip_hidden: self.skip_hidden,
            min_size: self.min_size,
            max_size: self.max_size,
            ignore_patterns: self.ignore_patterns.clone(),
        }
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}
