//! Publisher configuration.
//!
//! Sources in order of precedence (later sources override earlier):
//! 1. Bundled defaults (`flipper.toml` shipped with the library)
//! 2. `~/.config/flipper/flipper.toml`
//! 3. `./flipper.toml`
//! 4. `FLIPPER_*` environment variables, e.g. `FLIPPER_MANAGED_STORE=false`

use derive_getters::Getters;
use flipper_error::{ConfigError, ConfigErrorKind, FlipperError, FlipperResult};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../flipper.toml");

/// Settings for a filesystem-backed publisher.
///
/// # Example
///
/// ```toml
/// storage_root = "/storage/emulated/0"
/// volume = "external_primary"
/// owner = "com.example.camera"
/// managed_store = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PublisherConfig {
    /// Directory both storage backends live under.
    #[serde(default = "default_storage_root")]
    storage_root: PathBuf,

    /// Volume name used in managed-store locators.
    #[serde(default = "default_volume")]
    volume: String,

    /// Owner recorded on managed-store entries.
    #[serde(default = "default_owner")]
    owner: String,

    /// Capability override. `None` assumes a managed store is available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    managed_store: Option<bool>,

    /// Report the legacy storage area as read-only.
    #[serde(default)]
    read_only: bool,

    /// Remove managed-store entries that were inserted but could not be opened.
    #[serde(default)]
    remove_orphaned_entries: bool,
}

fn default_storage_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("flipper")
}

fn default_volume() -> String {
    "external_primary".to_string()
}

fn default_owner() -> String {
    "flipper".to_string()
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            storage_root: default_storage_root(),
            volume: default_volume(),
            owner: default_owner(),
            managed_store: None,
            read_only: false,
            remove_orphaned_entries: false,
        }
    }
}

impl PublisherConfig {
    /// Load configuration from a specific file path.
    ///
    /// Keys missing from the file take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> FlipperResult<Self> {
        debug!("Loading configuration from file");

        Self::deserialize_from(
            Config::builder().add_source(File::from(path.as_ref())),
            &format!("Failed to read configuration from {}", path.as_ref().display()),
        )
    }

    /// Load configuration with precedence: environment > current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use flipper_storage::PublisherConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = PublisherConfig::load()?;
    /// println!("publishing under {}", config.storage_root().display());
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load() -> FlipperResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/flipper/flipper.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("flipper").required(false))
            .add_source(Environment::with_prefix("FLIPPER").try_parsing(true));

        Self::deserialize_from(builder, "Failed to build configuration")
    }

    /// Builder-style storage root override.
    pub fn with_storage_root(mut self, storage_root: impl Into<PathBuf>) -> Self {
        self.storage_root = storage_root.into();
        self
    }

    /// Builder-style capability override.
    pub fn with_managed_store(mut self, managed_store: Option<bool>) -> Self {
        self.managed_store = managed_store;
        self
    }

    fn deserialize_from(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        context: &str,
    ) -> FlipperResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                FlipperError::from(ConfigError::new(ConfigErrorKind::Read(format!(
                    "{context}: {e}"
                ))))
            })?
            .try_deserialize()
            .map_err(|e| FlipperError::from(ConfigError::new(ConfigErrorKind::Parse(e.to_string()))))?;

        if config.volume.is_empty() {
            return Err(ConfigError::new(ConfigErrorKind::Invalid(
                "volume must not be empty".to_string(),
            ))
            .into());
        }
        Ok(config)
    }
}
