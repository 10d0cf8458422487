//! Configuration loading and root folder resolution
//!
//! Sources, highest priority first:
//! 1. Command-line argument
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default
//!
//! A missing or unreadable config file is never fatal: it is logged and the
//! compiled defaults apply.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "MEMORIES_ROOT_FOLDER";

/// Environment variable overriding the config file location
pub const CONFIG_FILE_ENV: &str = "MEMORIES_CONFIG";

/// Directory name used under the platform config/data dirs
const APP_DIR: &str = "memories";

/// `[logging]` table of the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing directive, e.g. `info` or `memories_server=debug`
    pub level: Option<String>,
    /// Append logs to this file instead of stdout
    pub file: Option<PathBuf>,
}

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    /// Shared access code; absent or empty disables authentication
    pub access_code: Option<String>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub max_upload_bytes: Option<usize>,
    pub cache_capacity: Option<usize>,
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Parse config text
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Load the first config file found, or defaults
    ///
    /// Search order: `$MEMORIES_CONFIG`, then the platform locations from
    /// [`config_file_candidates`]. Parse errors are logged and ignored.
    pub fn load_or_default() -> Self {
        let Some(path) = config_file_location() else {
            debug!("No config file found, using compiled defaults");
            return Self::default();
        };

        match Self::load(&path) {
            Ok(config) => {
                debug!("Loaded config file {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Platform config file locations, in search order
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join(APP_DIR).join("config.toml"));
    }
    if cfg!(unix) {
        candidates.push(PathBuf::from("/etc").join(APP_DIR).join("config.toml"));
    }
    candidates
}

/// Config file that [`TomlConfig::load_or_default`] reads, if any
pub fn config_file_location() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
        return Some(PathBuf::from(path));
    }
    config_file_candidates().into_iter().find(|p| p.exists())
}

/// Values used when neither CLI, environment nor config file says otherwise
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub log_level: String,
    /// Largest accepted upload body (50 MiB)
    pub max_upload_bytes: usize,
    pub cache_capacity: usize,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            bind_address: "127.0.0.1".to_string(),
            port: 5000,
            log_level: "info".to_string(),
            max_upload_bytes: 50 * 1024 * 1024,
            cache_capacity: 4,
        }
    }
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/memories
        dirs::data_local_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("/var/lib").join(APP_DIR))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support").join(APP_DIR))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData").join(APP_DIR))
    } else {
        PathBuf::from("./memories_data")
    }
}

/// Resolves the root folder from the four configuration tiers
#[derive(Debug, Clone, Default)]
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    config_value: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_config(mut self, config: &TomlConfig) -> Self {
        self.config_value = config.root_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.config_value {
            return path.clone();
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the on-disk layout under the root folder
///
/// ```text
/// <root>/uploads/            memories.<ext>
/// <root>/uploads/media/      photos, videos, audio
/// ```
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.root_folder.join("uploads")
    }

    pub fn media_dir(&self) -> PathBuf {
        self.uploads_dir().join("media")
    }

    /// Create the root, uploads and media directories if missing
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [self.uploads_dir(), self.media_dir()] {
            if !dir.exists() {
                std::fs::create_dir_all(&dir).map_err(|e| {
                    Error::Config(format!("Cannot create {}: {}", dir.display(), e))
                })?;
                debug!("Created directory {}", dir.display());
            }
        }
        Ok(())
    }
}
