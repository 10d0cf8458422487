//! memories-server effective configuration
//!
//! Merges command-line/environment overrides, the TOML config file and the
//! compiled defaults into one resolved value.

use memories_common::config::{CompiledDefaults, LoggingConfig, RootFolderResolver, TomlConfig};
use std::path::PathBuf;

/// Values given on the command line (or their environment fallbacks)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub access_code: Option<String>,
}

/// Fully resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub root_folder: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub access_code: Option<String>,
    pub max_upload_bytes: usize,
    pub cache_capacity: usize,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn resolve(cli: CliOverrides, file: TomlConfig) -> Self {
        let defaults = CompiledDefaults::for_current_platform();

        let root_folder = RootFolderResolver::new()
            .with_cli_arg(cli.root_folder)
            .with_config(&file)
            .resolve();

        let LoggingConfig { level, file: log_file } = file.logging;

        Self {
            root_folder,
            bind_address: cli
                .bind_address
                .or(file.bind_address)
                .unwrap_or(defaults.bind_address),
            port: cli.port.or(file.port).unwrap_or(defaults.port),
            access_code: cli
                .access_code
                .or(file.access_code)
                .filter(|code| !code.is_empty()),
            max_upload_bytes: file.max_upload_bytes.unwrap_or(defaults.max_upload_bytes),
            cache_capacity: file.cache_capacity.unwrap_or(defaults.cache_capacity),
            log_level: level.unwrap_or(defaults.log_level),
            log_file,
        }
    }

    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
