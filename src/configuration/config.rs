use clap::Parser;
use log::info;
use serde::Deserialize;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::error_handling::types::ConfigError;

/// Application configuration structure that defines all runtime parameters.
///
/// Loaded from a TOML file where every key is optional, then overridden by
/// command-line flags or `STORYHUB_*` environment variables (see [`CliArgs`]).
///
/// # Examples
///
/// ```
/// use storyhub::configuration::Config;
///
/// let config: Config = toml::from_str("port = 8080").unwrap();
/// assert_eq!(config.port, 8080);
/// assert_eq!(config.bind_address, "0.0.0.0");
/// ```
///
/// # Fields Overview
///
/// - `bind_address`: IP address the HTTP server listens on
/// - `port`: TCP port of the HTTP server
/// - `stories_file`: JSON document holding the whole catalog
/// - `uploads_dir`: directory for uploaded photos, served under `/uploads`
/// - `public_dir`: optional static frontend, served under `/public`
/// - `max_upload_bytes`: upper bound for a multipart submission body
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,
    pub stories_file: PathBuf,
    pub uploads_dir: PathBuf,
    pub public_dir: Option<PathBuf>,
    pub max_upload_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: String::from("0.0.0.0"),
            port: 3000,
            stories_file: PathBuf::from("data/stories.json"),
            uploads_dir: PathBuf::from("data/uploads"),
            public_dir: None,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Reads a TOML configuration file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&raw).map_err(|e| ConfigError::TomlError(e.to_string()))?;
        info!("Configuration read from {}", path.display());
        Ok(config)
    }

    /// Checks the values that cannot be enforced by their types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_address
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::BadIPFormatting(self.bind_address.clone()))?;

        if self.max_upload_bytes == 0 {
            return Err(ConfigError::NotInRange(
                "max_upload_bytes must be greater than 0".to_string(),
            ));
        }

        if let Some(ref dir) = self.public_dir {
            if !dir.is_dir() {
                return Err(ConfigError::DirectoryDoesNotExist(dir.display().to_string()));
            }
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = self
            .bind_address
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::BadIPFormatting(self.bind_address.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Command-line interface of the `storyhub` binary.
///
/// Every flag can also be given through its `STORYHUB_*` environment
/// variable. Flags win over the configuration file.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "storyhub")]
#[command(version)]
#[command(about = "Community story-sharing API server")]
pub struct CliArgs {
    /// Optional TOML configuration file
    pub config_file: Option<PathBuf>,

    /// Network address to bind the server to
    #[arg(long, env = "STORYHUB_BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Port of the HTTP server
    #[arg(long, env = "STORYHUB_PORT")]
    pub port: Option<u16>,

    /// Path of the JSON catalog document
    #[arg(long, env = "STORYHUB_STORIES_FILE")]
    pub stories_file: Option<PathBuf>,

    /// Directory uploaded photos are written to
    #[arg(long, env = "STORYHUB_UPLOADS_DIR")]
    pub uploads_dir: Option<PathBuf>,

    /// Directory holding the static frontend
    #[arg(long, env = "STORYHUB_PUBLIC_DIR")]
    pub public_dir: Option<PathBuf>,
}

impl CliArgs {
    /// Builds the effective configuration: file (or defaults), then overrides.
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let mut config = match self.config_file {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(bind_address) = self.bind_address {
            config.bind_address = bind_address;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(stories_file) = self.stories_file {
            config.stories_file = stories_file;
        }
        if let Some(uploads_dir) = self.uploads_dir {
            config.uploads_dir = uploads_dir;
        }
        if self.public_dir.is_some() {
            config.public_dir = self.public_dir;
        }

        config.validate()?;
        Ok(config)
    }
}
