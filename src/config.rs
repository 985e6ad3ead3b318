//! Configuration module for LANSHARE.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::{LanshareError, Result};

/// Host value that asks the server to detect the local network address.
pub const AUTO_HOST: &str = "auto";

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind, or `"auto"` to use the outbound interface address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    AUTO_HOST.to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Shared directory configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FilesConfig {
    /// Directory to share. Empty means "decide at startup".
    #[serde(default)]
    pub root: String,
    /// Share the directory containing the executable instead of the
    /// working directory when `root` is empty.
    #[serde(default)]
    pub use_exe_dir: bool,
    /// Send downloads as attachments instead of letting the browser
    /// display them inline.
    #[serde(default)]
    pub force_download: bool,
    /// Maximum upload size in megabytes (0 = unlimited).
    #[serde(default)]
    pub max_upload_size_mb: u64,
}

impl FilesConfig {
    /// Resolve the base directory once for the lifetime of the process.
    ///
    /// Precedence: explicit `root`, then the executable's directory when
    /// `use_exe_dir` is set, then the current working directory.
    pub fn resolve_root(&self) -> Result<PathBuf> {
        let candidate = if !self.root.is_empty() {
            PathBuf::from(&self.root)
        } else if self.use_exe_dir {
            let exe = std::env::current_exe()?;
            exe.parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| LanshareError::Config("executable has no parent directory".into()))?
        } else {
            std::env::current_dir()?
        };

        let root = candidate.canonicalize().map_err(|e| {
            LanshareError::Config(format!("cannot open {}: {e}", candidate.display()))
        })?;

        if !root.is_dir() {
            return Err(LanshareError::Config(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        Ok(root)
    }

    /// Upload body limit in bytes, or `None` when unlimited.
    pub fn upload_limit_bytes(&self) -> Option<usize> {
        if self.max_upload_size_mb == 0 {
            None
        } else {
            usize::try_from(self.max_upload_size_mb.saturating_mul(1024 * 1024)).ok()
        }
    }
}

/// Templates configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesConfig {
    /// Directory searched for an `index.html` overriding the built-in page.
    #[serde(default = "default_templates_path")]
    pub path: String,
}

fn default_templates_path() -> String {
    "templates".to_string()
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            path: default_templates_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty logs to the console only.
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

/// Web configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Gzip responses for clients that accept it.
    #[serde(default = "default_compression")]
    pub compression: bool,
    /// Whether to serve static assets under `/static`.
    #[serde(default)]
    pub serve_static: bool,
    /// Path to static files directory.
    #[serde(default = "default_static_path")]
    pub static_path: String,
}

fn default_compression() -> bool {
    true
}

fn default_static_path() -> String {
    "static".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            compression: default_compression(),
            serve_static: false,
            static_path: default_static_path(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Shared directory configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Templates configuration.
    #[serde(default)]
    pub templates: TemplatesConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Web configuration.
    #[serde(default)]
    pub web: WebConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(LanshareError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| LanshareError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `LANSHARE_HOST`: bind address (or `auto`)
    /// - `LANSHARE_PORT`: listen port
    /// - `LANSHARE_ROOT`: shared directory
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(host) = non_empty_var("LANSHARE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = non_empty_var("LANSHARE_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| LanshareError::Config(format!("invalid LANSHARE_PORT: {port}")))?;
        }
        if let Some(root) = non_empty_var("LANSHARE_ROOT") {
            self.files.root = root;
        }
        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
