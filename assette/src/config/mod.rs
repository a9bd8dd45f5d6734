//! Configuration management for Assette
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ASSETTE_` prefix, `__` for nesting)
//! 2. `./config.toml` (development)
//! 3. `~/.config/assette/config.toml` (user config, XDG)
//! 4. Hardcoded defaults (fallback)
//!
//! Environment variable format: `ASSETTE_SECTION__FIELD_NAME`, for example
//! `ASSETTE_SERVER__PORT=9000` or `ASSETTE_DATABASE__URL=sqlite://prod.db`.
//! `ASSETTE_CONFIG=/etc/assette.toml` replaces both file locations with one
//! explicit file.
//!
//! # Example Configuration
//!
//! ```toml
//! # config.toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [database]
//! url = "sqlite://db.sqlite3"
//! max_connections = 5
//! create_if_missing = true
//!
//! [htmx]
//! request_timeout_ms = 5000
//!
//! [generation]
//! api_key = "sk-..."
//! upload_dir = "uploads"
//! data_dir = "data"
//!
//! [theme]
//! primary = "#53B689"
//! ```
//!
//! # Usage
//!
//! ```rust
//! use assette::config::AssetteConfig;
//!
//! let config = AssetteConfig::default();
//! assert_eq!(config.server.port, 8080);
//! assert_eq!(config.database.url, "sqlite://db.sqlite3");
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind
    pub host: String,

    /// TCP port
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerSettings {
    /// Resolve the configured host and port into a socket address
    ///
    /// # Errors
    ///
    /// Returns an error if `host` is not an IP address literal.
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port).parse()?;
        Ok(addr)
    }
}

/// Record store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLx connection URL (`sqlite://path` or `sqlite::memory:`)
    pub url: String,

    /// Maximum pooled connections
    pub max_connections: u32,

    /// Create the database file on first start
    pub create_if_missing: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://db.sqlite3".to_string(),
            max_connections: 5,
            create_if_missing: true,
        }
    }
}

/// HTMX request handling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmxSettings {
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for HtmxSettings {
    fn default() -> Self {
        Self {
            request_timeout_ms: 5000,
        }
    }
}

/// Image-to-model generation settings
///
/// Generation is switched off until an `api_key` is configured; the model
/// catalogue and downloads keep working without one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GenerationSettings {
    /// Bearer token for the generation API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Generation endpoint accepting a multipart `image`
    pub endpoint: String,

    /// Upstream request timeout in seconds
    pub request_timeout_secs: u64,

    /// Where generated `.glb` files are written
    pub upload_dir: PathBuf,

    /// Where `models.json` is kept
    pub data_dir: PathBuf,

    /// Largest accepted upload in bytes
    pub max_upload_bytes: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.stability.ai/v2beta/3d/stable-point-aware-3d".to_string(),
            request_timeout_secs: 30,
            upload_dir: PathBuf::from("uploads"),
            data_dir: PathBuf::from("data"),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl GenerationSettings {
    /// Whether uploads can be turned into models
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

/// Colour theme applied by the page shell
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ThemeSettings {
    /// Header and button colour
    pub primary: String,

    /// Secondary accents
    pub secondary: String,

    /// Text on light surfaces
    pub accent: String,

    /// Success notifications
    pub positive: String,

    /// Rejection notifications
    pub negative: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            primary: "#53B689".to_string(),
            secondary: "#6E93D6".to_string(),
            accent: "#111B1E".to_string(),
            positive: "#53B689".to_string(),
            negative: "#C10015".to_string(),
        }
    }
}

/// Complete Assette configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AssetteConfig {
    /// HTTP listener
    #[serde(default)]
    pub server: ServerSettings,

    /// Record store
    #[serde(default)]
    pub database: DatabaseSettings,

    /// HTMX request handling
    #[serde(default)]
    pub htmx: HtmxSettings,

    /// Image-to-model generation
    #[serde(default)]
    pub generation: GenerationSettings,

    /// Page shell colours
    #[serde(default)]
    pub theme: ThemeSettings,
}

impl AssetteConfig {
    /// Load configuration from the standard locations
    ///
    /// Precedence, lowest first: defaults, the XDG user file, `./config.toml`,
    /// then `ASSETTE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file is not valid TOML or a value has the
    /// wrong type.
    pub fn load() -> anyhow::Result<Self> {
        let mut figment = Self::defaults()?;

        let user_config = Self::recommended_path();
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        let local_config = PathBuf::from("./config.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        let config = figment
            .merge(Env::prefixed("ASSETTE_").split("__").lowercase(true))
            .extract()?;
        Ok(config)
    }

    /// [`load_from`](Self::load_from) the file named by `ASSETTE_CONFIG`, or
    /// [`load`](Self::load) when it is unset
    ///
    /// # Errors
    ///
    /// Same as the loader that runs.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var_os("ASSETTE_CONFIG") {
            Some(path) => Self::load_from(PathBuf::from(path)),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific file, still honouring env overrides
    ///
    /// A missing file is not an error; the defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not valid TOML or a value has the wrong type.
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config = Self::defaults()?
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("ASSETTE_").split("__").lowercase(true))
            .extract()?;
        Ok(config)
    }

    /// The XDG config path, `~/.config/assette/config.toml` on Linux
    #[must_use]
    pub fn recommended_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("./config.toml"),
            |config_dir| config_dir.join("assette").join("config.toml"),
        )
    }

    fn defaults() -> anyhow::Result<Figment> {
        Ok(Figment::new().merge(Toml::string(&toml::to_string(&Self::default())?)))
    }
}
