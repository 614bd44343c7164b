//! Server configuration.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. built-in defaults
//! 2. an optional `config.toml` (`~/.config/roomboard/config.toml` by default)
//! 3. command-line flags and environment variables (`PORT`, `GRAPH_ENABLED`,
//!    `AZURE_*`, ...), usually populated from a `.env` file

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use roomboard_core::{OccupancyWindow, TracingConfig, TracingOutputFormat};
use roomboard_providers::{GraphConfig, OAuthCredentials};

/// Notice shown on every panel until someone changes it.
pub const DEFAULT_NOTICE: &str = "Reminder: please leave the room clean when you finish.";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// roomboard - meeting room signage API
#[derive(Debug, Default, Parser)]
#[command(name = "roomboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "ROOMBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "ROOMBOARD_BIND")]
    pub bind: Option<IpAddr>,

    /// Front-end origin allowed by CORS
    #[arg(long, env = "FRONTEND_URL")]
    pub frontend_url: Option<String>,

    /// Read rooms and events from Microsoft Graph instead of fixtures
    #[arg(long, env = "GRAPH_ENABLED", value_parser = clap::builder::BoolishValueParser::new())]
    pub graph_enabled: Option<bool>,

    /// Room mailbox addresses to show (comma-separated)
    #[arg(long, env = "ROOM_EMAILS", value_delimiter = ',')]
    pub room_emails: Option<Vec<String>>,

    /// Directory (tenant) id
    #[arg(long, env = "AZURE_TENANT_ID")]
    pub tenant_id: Option<String>,

    /// OAuth client id
    #[arg(long, env = "AZURE_CLIENT_ID")]
    pub client_id: Option<String>,

    /// OAuth client secret
    #[arg(long, env = "AZURE_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// OAuth redirect URI
    #[arg(long, env = "AZURE_REDIRECT_URI")]
    pub redirect_uri: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, env = "ROOMBOARD_LOG_JSON")]
    pub log_json: bool,

    /// Log rendering: pretty, compact or json
    #[arg(long, env = "ROOMBOARD_LOG_FORMAT")]
    pub log_format: Option<TracingOutputFormat>,

    /// Log filter directive used when RUST_LOG is unset
    #[arg(long, env = "ROOMBOARD_LOG_FILTER")]
    pub log_filter: Option<String>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,
}

// ---------------------------------------------------------------------------
// FileConfig (config.toml)
// ---------------------------------------------------------------------------

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP listener settings.
    pub server: ServerSettings,

    /// Microsoft Graph settings.
    pub graph: GraphSettings,

    /// Occupancy window.
    pub occupancy: OccupancyWindow,

    /// Log output.
    pub logging: LoggingSettings,
}

/// Log output settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Emit JSON lines.
    pub json: bool,
    /// Rendering override.
    pub format: Option<TracingOutputFormat>,
    /// Filter directive, e.g. `"warn,roomboard=debug"`.
    pub filter: Option<String>,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to bind.
    pub bind: IpAddr,

    /// Port to listen on.
    pub port: u16,

    /// Front-end origin allowed by CORS.
    pub frontend_url: String,

    /// Notice shown at startup.
    pub notice: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 4000,
            frontend_url: "http://localhost:5173".to_string(),
            notice: DEFAULT_NOTICE.to_string(),
        }
    }
}

/// Microsoft Graph settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    /// Use Graph instead of fixtures.
    pub enabled: bool,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    /// Room mailbox allow-list.
    pub room_emails: Vec<String>,
    /// Override for the Graph API base URL.
    pub api_base_url: Option<String>,
    /// Override for the identity platform base URL.
    pub login_base_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the default file if it exists, defaults otherwise.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("roomboard")
            .join("config.toml")
    }
}

// ---------------------------------------------------------------------------
// AppConfig (resolved)
// ---------------------------------------------------------------------------

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// Front-end origin allowed by CORS.
    pub frontend_url: String,
    /// Initial notice text.
    pub notice: String,
    /// Whether Graph serves the data.
    pub graph_enabled: bool,
    /// Graph provider settings.
    pub graph: GraphConfig,
    /// Occupancy window.
    pub occupancy: OccupancyWindow,
    /// Log output.
    pub tracing: TracingConfig,
}

impl AppConfig {
    /// Loads the file named by `cli` (or the default file) and applies the
    /// command-line overrides.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::load_from(path)?,
            None => FileConfig::load_default()?,
        };
        Ok(Self::resolve(file, cli))
    }

    /// Merges file settings with command-line overrides.
    pub fn resolve(file: FileConfig, cli: &Cli) -> Self {
        let FileConfig {
            server,
            graph,
            occupancy,
            logging,
        } = file;

        let room_emails = cli
            .room_emails
            .clone()
            .unwrap_or(graph.room_emails)
            .into_iter()
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty())
            .collect();

        let credentials = OAuthCredentials::new(
            pick(&cli.client_id, graph.client_id),
            pick(&cli.client_secret, graph.client_secret),
        );
        let mut graph_config = GraphConfig::new(
            pick(&cli.tenant_id, graph.tenant_id),
            credentials,
            pick(&cli.redirect_uri, graph.redirect_uri),
        )
        .with_room_emails(room_emails);
        if let Some(url) = graph.api_base_url {
            graph_config = graph_config.with_api_base_url(url);
        }
        if let Some(url) = graph.login_base_url {
            graph_config = graph_config.with_login_base_url(url);
        }
        if let Some(secs) = graph.timeout_secs {
            graph_config = graph_config.with_timeout(std::time::Duration::from_secs(secs));
        }

        let mut tracing = TracingConfig::from_flags(cli.log_json || logging.json, cli.debug);
        if let Some(format) = cli.log_format.or(logging.format) {
            tracing = tracing.with_format(format);
        }
        if let Some(filter) = cli.log_filter.clone().or(logging.filter) {
            tracing = tracing.with_filter(filter);
        }

        let bind = cli.bind.unwrap_or(server.bind);
        let port = cli.port.unwrap_or(server.port);

        Self {
            addr: SocketAddr::new(bind, port),
            frontend_url: cli.frontend_url.clone().unwrap_or(server.frontend_url),
            notice: server.notice,
            graph_enabled: cli.graph_enabled.unwrap_or(graph.enabled),
            graph: graph_config,
            occupancy,
            tracing,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::resolve(FileConfig::default(), &Cli::default())
    }
}

fn pick(flag: &Option<String>, file: Option<String>) -> String {
    flag.clone().or(file).unwrap_or_default()
}
