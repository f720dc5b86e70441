use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_DB_PORT, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_SCHEMA_CACHE_MAX_ENTRIES, DEFAULT_SCHEMA_CACHE_TTL_SECS, ENV_DB_HOST, ENV_DB_NAME,
    ENV_DB_PASSWORD, ENV_DB_PORT, ENV_DB_USER, ENV_PORT_FALLBACK, ENV_POSTGRES_URL,
    POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS, POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS,
    POSTGRES_DEFAULT_MAX_CONNECTIONS, POSTGRES_DEFAULT_MAX_LIFETIME_SECS,
    POSTGRES_DEFAULT_MIN_CONNECTIONS, POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS,
};

// =============================================================================
// File Config Structs (all optional, merged across files)
// =============================================================================

/// Server configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Extra browser origins allowed by CORS, besides the server's own
    pub cors_origins: Option<Vec<String>>,
}

/// PostgreSQL configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PostgresFileConfig {
    /// PostgreSQL connection URL (or use MICRODATA_POSTGRES_URL env var)
    pub url: Option<String>,
    /// Maximum number of connections in the pool (default: 20)
    pub max_connections: Option<u32>,
    /// Minimum number of connections to keep warm (default: 2)
    pub min_connections: Option<u32>,
    /// Connection acquire timeout in seconds (default: 30)
    pub acquire_timeout_secs: Option<u64>,
    /// Idle connection timeout in seconds (default: 600)
    pub idle_timeout_secs: Option<u64>,
    /// Max connection lifetime in seconds (default: 1800)
    pub max_lifetime_secs: Option<u64>,
    /// Statement timeout in seconds, 0 to disable (default: 60)
    pub statement_timeout_secs: Option<u64>,
}

/// Database configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    pub postgres: Option<PostgresFileConfig>,
}

/// Level schema cache section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CacheFileConfig {
    pub schema_ttl_secs: Option<u64>,
    pub max_entries: Option<u64>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub cache: Option<CacheFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// Overwrite `current` when `other` carries a value
fn merge_opt<T>(current: &mut Option<T>, other: Option<T>) {
    if other.is_some() {
        *current = other;
    }
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            merge_opt(&mut current.host, server.host);
            merge_opt(&mut current.port, server.port);
            merge_opt(&mut current.cors_origins, server.cors_origins);
        }

        if let Some(database) = other.database
            && let Some(postgres) = database.postgres
        {
            let current = self
                .database
                .get_or_insert_with(DatabaseFileConfig::default)
                .postgres
                .get_or_insert_with(PostgresFileConfig::default);
            if postgres.url.is_some() {
                tracing::trace!(url = "***", "Merging database.postgres.url");
            }
            merge_opt(&mut current.url, postgres.url);
            merge_opt(&mut current.max_connections, postgres.max_connections);
            merge_opt(&mut current.min_connections, postgres.min_connections);
            merge_opt(&mut current.acquire_timeout_secs, postgres.acquire_timeout_secs);
            merge_opt(&mut current.idle_timeout_secs, postgres.idle_timeout_secs);
            merge_opt(&mut current.max_lifetime_secs, postgres.max_lifetime_secs);
            merge_opt(
                &mut current.statement_timeout_secs,
                postgres.statement_timeout_secs,
            );
        }

        if let Some(cache) = other.cache {
            let current = self.cache.get_or_insert_with(CacheFileConfig::default);
            merge_opt(&mut current.schema_ttl_secs, cache.schema_ttl_secs);
            merge_opt(&mut current.max_entries, cache.max_entries);
        }
    }
}

// =============================================================================
// Environment Overrides
// =============================================================================

/// Discrete PostgreSQL connection settings (`DB_USER`, `DB_HOST`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbParts {
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub name: Option<String>,
    pub port: Option<String>,
}

impl DbParts {
    fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            user: var(ENV_DB_USER),
            password: var(ENV_DB_PASSWORD),
            host: var(ENV_DB_HOST),
            name: var(ENV_DB_NAME),
            port: var(ENV_DB_PORT),
        }
    }

    /// Assemble a connection URL. Requires at least a host and a database name.
    pub fn to_url(&self) -> Result<Option<String>> {
        let (Some(host), Some(name)) = (&self.host, &self.name) else {
            return Ok(None);
        };

        let port = match &self.port {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid {} value: {}", ENV_DB_PORT, raw))?,
            None => DEFAULT_DB_PORT,
        };

        let auth = match (&self.user, &self.password) {
            (Some(user), Some(password)) => {
                format!("{}:{}@", encode_component(user), encode_component(password))
            }
            (Some(user), None) => format!("{}@", encode_component(user)),
            _ => String::new(),
        };

        Ok(Some(format!(
            "postgres://{}{}:{}/{}",
            auth,
            host.trim(),
            port,
            encode_component(name)
        )))
    }
}

/// Everything outside the RFC 3986 unreserved set
const URL_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URL_COMPONENT).to_string()
}

/// Values read straight from the process environment
#[derive(Debug, Clone, Default)]
struct EnvOverrides {
    /// Conventional `PORT`, used when `MICRODATA_PORT` is unset
    port: Option<String>,
    db: DbParts,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            port: std::env::var(ENV_PORT_FALLBACK).ok(),
            db: DbParts::from_env(),
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

/// PostgreSQL configuration (final/runtime)
#[derive(Debug, Clone, Default)]
pub struct PostgresConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to keep warm
    pub min_connections: u32,
    /// Connection acquire timeout in seconds
    pub acquire_timeout_secs: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,
    /// Max connection lifetime in seconds
    pub max_lifetime_secs: u64,
    /// Statement timeout in seconds (0 = disabled)
    pub statement_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub postgres: PostgresConfig,
}

/// Level schema cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Entry time-to-live in seconds (0 = cache disabled)
    pub schema_ttl_secs: u64,
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            schema_ttl_secs: DEFAULT_SCHEMA_CACHE_TTL_SECS,
            max_entries: DEFAULT_SCHEMA_CACHE_MAX_ENTRIES,
        }
    }
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.microdata/microdata.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        Self::resolve(cli, file_config, EnvOverrides::from_env())
    }

    /// Layer defaults, merged file config and CLI/env overrides
    fn resolve(cli: &CliConfig, file_config: FileConfig, env: EnvOverrides) -> Result<Self> {
        let file_server = file_config.server.unwrap_or_default();
        let file_pg = file_config
            .database
            .unwrap_or_default()
            .postgres
            .unwrap_or_default();
        let file_cache = file_config.cache.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let env_port = match env.port.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(
                raw.parse::<u16>()
                    .with_context(|| format!("Invalid {} value: {}", ENV_PORT_FALLBACK, raw))?,
            ),
            _ => None,
        };
        let port = cli
            .port
            .or(env_port)
            .or(file_server.port)
            .unwrap_or(DEFAULT_PORT);

        // An explicit URL wins over discrete DB_* settings
        let url = match cli.postgres_url.clone().or(file_pg.url) {
            Some(url) => url,
            None => env.db.to_url()?.unwrap_or_default(),
        };

        let postgres = PostgresConfig {
            url,
            max_connections: file_pg
                .max_connections
                .unwrap_or(POSTGRES_DEFAULT_MAX_CONNECTIONS),
            min_connections: file_pg
                .min_connections
                .unwrap_or(POSTGRES_DEFAULT_MIN_CONNECTIONS),
            acquire_timeout_secs: file_pg
                .acquire_timeout_secs
                .unwrap_or(POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS),
            idle_timeout_secs: file_pg
                .idle_timeout_secs
                .unwrap_or(POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS),
            max_lifetime_secs: file_pg
                .max_lifetime_secs
                .unwrap_or(POSTGRES_DEFAULT_MAX_LIFETIME_SECS),
            statement_timeout_secs: file_pg
                .statement_timeout_secs
                .unwrap_or(POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS),
        };

        let cache = CacheConfig {
            schema_ttl_secs: cli
                .schema_cache_ttl
                .or(file_cache.schema_ttl_secs)
                .unwrap_or(DEFAULT_SCHEMA_CACHE_TTL_SECS),
            max_entries: file_cache
                .max_entries
                .unwrap_or(DEFAULT_SCHEMA_CACHE_MAX_ENTRIES),
        };

        let config = Self {
            server: ServerConfig {
                host,
                port,
                cors_origins: file_server.cors_origins.unwrap_or_default(),
            },
            database: DatabaseConfig { postgres },
            cache,
        };

        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            cors_origins = ?config.server.cors_origins,
            pg_max_connections = config.database.postgres.max_connections,
            pg_statement_timeout_secs = config.database.postgres.statement_timeout_secs,
            schema_cache_ttl_secs = config.cache.schema_ttl_secs,
            schema_cache_max_entries = config.cache.max_entries,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if self.database.postgres.url.trim().is_empty() {
            anyhow::bail!(
                "Configuration error: database.postgres.url is required. \
                 Set via {} env var, DB_HOST/DB_NAME env vars, or database.postgres.url in config file.",
                ENV_POSTGRES_URL
            );
        }

        let pg = &self.database.postgres;
        if pg.min_connections > pg.max_connections {
            anyhow::bail!(
                "Configuration error: database.postgres.min_connections ({}) exceeds max_connections ({})",
                pg.min_connections,
                pg.max_connections
            );
        }

        if self.cache.schema_ttl_secs > 0 && self.cache.max_entries == 0 {
            anyhow::bail!("Configuration error: cache.max_entries must be greater than 0");
        }

        Ok(())
    }
}

/// Get the profile config path (~/.microdata/microdata.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
pub fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}
