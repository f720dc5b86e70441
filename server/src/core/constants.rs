// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Microdata";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "microdata";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".microdata";

/// Greeting served at `/`
pub const WELCOME_MESSAGE: &str = "Welcome to the Microdata API Gateway!";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "microdata.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "MICRODATA_CONFIG";

// =============================================================================
// Environment Variables - Debug
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "MICRODATA_DEBUG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "MICRODATA_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "MICRODATA_PORT";

/// Conventional platform port variable, used when `MICRODATA_PORT` is unset
pub const ENV_PORT_FALLBACK: &str = "PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "MICRODATA_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 3000;

/// Graceful shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Pagination
// =============================================================================

/// Page size when `limit` is omitted
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Largest accepted page size
pub const MAX_PAGE_LIMIT: u32 = 1000;

/// Largest accepted page number
pub const MAX_PAGE: u32 = 1_000_000;

// =============================================================================
// Environment Variables - PostgreSQL
// =============================================================================

/// Environment variable for PostgreSQL connection URL
pub const ENV_POSTGRES_URL: &str = "MICRODATA_POSTGRES_URL";

/// Discrete connection settings, used when no URL is configured
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_NAME: &str = "DB_NAME";
pub const ENV_DB_PORT: &str = "DB_PORT";

/// Default PostgreSQL port for discrete connection settings
pub const DEFAULT_DB_PORT: u16 = 5432;

// =============================================================================
// PostgreSQL Database
// =============================================================================

/// PostgreSQL default max connections
pub const POSTGRES_DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL default min connections (keep warm for low latency)
pub const POSTGRES_DEFAULT_MIN_CONNECTIONS: u32 = 2;

/// PostgreSQL default connection acquire timeout in seconds
pub const POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// PostgreSQL idle connection timeout in seconds (release unused connections)
pub const POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

/// PostgreSQL max connection lifetime in seconds
pub const POSTGRES_DEFAULT_MAX_LIFETIME_SECS: u64 = 1800;

/// PostgreSQL statement timeout in seconds (0 = disabled)
pub const POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 60;

/// Interval of the background pool health check in seconds
pub const POSTGRES_HEALTH_CHECK_INTERVAL_SECS: u64 = 60;

/// Tables the gateway reads from; it never creates them
pub const REQUIRED_TABLES: [&str; 3] = ["surveys", "survey_levels", "survey_data"];

// =============================================================================
// Level Schema Cache
// =============================================================================

/// Default TTL of cached level field allow-lists in seconds (0 = disabled)
pub const DEFAULT_SCHEMA_CACHE_TTL_SECS: u64 = 300;

/// Default maximum number of cached levels
pub const DEFAULT_SCHEMA_CACHE_MAX_ENTRIES: u64 = 1024;

// =============================================================================
// HTTP Limits
// =============================================================================

/// Request body limit; every endpoint is a GET
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;
