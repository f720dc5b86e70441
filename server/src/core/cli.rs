use clap::Parser;

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_DEBUG, ENV_HOST, ENV_PORT, ENV_POSTGRES_URL};

#[derive(Parser)]
#[command(name = "microdata")]
#[command(version, about = "Read-only HTTP gateway over survey microdata", long_about = None)]
pub struct Cli {
    /// Server host address
    #[arg(long, short = 'H', env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port (falls back to PORT)
    #[arg(long, short = 'p', env = ENV_PORT)]
    pub port: Option<u16>,

    /// Enable debug logging
    #[arg(long, env = ENV_DEBUG)]
    pub debug: bool,

    /// Path to config file
    #[arg(long, short = 'c', env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// PostgreSQL connection URL (overrides DB_* settings)
    #[arg(long, env = ENV_POSTGRES_URL)]
    pub postgres_url: Option<String>,

    /// Level schema cache TTL in seconds (0 disables the cache)
    #[arg(long)]
    pub schema_cache_ttl: Option<u64>,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: bool,
    pub config: Option<PathBuf>,
    pub postgres_url: Option<String>,
    pub schema_cache_ttl: Option<u64>,
}

/// Parse CLI arguments
pub fn parse() -> CliConfig {
    let cli = Cli::parse();
    CliConfig {
        host: cli.host,
        port: cli.port,
        debug: cli.debug,
        config: cli.config,
        postgres_url: cli.postgres_url,
        schema_cache_ttl: cli.schema_cache_ttl,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "microdata",
            "--host",
            "0.0.0.0",
            "-p",
            "8080",
            "--debug",
            "--postgres-url",
            "postgres://u:p@db/survey",
            "--schema-cache-ttl",
            "0",
        ])
        .unwrap();

        assert_eq!(cli.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(cli.port, Some(8080));
        assert!(cli.debug);
        assert_eq!(cli.postgres_url.as_deref(), Some("postgres://u:p@db/survey"));
        assert_eq!(cli.schema_cache_ttl, Some(0));
    }

    #[test]
    fn test_cli_rejects_invalid_port() {
        assert!(Cli::try_parse_from(["microdata", "--port", "70000"]).is_err());
        assert!(Cli::try_parse_from(["microdata", "--port", "abc"]).is_err());
    }
}
