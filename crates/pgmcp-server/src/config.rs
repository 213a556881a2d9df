//! Server configuration.

use std::time::Duration;

use clap::Parser;
use pgmcp_catalog::RowCountMode;

/// pgmcp server command line arguments.
#[derive(Debug, Parser)]
#[command(name = "pgmcp-server")]
#[command(about = "PostgreSQL introspection, query tools and LLM prompts over HTTP")]
#[command(version)]
pub struct Args {
    /// Address to listen on for HTTP requests.
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    pub listen: String,

    /// Maximum pooled connections per registered database.
    #[arg(long, default_value_t = 5)]
    pub pool_max_connections: u32,

    /// Timeout (ms) when acquiring a pooled connection.
    #[arg(long, default_value_t = 30_000)]
    pub pool_acquire_timeout_ms: u64,

    /// Idle timeout (ms) after which pooled connections are closed.
    #[arg(long, default_value_t = 300_000)]
    pub pool_idle_timeout_ms: u64,

    /// Statement timeout (ms) applied to query, explain and metadata tools.
    #[arg(long, default_value_t = 30_000)]
    pub statement_timeout_ms: u64,

    /// Maximum number of registered connection strings.
    #[arg(long, default_value_t = 32)]
    pub max_connections: usize,

    /// Minutes without requests after which a registered connection is closed.
    #[arg(long, default_value_t = 30)]
    pub connection_timeout: u64,

    /// Count rows exactly instead of using statistics estimates.
    #[arg(long, default_value_t = false)]
    pub exact_row_counts: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on for HTTP requests.
    pub listen_addr: String,
    /// Maximum pooled connections per registered database.
    pub pool_max_connections: u32,
    /// Timeout when acquiring a pooled connection.
    pub pool_acquire_timeout: Duration,
    /// Idle timeout after which pooled connections are closed.
    pub pool_idle_timeout: Duration,
    /// Statement timeout for user-supplied SQL.
    pub statement_timeout: Duration,
    /// Maximum number of registered connection strings.
    pub max_connections: usize,
    /// Inactivity after which a registered connection is closed.
    pub connection_timeout: Duration,
    /// How often idle registered connections are swept.
    pub cleanup_interval: Duration,
    /// Row count mode for schema, table and view documents.
    pub row_counts: RowCountMode,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            listen_addr: args.listen,
            pool_max_connections: args.pool_max_connections,
            pool_acquire_timeout: Duration::from_millis(args.pool_acquire_timeout_ms),
            pool_idle_timeout: Duration::from_millis(args.pool_idle_timeout_ms),
            statement_timeout: Duration::from_millis(args.statement_timeout_ms),
            max_connections: args.max_connections,
            connection_timeout: Duration::from_secs(args.connection_timeout * 60),
            cleanup_interval: Duration::from_secs(60),
            row_counts: if args.exact_row_counts {
                RowCountMode::Exact
            } else {
                RowCountMode::Approximate
            },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8000".to_string(),
            pool_max_connections: 5,
            pool_acquire_timeout: Duration::from_secs(30),
            pool_idle_timeout: Duration::from_secs(300),
            statement_timeout: Duration::from_secs(30),
            max_connections: 32,
            connection_timeout: Duration::from_secs(30 * 60),
            cleanup_interval: Duration::from_secs(60),
            row_counts: RowCountMode::Approximate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults_match_config_defaults() {
        let args = Args::parse_from(["pgmcp-server"]);
        assert_eq!(args.log_level, "info");

        let config = ServerConfig::from(args);
        let default = ServerConfig::default();
        assert_eq!(config.listen_addr, default.listen_addr);
        assert_eq!(config.pool_max_connections, default.pool_max_connections);
        assert_eq!(config.statement_timeout, default.statement_timeout);
        assert_eq!(config.connection_timeout, default.connection_timeout);
        assert_eq!(config.row_counts, RowCountMode::Approximate);
    }

    #[test]
    fn test_exact_row_counts_flag() {
        let args = Args::parse_from([
            "pgmcp-server",
            "--exact-row-counts",
            "--statement-timeout-ms",
            "500",
            "--connection-timeout",
            "5",
        ]);
        let config = ServerConfig::from(args);
        assert_eq!(config.row_counts, RowCountMode::Exact);
        assert_eq!(config.statement_timeout, Duration::from_millis(500));
        assert_eq!(config.connection_timeout, Duration::from_secs(300));
    }
}
