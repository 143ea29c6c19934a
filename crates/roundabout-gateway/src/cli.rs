use clap::{Parser, Subcommand, ValueEnum};
use roundabout_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "ROUNDABOUT_LISTEN_ADDR";
pub const STORAGE_BACKEND_ENV: &str = "ROUNDABOUT_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "ROUNDABOUT_MYSQL_DSN";
pub const MYSQL_MAX_CONNECTIONS_ENV: &str = "ROUNDABOUT_MYSQL_MAX_CONNECTIONS";
pub const PUBLIC_BASE_URL_ENV: &str = "ROUNDABOUT_PUBLIC_BASE_URL";
pub const LOG_FORMAT_ENV: &str = "ROUNDABOUT_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_MYSQL_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Serve the admin API and ghost redirects (default).
    Serve,
    /// Create or upgrade the MySQL schema, then exit.
    Migrate,
    /// Remove every entry with its content record and drop the MySQL tables.
    Uninstall,
}

#[derive(Debug, Parser)]
#[command(name = "roundabout", about = "Round-robin redirect ring")]
pub struct CLI {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[arg(long, global = true, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(
        long,
        global = true,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, global = true, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    #[arg(
        long,
        global = true,
        env = MYSQL_MAX_CONNECTIONS_ENV,
        default_value_t = DEFAULT_MYSQL_MAX_CONNECTIONS
    )]
    pub mysql_max_connections: u32,

    /// Base URL the ghost links are published under.
    #[arg(long, global = true, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    #[arg(
        long,
        global = true,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Pretty
    )]
    pub log_format: LogFormatArg,
}
