use clap::{Parser, ValueEnum};
use gurl_core::LinkSettings;
use jiff::SignedDuration;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const LISTEN_ADDR_ENV: &str = "GURL_LISTEN_ADDR";
pub const KEY_LENGTH_ENV: &str = "GURL_KEY_LENGTH";
pub const SEPARATOR_EVERY_ENV: &str = "GURL_SEPARATOR_EVERY";
pub const TTL_ENV: &str = "GURL_TTL";
pub const SWEEP_INTERVAL_ENV: &str = "GURL_SWEEP_INTERVAL";
pub const MAX_CREATE_ATTEMPTS_ENV: &str = "GURL_MAX_CREATE_ATTEMPTS";
pub const DB_PATH_ENV: &str = "GURL_DB_PATH";
pub const ASSUME_TLS_ENV: &str = "GURL_ASSUME_TLS";
pub const LOG_FORMAT_ENV: &str = "GURL_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:9999";
pub const DEFAULT_DB_PATH: &str = "uri.store";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[value(name = "pretty")]
    Pretty,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "gurl", about = "An ultralight url shortener")]
pub struct CLI {
    #[arg(short = 'b', long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Number of random characters in a generated key.
    #[arg(short = 'l', long, env = KEY_LENGTH_ENV, default_value_t = 10)]
    pub key_length: usize,

    /// Insert a '-' before every n-th key character.
    #[arg(short = 'd', long, env = SEPARATOR_EVERY_ENV, default_value_t = 5)]
    pub separator_every: usize,

    /// How long an unused link lives, e.g. `24h` or `90m`.
    #[arg(short = 'c', long, env = TTL_ENV, default_value = "24h")]
    pub ttl: SignedDuration,

    #[arg(long, env = SWEEP_INTERVAL_ENV, default_value = "1s", value_parser = parse_interval)]
    pub sweep_interval: Duration,

    #[arg(long, env = MAX_CREATE_ATTEMPTS_ENV, default_value_t = 3)]
    pub max_create_attempts: u32,

    #[arg(long, env = DB_PATH_ENV, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Build `https` short URLs regardless of request headers.
    #[arg(long, env = ASSUME_TLS_ENV)]
    pub assume_tls: bool,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl CLI {
    pub fn link_settings(&self) -> LinkSettings {
        LinkSettings::builder()
            .key_length(self.key_length)
            .separator_every(self.separator_every)
            .ttl(self.ttl)
            .sweep_interval(self.sweep_interval)
            .max_create_attempts(self.max_create_attempts)
            .build()
    }
}

fn parse_interval(raw: &str) -> Result<Duration, String> {
    let signed: SignedDuration = raw.parse().map_err(|e: jiff::Error| e.to_string())?;
    Duration::try_from(signed).map_err(|e| e.to_string())
}
