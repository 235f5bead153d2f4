use serde::Deserialize;
use sqlx::postgres::PgSslMode;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    pub database: Database,
    #[serde(default)]
    pub schema_failure: SchemaFailure,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    pub url: String,
    #[serde(default)]
    pub tls: TlsMode,
}

/// TLS strictness for the database connection. `Require` encrypts the
/// connection without verifying the server certificate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    #[default]
    Disable,
    Require,
}

impl TlsMode {
    pub fn ssl_mode(self) -> PgSslMode {
        match self {
            TlsMode::Disable => PgSslMode::Disable,
            TlsMode::Require => PgSslMode::Require,
        }
    }
}

/// What to do when the startup schema bootstrap fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaFailure {
    #[default]
    Abort,
    Continue,
}

impl Config {
    /// Load configuration from an optional `config.toml` plus
    /// `TINYBIN`-prefixed environment variables (`__` separates nesting,
    /// e.g. `TINYBIN__DATABASE__URL`).
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config.toml").required(false))
            .add_source(config::Environment::with_prefix("TINYBIN").separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }
}

fn default_port() -> u16 {
    3000
}
