//! Configuration type definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{MetadataCategory, ScopeFilter, ScopePolicy};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Engine identifier, optionally with a version (`postgres@16`).
    pub engine: String,

    /// Default table/schema filter.
    #[serde(default)]
    pub scope: ScopeFilter,

    /// Overrides the engine's own scope rules when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_policy: Option<ScopePolicy>,

    /// Connection settings. Only the CLI opens connections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionConfig>,

    /// Categories read by `dump` when none are given on the command line.
    #[serde(default = "default_categories")]
    pub categories: Vec<MetadataCategory>,
}

impl Config {
    /// Minimal configuration for an engine, with every category selected.
    pub fn for_engine(engine: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            scope: ScopeFilter::all(),
            scope_policy: None,
            connection: None,
            categories: default_categories(),
        }
    }
}

/// Database connection settings.
///
/// Engines reached over ODBC (Db2 for i, generic) use `dsn`; the others
/// use host/port/database/user/password.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Database host.
    #[serde(default)]
    pub host: String,

    /// Database port. Defaults per engine (5432, 1433, 3306).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Database name.
    #[serde(default)]
    pub database: String,

    /// Username.
    #[serde(default)]
    pub user: String,

    /// Password.
    #[serde(default)]
    pub password: String,

    /// Full ODBC connection string (`DSN=...;UID=...;PWD=...`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dsn: Option<String>,

    /// Trust the server certificate without validation (SQL Server).
    #[serde(default)]
    pub trust_server_cert: bool,
}

impl ConnectionConfig {
    /// Configured port, or the engine's default.
    pub fn port_or(&self, default: u16) -> u16 {
        self.port.unwrap_or(default)
    }

    /// Key/value connection string for tokio-postgres.
    pub fn postgres_connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            pg_quote(&self.host),
            self.port_or(5432),
            pg_quote(&self.database),
            pg_quote(&self.user),
            pg_quote(&self.password)
        )
    }

    /// ADO-style connection string for tiberius.
    pub fn mssql_connection_string(&self) -> String {
        format!(
            "Server=tcp:{},{};Database={};User Id={};Password={};TrustServerCertificate={}",
            self.host,
            self.port_or(1433),
            ado_quote(&self.database),
            ado_quote(&self.user),
            ado_quote(&self.password),
            self.trust_server_cert
        )
    }

    /// URL for sqlx.
    pub fn mysql_url(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.password),
            self.host,
            self.port_or(3306),
            urlencoding::encode(&self.database)
        )
    }
}

/// Single-quote a libpq keyword value, escaping `\` and `'`.
fn pg_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

/// Double-quote an ADO value, doubling embedded quotes.
fn ado_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("dsn", &self.dsn.as_ref().map(|_| "[REDACTED]"))
            .field("trust_server_cert", &self.trust_server_cert)
            .finish()
    }
}

fn default_categories() -> Vec<MetadataCategory> {
    MetadataCategory::ALL.to_vec()
}
