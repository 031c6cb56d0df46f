//! Runtime configuration shared by the three services.
//!
//! Values come from a TOML file (`CONFIG_PATH`, default `config.toml`); a
//! missing file means "all defaults". Environment variables override the file.

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "ServerConfig::io_default")]
    pub io_server: ServerConfig,
    #[serde(default = "ServerConfig::business_default")]
    pub business_server: ServerConfig,
    #[serde(default = "ServerConfig::auth_default")]
    pub auth_server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub io_service: IoServiceConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            io_server: ServerConfig::io_default(),
            business_server: ServerConfig::business_default(),
            auth_server: ServerConfig::auth_default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            io_service: IoServiceConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl ServerConfig {
    fn with_port(port: u16) -> Self {
        Self { host: "0.0.0.0".into(), port, worker_threads: Some(4) }
    }
    pub fn io_default() -> Self { Self::with_port(5001) }
    pub fn business_default() -> Self { Self::with_port(4107) }
    pub fn auth_default() -> Self { Self::with_port(4000) }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Connection settings for the io-service store.
///
/// `url` wins when set; otherwise a postgres URL is assembled from the
/// host/port/credential fields.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default = "default_db_user")]
    pub username: String,
    #[serde(default = "default_db_password")]
    pub password: String,
    #[serde(default = "default_db_name")]
    pub name: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_db_host() -> String { "localhost".into() }
fn default_db_port() -> u16 { 5432 }
fn default_db_user() -> String { "admin".into() }
fn default_db_password() -> String { "admin".into() }
fn default_db_name() -> String { "products_db".into() }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            host: default_db_host(),
            port: default_db_port(),
            username: default_db_user(),
            password: default_db_password(),
            name: default_db_name(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Issued tokens carry `exp` only when this is set.
    #[serde(default)]
    pub token_ttl_secs: Option<u64>,
}

fn default_jwt_secret() -> String { "mykey".into() }

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: default_jwt_secret(), token_ttl_secs: None }
    }
}

/// How business-service reaches io-service.
#[derive(Debug, Clone, Deserialize)]
pub struct IoServiceConfig {
    #[serde(default = "default_io_url")]
    pub base_url: String,
    #[serde(default = "default_io_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_io_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_io_url() -> String { "http://io-service:5001".into() }
fn default_io_connect_timeout() -> u64 { 5 }
fn default_io_request_timeout() -> u64 { 30 }

impl Default for IoServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_io_url(),
            connect_timeout_secs: default_io_connect_timeout(),
            request_timeout_secs: default_io_request_timeout(),
            retry: RetryConfig::default(),
        }
    }
}

/// Retry policy for idempotent io-service reads.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    pub enabled: bool,
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub backoff_max_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { enabled: true, max_attempts: 3, backoff_base_ms: 100, backoff_max_ms: 2000 }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_influx_url")]
    pub influx_url: String,
    #[serde(default = "default_influx_db")]
    pub database: String,
    /// Listener for `/healthz` and `/metrics`.
    #[serde(default = "default_admin_addr")]
    pub admin_addr: String,
}

fn default_true() -> bool { true }
fn default_influx_url() -> String { "http://influxdb:8086".into() }
fn default_influx_db() -> String { "idp".into() }
fn default_admin_addr() -> String { "127.0.0.1:9107".into() }

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            influx_url: default_influx_url(),
            database: default_influx_db(),
            admin_addr: default_admin_addr(),
        }
    }
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if std::path::Path::new(&path).exists() {
        load_from_file(&path)
    } else {
        Ok(AppConfig::default())
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.apply_env(|key| std::env::var(key).ok());
        self.io_server.normalize()?;
        self.business_server.normalize()?;
        self.auth_server.normalize()?;
        self.database.validate()?;
        self.validate_endpoints()
    }

    /// Overlay environment variables, looked up through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        for (prefix, server) in [
            ("IO_SERVER", &mut self.io_server),
            ("BUSINESS_SERVER", &mut self.business_server),
            ("AUTH_SERVER", &mut self.auth_server),
        ] {
            if let Some(host) = lookup(&format!("{prefix}_HOST")) {
                server.host = host;
            }
            if let Some(port) = lookup(&format!("{prefix}_PORT")).and_then(|p| p.parse().ok()) {
                server.port = port;
            }
        }

        let db = &mut self.database;
        if let Some(url) = lookup("DATABASE_URL") { db.url = url; }
        if let Some(host) = lookup("DB_HOSTNAME") { db.host = host; }
        if let Some(port) = lookup("DB_PORT").and_then(|p| p.parse().ok()) { db.port = port; }
        if let Some(user) = lookup("USERNAME_DB") { db.username = user; }
        if let Some(password) = lookup("PASSWORD_DB") { db.password = password; }
        if let Some(name) = lookup("DB_NAME") { db.name = name; }

        if let Some(secret) = lookup("JWT_SECRET") { self.auth.jwt_secret = secret; }
        if let Some(ttl) = parsed("TOKEN_TTL_SECS") { self.auth.token_ttl_secs = Some(ttl); }

        if let Some(url) = lookup("IO_SERVICE_URL") { self.io_service.base_url = url; }

        if let Some(url) = lookup("INFLUX_URL") { self.metrics.influx_url = url; }
        if let Some(db_name) = lookup("INFLUX_DB") { self.metrics.database = db_name; }
        if let Some(enabled) = lookup("METRICS_ENABLED") {
            self.metrics.enabled = !matches!(enabled.trim(), "0" | "false" | "off");
        }
        if let Some(addr) = lookup("METRICS_ADMIN_ADDR") { self.metrics.admin_addr = addr; }
    }

    fn validate_endpoints(&self) -> Result<()> {
        let io = self.io_service.base_url.trim();
        if !(io.starts_with("http://") || io.starts_with("https://")) {
            return Err(anyhow!("io_service.base_url must start with http:// or https://"));
        }
        if self.auth.jwt_secret.is_empty() {
            return Err(anyhow!("auth.jwt_secret must not be empty"));
        }
        if self.io_service.retry.max_attempts == 0 {
            return Err(anyhow!("io_service.retry.max_attempts must be >= 1"));
        }
        if self.metrics.enabled && self.metrics.influx_url.trim().is_empty() {
            return Err(anyhow!("metrics.influx_url is empty while metrics are enabled"));
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// The URL handed to the ORM.
    pub fn connection_url(&self) -> String {
        if !self.url.trim().is_empty() {
            return self.url.clone();
        }
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.name
        )
    }

    pub fn validate(&self) -> Result<()> {
        let lower = self.connection_url().to_lowercase();
        if !(lower.starts_with("postgresql://")
            || lower.starts_with("postgres://")
            || lower.starts_with("sqlite:"))
        {
            return Err(anyhow!("database url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive"));
        }
        Ok(())
    }
}
