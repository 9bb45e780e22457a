//! Configuration loading and representation.
//!
//! Values come from the process environment, optionally merged with a `.env`
//! file. Every key has a default that works against a stock local MySQL
//! install.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use sqlx::mysql::MySqlConnectOptions;

/// Merge `.env` from the working directory (or a parent) into the
/// environment. Existing variables win. Returns the file used, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Which [`ClimateStore`](crate::store::ClimateStore) backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    MySql,
    /// Seeded in-memory sample data (dev/test).
    InMemory,
}

impl StoreKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "mysql" => Some(StoreKind::MySql),
            "memory" | "in-memory" | "in_memory" => Some(StoreKind::InMemory),
            _ => None,
        }
    }
}

/// MySQL connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "climate_data".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let opts = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database);
        if self.password.is_empty() {
            opts
        } else {
            opts.password(&self.password)
        }
    }
}

/// Process-level configuration for the API server and the seeding tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub store: StoreKind,
    pub database: DatabaseConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 5001)),
            store: StoreKind::MySql,
            database: DatabaseConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read the process environment.
    ///
    /// Call [`load_dotenv`] first to merge a `.env` file.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build a config from explicit key/value pairs.
    ///
    /// Malformed numeric values fall back to defaults with a warning.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let get = |key: &str| vars.get(key).map(String::as_str);

        let mut cfg = AppConfig::default();
        let db = &mut cfg.database;

        if let Some(v) = get("MYSQL_HOST") {
            db.host = v.to_string();
        }
        if let Some(v) = get("MYSQL_USER") {
            db.user = v.to_string();
        }
        if let Some(v) = get("MYSQL_PASSWORD") {
            db.password = v.to_string();
        }
        if let Some(v) = get("MYSQL_DB") {
            db.database = v.to_string();
        }
        if let Some(v) = get("MYSQL_PORT") {
            match v.parse() {
                Ok(port) => db.port = port,
                Err(_) => tracing::warn!(value = v, "MYSQL_PORT is not a port number; using default"),
            }
        }
        if let Some(v) = get("MYSQL_MAX_CONNECTIONS") {
            match v.parse::<u32>() {
                Ok(n) if n > 0 => db.max_connections = n,
                _ => tracing::warn!(value = v, "MYSQL_MAX_CONNECTIONS is invalid; using default"),
            }
        }

        if let Some(v) = get("ECOVISION_BIND") {
            match v.parse() {
                Ok(addr) => cfg.bind = addr,
                Err(_) => tracing::warn!(value = v, "ECOVISION_BIND is not a socket address; using default"),
            }
        }
        if let Some(v) = get("ECOVISION_STORE") {
            match StoreKind::parse(v) {
                Some(kind) => cfg.store = kind,
                None => tracing::warn!(value = v, "unknown ECOVISION_STORE; falling back to mysql"),
            }
        }

        cfg
    }
}
