use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Catalog limits applied at validation time, not as storage constraints.
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub items_per_page: u64,
    pub max_genres_per_dish: usize,
    pub max_ingredients_per_dish: usize,
    pub max_memo_length: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    /// Session/signing key consumed by the presentation middleware.
    pub secret_key: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "sqlite://data/kondate.db?mode=rwc")?
            .set_default("catalog.items_per_page", 10)?
            .set_default("catalog.max_genres_per_dish", 2)?
            .set_default("catalog.max_ingredients_per_dish", 10)?
            .set_default("catalog.max_memo_length", 500)?
            .set_default("secret_key", "dev-secret-key-change-in-production")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., KONDATE__SERVER__PORT)
            .add_source(Environment::with_prefix("KONDATE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
