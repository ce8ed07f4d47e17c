use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Command line of the external record generator, e.g. `cargo run --release`.
    pub generator_command: Option<String>,
    /// Working directory the generator runs in.
    pub generator_dir: Option<String>,
    pub generator_timeout_secs: u64,
    /// TTL of the fetch-by-id record cache.
    pub record_cache_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DB_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .map_err(|_| anyhow::anyhow!("DB_URL or DATABASE_URL environment variable required"))
            .and_then(validate_database_url)?;

        let generator_timeout_secs: u64 = parse_var("GENERATOR_TIMEOUT_SECS", 60)?;
        if generator_timeout_secs == 0 {
            anyhow::bail!("GENERATOR_TIMEOUT_SECS must be a positive number of seconds");
        }

        let config = Self {
            database_url,
            port: parse_var("PORT", 3000)
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            generator_command: optional_var("GENERATOR_COMMAND"),
            generator_dir: optional_var("GENERATOR_DIR"),
            generator_timeout_secs,
            record_cache_ttl_secs: parse_var("RECORD_CACHE_TTL_SECS", 300)?,
        };

        // Never log the full database URL
        tracing::info!("Configuration loaded successfully");
        tracing::debug!(
            "Database URL: {}...",
            config.database_url.chars().take(20).collect::<String>()
        );
        match config.generator_command {
            Some(ref command) => tracing::info!("Generator command configured: {}", command),
            None => tracing::warn!("GENERATOR_COMMAND not set, trigger-pipeline is disabled"),
        }
        tracing::debug!(
            "Server Port: {}, record cache TTL: {}s",
            config.port,
            config.record_cache_ttl_secs
        );

        Ok(config)
    }
}

fn validate_database_url(url: String) -> anyhow::Result<String> {
    if url.trim().is_empty() {
        anyhow::bail!("DB_URL cannot be empty");
    }
    if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
        anyhow::bail!("DB_URL must start with postgresql:// or postgres://");
    }
    Ok(url)
}

/// Unset and blank variables read as `None`.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str, default: T) -> anyhow::Result<T> {
    match optional_var(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {}", name, raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_scheme() {
        assert!(validate_database_url("postgres://u:p@localhost/db".into()).is_ok());
        assert!(validate_database_url("postgresql://localhost/db".into()).is_ok());
        assert!(validate_database_url("mysql://localhost/db".into()).is_err());
        assert!(validate_database_url("   ".into()).is_err());
    }

    #[test]
    fn test_parse_var_defaults_when_unset() {
        let value: u64 = parse_var("DARKDATA_TEST_SURELY_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
        assert_eq!(optional_var("DARKDATA_TEST_SURELY_UNSET_VAR"), None);
    }
}
