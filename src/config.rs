use anyhow::Result;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Placeholder gateway used when no base URL is configured
pub const DEFAULT_API_BASE_URL: &str = "https://api.cloud-compute.example/v1";

/// Budget for a generation call
pub const GENERATE_TIMEOUT: Duration = Duration::from_secs(60);
/// Budget for health and usage probes
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub encrypt_keys: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            api: ApiConfig {
                base_url: normalize_base_url(
                    &env::var("ADCRAFT_API_BASE_URL")
                        .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
                ),
            },
            storage: StorageConfig {
                data_dir: env::var("ADCRAFT_DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| default_data_dir()),
                encrypt_keys: env::var("ADCRAFT_ENCRYPT_KEYS")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()?,
            },
        })
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// `$XDG_DATA_HOME/adcraft` (or the platform equivalent), falling back to `./.adcraft`
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("adcraft"))
        .unwrap_or_else(|| PathBuf::from(".adcraft"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("http://localhost:8080/v1/"), "http://localhost:8080/v1");
        assert_eq!(normalize_base_url(" http://a/b "), "http://a/b");
    }

    #[test]
    fn test_budgets() {
        assert_eq!(GENERATE_TIMEOUT.as_secs(), 60);
        assert_eq!(PROBE_TIMEOUT.as_secs(), 5);
    }
}
