use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from file: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("market_data.provider = \"remote\" requires market_data.base_url")]
    MissingBaseUrl,
}
