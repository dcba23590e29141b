use anyhow::Context;
use serde::Deserialize;

/// Base configuration shared by the catalog API clients. Defaults to the
/// local development backend; override with `BOOKCATALOG_BASE_URL`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .set_default("base_url", "http://localhost:5000/api")?
            .add_source(config::Environment::with_prefix("BOOKCATALOG"))
            .build()
            .context("Failed to build api config")?;
        settings
            .try_deserialize()
            .context("Failed to deserialize api config")
    }
}
