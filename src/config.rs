use log::warn;
use rocket::figment::Figment;
use serde::Deserialize;

/// Pagination bounds for list endpoints, read from the `[default.sitrep]`
/// section of the rocket figment.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

impl ApiConfig {
    pub fn from_figment(figment: &Figment) -> ApiConfig {
        figment.extract_inner("sitrep").unwrap_or_else(|e| {
            warn!("no usable [sitrep] config ({e}), falling back to defaults");
            ApiConfig::default()
        })
    }
}
