use std::env;

use crate::detection::{DetectionParams, TimestampZone};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,

    // Detection defaults (overridable per request)
    pub default_price_threshold: f64,
    pub default_confidence_threshold: f64,
    pub default_include_close_price: bool,
    pub timestamp_zone: TimestampZone,

    // Upload
    pub max_upload_bytes: usize,

    // Bearer token for /api routes; auth disabled when unset
    pub api_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let timestamp_zone = match env::var("DISPLAY_TIMEZONE") {
            Ok(raw) => TimestampZone::from_str(&raw)
                .ok_or_else(|| anyhow::anyhow!("DISPLAY_TIMEZONE must be 'local' or 'utc'"))?,
            Err(_) => TimestampZone::Local,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            default_price_threshold: env::var("DEFAULT_PRICE_THRESHOLD")
                .unwrap_or_else(|_| "5".into())
                .parse()
                .unwrap_or(5.0),
            default_confidence_threshold: env::var("DEFAULT_CONFIDENCE_THRESHOLD")
                .unwrap_or_else(|_| "0.7".into())
                .parse()
                .unwrap_or(0.7),
            default_include_close_price: env::var("DEFAULT_INCLUDE_CLOSE_PRICE")
                .unwrap_or_else(|_| "true".into())
                .parse()
                .unwrap_or(true),
            timestamp_zone,

            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),

            api_token: env::var("API_TOKEN").ok().filter(|t| !t.is_empty()),
        })
    }

    /// Detection parameters built from the configured defaults.
    pub fn default_params(&self) -> DetectionParams {
        DetectionParams {
            price_threshold: self.default_price_threshold,
            confidence_threshold: self.default_confidence_threshold,
            include_close_price: self.default_include_close_price,
            timestamp_zone: self.timestamp_zone,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            default_price_threshold: 5.0,
            default_confidence_threshold: 0.7,
            default_include_close_price: true,
            timestamp_zone: TimestampZone::Local,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            api_token: None,
        }
    }
}
