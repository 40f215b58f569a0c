//! Runtime application configuration loaded from the environment.

use std::path::PathBuf;
use std::time::Duration;

use chatlog_client::{EmoteOptions, Endpoints};

use super::defaults::get_default;
use super::validation::validate_setting;
use crate::controller::LoadOptions;

/// Runtime configuration: defaults overridden by environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub log_limit: usize,
    pub http_timeout: Duration,
    pub include_global_emotes: bool,
    pub output_path: PathBuf,
    pub ivr_api_base: String,
    pub logs_api_base: String,
    pub seventv_api_base: String,
    pub bttv_api_base: String,
    pub ffz_api_base: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::load(|_| None).expect("built-in defaults are valid")
    }
}

impl AppConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::load(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` for each key, falling back to defaults.
    ///
    /// Empty values count as unset. Every value is validated.
    pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let g = |key: &str| -> Result<String, anyhow::Error> {
            let value = lookup(key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| get_default(key).map(str::to_string))
                .ok_or_else(|| anyhow::anyhow!("setting not found: {key}"))?;
            validate_setting(key, &value)
                .map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;
            Ok(value)
        };

        Ok(Self {
            log_limit: g("LOG_LIMIT")?.parse()?,
            http_timeout: Duration::from_secs(g("HTTP_TIMEOUT_SECS")?.parse()?),
            include_global_emotes: g("INCLUDE_GLOBAL_EMOTES")? == "true",
            output_path: PathBuf::from(g("OUTPUT_PATH")?),
            ivr_api_base: g("IVR_API_BASE")?,
            logs_api_base: g("LOGS_API_BASE")?,
            seventv_api_base: g("SEVENTV_API_BASE")?,
            bttv_api_base: g("BTTV_API_BASE")?,
            ffz_api_base: g("FFZ_API_BASE")?,
        })
    }

    /// Override the log limit, re-validating it.
    pub fn set_log_limit(&mut self, limit: usize) -> Result<(), anyhow::Error> {
        validate_setting("LOG_LIMIT", &limit.to_string())
            .map_err(|e| anyhow::anyhow!("validation error for LOG_LIMIT: {e}"))?;
        self.log_limit = limit;
        Ok(())
    }

    pub fn endpoints(&self) -> Result<Endpoints, anyhow::Error> {
        Ok(Endpoints::from_bases(
            &self.ivr_api_base,
            &self.logs_api_base,
            &self.seventv_api_base,
            &self.bttv_api_base,
            &self.ffz_api_base,
        )?)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            log_limit: self.log_limit,
            emotes: EmoteOptions {
                include_global: self.include_global_emotes,
                ..EmoteOptions::default()
            },
        }
    }
}
