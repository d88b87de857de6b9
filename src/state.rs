//! Application state shared by the web handlers and CLI commands.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::config::Config;
use crate::sedna::SednaClient;

#[derive(Clone)]
pub struct AppState {
    pub sedna: Arc<SednaClient>,
    pub sedna_base_url: String,
    pub request_interval: Duration,
    /// `jours` used when a schedule request omits it.
    pub default_day_window: u32,
}

impl AppState {
    pub fn new(sedna: Arc<SednaClient>, config: &Config) -> Self {
        Self {
            sedna,
            sedna_base_url: config.sedna_base_url.clone(),
            request_interval: config.request_interval,
            default_day_window: config.default_day_window,
        }
    }

    /// Build the Sedna client from `config` and wrap it in shared state.
    pub fn from_config(config: &Config) -> Result<Self> {
        let sedna = SednaClient::new_with_config(
            &config.sedna_base_url,
            config.request_interval,
            config.request_timeout,
        )?;
        Ok(Self::new(Arc::new(sedna), config))
    }
}
