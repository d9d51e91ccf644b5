//! Coordination-server configuration adapter.
//!
//! The server answers `get_config` with a flat JSON object in operator
//! units.  This adapter decodes it into [`DeploymentParams`] and implements
//! [`ConfigSource`] on top of whatever transport fetches the body; the HTTP
//! exchange itself lives outside this crate.

use anyhow::{Context, Result, anyhow, bail};
use log::{debug, warn};

use crate::app::ports::ConfigSource;
use crate::deployment::DeploymentParams;
use crate::error::ConfigError;

/// Decode a `get_config` response body.
///
/// Missing fields stay unset.  Non-finite numbers are refused outright
/// rather than silently disabling a condition.
pub fn parse_deployment_body(body: &str) -> Result<DeploymentParams> {
    let params: DeploymentParams =
        serde_json::from_str(body).map_err(|e| anyhow!("config body is not valid JSON: {e}"))?;

    for (field, value) in [
        ("depth", params.target_depth_m),
        ("depth_band", params.depth_band_m),
        ("temperature", params.target_temperature_c),
        ("temp_band", params.temperature_band_c),
        ("flow_volume", params.target_volume_l),
        ("min_flowrate", params.min_flowrate_l_per_min),
    ] {
        if !value.is_finite() {
            bail!("config field `{field}` is not a finite number");
        }
    }
    Ok(params)
}

/// [`ConfigSource`] that pulls a JSON body from `fetch_body` and decodes it.
///
/// Transport failures map to [`ConfigError::Unavailable`], decode failures
/// to [`ConfigError::Malformed`].
pub struct JsonConfigSource<F> {
    fetch_body: F,
}

impl<F> JsonConfigSource<F>
where
    F: FnMut() -> Result<String>,
{
    pub fn new(fetch_body: F) -> Self {
        Self { fetch_body }
    }
}

impl<F> ConfigSource for JsonConfigSource<F>
where
    F: FnMut() -> Result<String>,
{
    fn fetch(&mut self) -> Result<DeploymentParams, ConfigError> {
        let body = (self.fetch_body)()
            .context("fetching deployment config")
            .map_err(|e| {
                warn!("{:#}", e);
                ConfigError::Unavailable
            })?;
        debug!("Config body: {}", body);
        parse_deployment_body(&body).map_err(|e| {
            warn!("{:#}", e);
            ConfigError::Malformed
        })
    }
}
