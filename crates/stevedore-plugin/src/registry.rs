//! Plugin capability: substitute how remote sessions are constructed.
//!
//! Third parties implement [`Plugin`] and register it with
//! [`set_plugin`] before the first [`plugin`] call; the resolved value
//! is a process-wide singleton. There is no runtime entry-point
//! discovery in a Rust process, so the static override *is* the
//! registration mechanism.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Endpoint used when nothing is configured.
const SANDBOX_ENDPOINT: &str = "localhost:30080";

/// Connection settings for a remote session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Endpoint of the remote workflow engine. `None` selects the local
    /// sandbox.
    #[serde(default)]
    pub endpoint: Option<String>,
    pub project: String,
    pub domain: String,
    /// Where packaged code archives are uploaded.
    #[serde(default)]
    pub data_upload_location: Option<String>,
}

/// Handle for a constructed remote session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSession {
    pub endpoint: String,
    pub project: String,
    pub domain: String,
    pub data_upload_location: Option<String>,
}

/// Capability interface third parties implement to swap session
/// construction or extend the command surface.
pub trait Plugin: Send + Sync {
    /// Construct a remote session for a CLI invocation.
    fn create_session(&self, config: &RemoteConfig) -> anyhow::Result<RemoteSession>;

    /// Customize the CLI command tree. The default leaves it unchanged.
    fn configure_cli(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Name used in log output.
    fn name(&self) -> &str;
}

/// Default session construction, falling back to the local sandbox when
/// no endpoint is configured.
#[derive(Debug, Default)]
pub struct DefaultPlugin;

impl Plugin for DefaultPlugin {
    fn create_session(&self, config: &RemoteConfig) -> anyhow::Result<RemoteSession> {
        let endpoint = match &config.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => {
                info!("no endpoint configured, creating session against the sandbox");
                SANDBOX_ENDPOINT.to_string()
            }
        };
        Ok(RemoteSession {
            endpoint,
            project: config.project.clone(),
            domain: config.domain.clone(),
            data_upload_location: config.data_upload_location.clone(),
        })
    }

    fn name(&self) -> &str {
        "default"
    }
}

static PLUGIN: OnceCell<Arc<dyn Plugin>> = OnceCell::new();

/// Register a replacement plugin.
///
/// Must run before the first [`plugin`] call; once the singleton has
/// resolved, the rejected value is handed back to the caller.
pub fn set_plugin(plugin: Arc<dyn Plugin>) -> Result<(), Arc<dyn Plugin>> {
    PLUGIN.set(plugin)
}

/// Get the current plugin, resolving it on first use.
pub fn plugin() -> Arc<dyn Plugin> {
    PLUGIN
        .get_or_init(|| {
            info!(plugin = "default", "resolving plugin");
            Arc::new(DefaultPlugin)
        })
        .clone()
}
