use crate::app::lifecycle::context::StartupContext;
use crate::core::pipeline::BlockingTask;
use crate::core::plugin::ParamsToPropertiesPlugin;
use anyhow::{Error, anyhow};
use std::sync::Arc;
use tracing::instrument;

/// Normalizes the raw plugin config into settings, once for the process
pub struct PluginSetupTask;

impl BlockingTask<StartupContext, Error> for PluginSetupTask {
    #[instrument(skip_all, name = "plugin_setup_task")]
    fn run(&self, context: &StartupContext) -> Result<(), Error> {
        let config = context
            .config
            .get()
            .ok_or_else(|| anyhow!("Config not loaded before plugin setup"))?;

        let plugin = ParamsToPropertiesPlugin::setup(&config.plugin);

        if plugin.settings().parameters.is_empty() {
            tracing::warn!("No query parameters configured, events will pass through unchanged");
        }

        context
            .plugin
            .set(Arc::new(plugin))
            .map_err(|_| anyhow!("Plugin already set up!"))
    }
}
