use crate::app::config::PluginConfig;
use crate::core::enrichment::extract;
use crate::core::models::event::PluginEvent;
use crate::core::settings::Settings;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Host facing entry points. `setup` runs once with the raw plugin
/// config, `process_event` runs once per event against the settings
/// built by it. The plugin is immutable and cheap to share across workers
#[derive(Debug, Clone)]
pub struct ParamsToPropertiesPlugin {
    settings: Arc<Settings>,
}

impl ParamsToPropertiesPlugin {
    pub fn setup(config: &PluginConfig) -> Self {
        let settings = Settings::from(config);

        info!(
            parameters = ?settings.parameters,
            ignore_case = settings.ignore_case,
            set = settings.set_as_user_properties,
            set_once = settings.set_as_initial_user_properties,
            "Query parameter extraction configured"
        );

        ParamsToPropertiesPlugin {
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    pub fn process_event(&self, event: PluginEvent) -> Result<PluginEvent> {
        extract(&self.settings, event)
    }
}
