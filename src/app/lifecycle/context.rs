use crate::app::config::AppConfig;
use crate::app::pipeline::events::EventContext;
use crate::core::observability::ObservabilityGuard;
use crate::core::pipeline::Pipeline;
use crate::core::plugin::ParamsToPropertiesPlugin;
use anyhow::Error;
use std::sync::{Arc, OnceLock};

#[derive(Default)]
pub struct StartupContext {
    /// Loaded app config, file plus env overrides
    pub config: OnceLock<AppConfig>,
    /// Log writer guards, must outlive every event processed
    pub observability: OnceLock<ObservabilityGuard>,
    /// The plugin with its settings normalized once at startup
    pub plugin: OnceLock<Arc<ParamsToPropertiesPlugin>>,
    /// The pipeline which defines the full handling of a single event
    pub event_pipeline: OnceLock<Arc<Pipeline<EventContext, Error>>>,
}
