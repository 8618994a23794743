use crate::app::lifecycle::context::StartupContext;
use crate::core::observability;
use crate::core::pipeline::BlockingTask;
use anyhow::{Error, anyhow};
use tracing::info;

pub struct ConfigureObservabilityTask;

impl BlockingTask<StartupContext, Error> for ConfigureObservabilityTask {
    fn run(&self, context: &StartupContext) -> Result<(), Error> {
        let config = context
            .config
            .get()
            .ok_or_else(|| anyhow!("Config not loaded before observability initialization"))?;

        let guard = observability::init(&config.logging)?;

        context
            .observability
            .set(guard)
            .map_err(|_| anyhow!("Observability context already initialized"))?;

        info!("Hello world! Observability configured");

        Ok(())
    }
}
