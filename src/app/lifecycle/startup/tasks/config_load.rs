use crate::app::config::AppConfig;
use crate::app::lifecycle::context::StartupContext;
use crate::core::pipeline::BlockingTask;
use anyhow::{Error, anyhow};
use std::path::PathBuf;

pub(crate) struct ConfigLoadTask {
    path: PathBuf,
}

impl ConfigLoadTask {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl BlockingTask<StartupContext, Error> for ConfigLoadTask {
    fn run(&self, context: &StartupContext) -> Result<(), Error> {
        let config = AppConfig::load(&self.path)
            .map_err(|e| anyhow!("Failed to load config {}: {}", self.path.display(), e))?;

        // logging isnt up yet
        eprintln!("Config loaded from {}", self.path.display());

        context
            .config
            .set(config)
            .map_err(|_| anyhow!("Config already loaded!"))
    }
}
