use crate::app::pipeline::events::context::EventContext;
use crate::app::pipeline::events::tasks::{InjectParamsTask, ParseCurrentUrlTask};
use crate::core::pipeline::{Pipeline, PipelineBuilder};
use crate::core::plugin::ParamsToPropertiesPlugin;
use anyhow::{Error, bail};

pub fn build_event_pipeline(
    plugin: &ParamsToPropertiesPlugin,
) -> Result<Pipeline<EventContext, Error>, Error> {
    let settings = plugin.settings();

    let event_pipeline = PipelineBuilder::<EventContext, Error>::new()
        // Parses $current_url once, a bad url fails the event before any mutation
        .with_blocking(Box::new(ParseCurrentUrlTask::new(settings.clone())))
        // Copies matched params into properties and $set/$set_once
        .with_blocking(Box::new(InjectParamsTask::new(settings.clone())))
        .build();

    match event_pipeline {
        Some(pipeline) => Ok(pipeline),
        None => bail!("Failed to build event pipeline"),
    }
}
