use crate::app::lifecycle::context::StartupContext;
use crate::app::pipeline::events::{EventContext, build_event_pipeline};
use crate::app::span::WrappedPipelineTask;
use crate::core::pipeline::{BlockingTask, PipelineBuilder};
use crate::sample_or_attach_root_span;
use anyhow::{Error, anyhow};
use std::sync::Arc;
use tracing::instrument;

pub struct BuildEventPipelineTask;

impl BlockingTask<StartupContext, Error> for BuildEventPipelineTask {
    #[instrument(skip_all, name = "build_event_pipeline_task")]
    fn run(&self, context: &StartupContext) -> Result<(), Error> {
        let plugin = context
            .plugin
            .get()
            .ok_or_else(|| anyhow!("No plugin set up?! Cant build event pipeline"))?;

        let sample_rate = context
            .config
            .get()
            .map(|config| config.logging.span_sample_rate)
            .unwrap_or_default();

        let event_pipeline = build_event_pipeline(plugin)?;

        let observed_pipeline_task = WrappedPipelineTask::new(event_pipeline, move || {
            sample_or_attach_root_span!(sample_rate, "event_pipeline")
        });

        let observed_pipeline = PipelineBuilder::<EventContext, Error>::new()
            .with_blocking(Box::new(observed_pipeline_task))
            .build()
            .ok_or_else(|| anyhow!("Failed to build observed event pipeline"))?;

        context
            .event_pipeline
            .set(Arc::new(observed_pipeline))
            .map_err(|_| anyhow!("event_pipeline already assigned!"))
    }
}
