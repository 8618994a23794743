use crate::core::pipeline::{BlockingTask, Pipeline};
use anyhow::Error;
use tracing::Span;

/// A task which wraps a pipeline so the whole run executes inside one
/// span, e.g. a sampled root span from ['sample_or_attach_root_span']
pub struct WrappedPipelineTask<T> {
    pipeline: Pipeline<T, Error>,
    span_provider: Box<dyn Fn() -> Span + Send + Sync>,
}

impl<T> WrappedPipelineTask<T> {
    /// Create a wrapped pipeline that will execute
    /// under the resulting span from the span provider
    pub fn new<F>(pipeline: Pipeline<T, Error>, span_provider: F) -> Self
    where
        F: Fn() -> Span + Sync + Send + 'static,
    {
        WrappedPipelineTask {
            pipeline,
            span_provider: Box::new(span_provider),
        }
    }
}

impl<T> BlockingTask<T, Error> for WrappedPipelineTask<T> {
    fn run(&self, context: &T) -> Result<(), Error> {
        let span = (self.span_provider)();
        let _enter = span.enter();

        self.pipeline.run(context)
    }
}
