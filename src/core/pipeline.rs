/// A single synchronous unit of work run against a shared pipeline context.
/// Tasks communicate through the context, typically by filling `OnceLock`
/// slots or taking a write lock on mutable state
pub trait BlockingTask<C, E>: Send + Sync {
    fn run(&self, context: &C) -> Result<(), E>;
}

/// An ordered list of tasks. Running the pipeline runs each task in
/// insertion order and stops at the first error
pub struct Pipeline<C, E> {
    tasks: Vec<Box<dyn BlockingTask<C, E>>>,
}

impl<C, E> Pipeline<C, E> {
    pub fn run(&self, context: &C) -> Result<(), E> {
        for task in &self.tasks {
            task.run(context)?;
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}

pub struct PipelineBuilder<C, E> {
    tasks: Vec<Box<dyn BlockingTask<C, E>>>,
}

impl<C, E> Default for PipelineBuilder<C, E> {
    fn default() -> Self {
        Self { tasks: Vec::new() }
    }
}

impl<C, E> PipelineBuilder<C, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blocking(mut self, task: Box<dyn BlockingTask<C, E>>) -> Self {
        self.tasks.push(task);
        self
    }

    /// Returns `None` when no tasks were added, an empty
    /// pipeline is always a wiring mistake
    pub fn build(self) -> Option<Pipeline<C, E>> {
        if self.tasks.is_empty() {
            return None;
        }

        Some(Pipeline { tasks: self.tasks })
    }
}
