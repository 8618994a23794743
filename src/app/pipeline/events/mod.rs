pub mod context;
pub mod pipeline;
pub mod tasks;

pub use context::{EventContext, EventOutcome};
pub use pipeline::build_event_pipeline;
