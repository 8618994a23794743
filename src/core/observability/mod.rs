pub mod macros;
mod provider;

pub use provider::{ObservabilityGuard, init};
