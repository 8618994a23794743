pub mod config;
pub mod lifecycle;
pub mod pipeline;
pub mod runner;
pub mod span;
