pub mod enrichment;
pub mod models;
pub mod observability;
pub mod pipeline;
pub mod plugin;
pub mod settings;
