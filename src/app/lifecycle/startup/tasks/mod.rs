pub mod config_load;
pub mod event_pipeline;
pub mod observability;
pub mod plugin_setup;
