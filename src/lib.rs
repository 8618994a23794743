//! Enriches analytics events with query parameters taken from their
//! `$current_url`, optionally mirrored into `$set` and `$set_once`
//! user properties.
//!
//! ```
//! use paramprops::{ParamsToPropertiesPlugin, PluginConfigBuilder, PluginEvent};
//!
//! let config = PluginConfigBuilder::default()
//!     .prefix("utm_")
//!     .parameters("source, medium")
//!     .build()?;
//! let plugin = ParamsToPropertiesPlugin::setup(&config);
//!
//! let event: PluginEvent = serde_json::from_str(
//!     r#"{"properties":{"$current_url":"https://x.com/?source=news"}}"#,
//! )?;
//! let event = plugin.process_event(event)?;
//!
//! assert_eq!(event.properties().unwrap()["utm_source"], "news");
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod app;
pub mod core;

pub use crate::app::config::{PluginConfig, PluginConfigBuilder};
pub use crate::core::enrichment::extract;
pub use crate::core::models::event::PluginEvent;
pub use crate::core::plugin::ParamsToPropertiesPlugin;
pub use crate::core::settings::Settings;
