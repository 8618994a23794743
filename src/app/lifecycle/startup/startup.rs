use crate::app::lifecycle::context::StartupContext;
use crate::app::lifecycle::startup::tasks::config_load::ConfigLoadTask;
use crate::app::lifecycle::startup::tasks::event_pipeline::BuildEventPipelineTask;
use crate::app::lifecycle::startup::tasks::observability::ConfigureObservabilityTask;
use crate::app::lifecycle::startup::tasks::plugin_setup::PluginSetupTask;
use crate::core::pipeline::{Pipeline, PipelineBuilder};
use std::path::PathBuf;

pub fn build_start_pipeline(cfg_path: PathBuf) -> Pipeline<StartupContext, anyhow::Error> {
    PipelineBuilder::<StartupContext, anyhow::Error>::new()
        .with_blocking(Box::new(ConfigLoadTask::new(cfg_path)))
        .with_blocking(Box::new(ConfigureObservabilityTask))
        .with_blocking(Box::new(PluginSetupTask))
        .with_blocking(Box::new(BuildEventPipelineTask))
        .build()
        .expect("Startup pipeline should have tasks!")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::{AppConfig, PluginConfigBuilder};
    use crate::app::pipeline::events::{EventContext, EventOutcome};
    use crate::core::pipeline::BlockingTask;
    use serde_json::json;

    #[test]
    fn test_missing_config_fails_first_task() {
        let pipeline = build_start_pipeline("/no/such/dir/paramprops.yaml".into());
        let ctx = StartupContext::default();

        assert_eq!(pipeline.len(), 4);
        assert!(pipeline.run(&ctx).is_err());
        assert!(ctx.config.get().is_none());
        assert!(ctx.plugin.get().is_none());
    }

    #[test]
    fn test_plugin_and_event_pipeline_from_loaded_config() {
        let ctx = StartupContext::default();
        let config = AppConfig {
            plugin: PluginConfigBuilder::default()
                .parameters("ref")
                .set_as_user_properties("true")
                .build()
                .unwrap(),
            ..Default::default()
        };
        ctx.config.set(config).unwrap();

        PluginSetupTask.run(&ctx).unwrap();
        BuildEventPipelineTask.run(&ctx).unwrap();

        let pipeline = ctx.event_pipeline.get().unwrap();
        let event = serde_json::from_value(json!({
            "properties": { "$current_url": "https://x.com/?ref=abc" }
        }))
        .unwrap();

        let event_ctx = EventContext::new(event);
        pipeline.run(&event_ctx).unwrap();

        assert_eq!(event_ctx.outcome.get(), Some(&EventOutcome::Enriched));
        let event = event_ctx.into_event();
        let props = event.properties().unwrap();
        assert_eq!(props.get("$set"), Some(&json!({ "ref": "abc" })));
    }

    #[test]
    fn test_event_pipeline_requires_plugin() {
        let ctx = StartupContext::default();
        assert!(BuildEventPipelineTask.run(&ctx).is_err());
    }
}
