use crate::app::pipeline::events::context::{EventContext, EventOutcome};
use crate::core::enrichment::injector::inject;
use crate::core::pipeline::BlockingTask;
use crate::core::settings::Settings;
use anyhow::{Error, anyhow};
use std::sync::Arc;
use tracing::{debug, trace};

/// Writes matched query parameters into the event properties
/// and user property maps, then records the ['EventOutcome']
pub struct InjectParamsTask {
    settings: Arc<Settings>,
}

impl InjectParamsTask {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }
}

impl BlockingTask<EventContext, Error> for InjectParamsTask {
    fn run(&self, context: &EventContext) -> Result<(), Error> {
        let span = crate::child_span_debug!("inject_params_task", written = tracing::field::Empty);
        let _enter = span.enter();

        let query = match context.query.get() {
            Some(Some(query)) => query,
            Some(None) => {
                trace!("No current url, skipping injection");
                return set_outcome(context, EventOutcome::Skipped);
            }
            None => return Err(anyhow!("Query params not parsed before injection!")),
        };

        let written = {
            let mut event = context.event.write();
            inject(&self.settings, query, &mut event)?
        };

        span.record("written", written);
        debug!("Injected {} query parameters", written);

        let outcome = if written > 0 {
            EventOutcome::Enriched
        } else {
            EventOutcome::Unchanged
        };

        set_outcome(context, outcome)
    }
}

fn set_outcome(context: &EventContext, outcome: EventOutcome) -> Result<(), Error> {
    context
        .outcome
        .set(outcome)
        .map_err(|_| anyhow!("Event outcome already set!"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::enrichment::query::QueryParams;
    use crate::core::models::event::PluginEvent;
    use crate::core::settings::SettingsBuilder;
    use serde_json::json;

    fn settings() -> Arc<Settings> {
        Arc::new(
            SettingsBuilder::default()
                .set_as_user_properties(true)
                .parameters(["ref".to_string()].into_iter().collect::<std::collections::BTreeSet<_>>())
                .build()
                .unwrap(),
        )
    }

    fn context_with(url: &str) -> EventContext {
        let event: PluginEvent =
            serde_json::from_value(json!({ "properties": { "$current_url": url } })).unwrap();
        let ctx = EventContext::new(event);
        ctx.query.set(Some(QueryParams::parse(url).unwrap())).unwrap();
        ctx
    }

    #[test]
    fn test_enriched() {
        let ctx = context_with("https://x.com/?ref=abc");
        InjectParamsTask::new(settings()).run(&ctx).unwrap();

        assert_eq!(ctx.outcome.get(), Some(&EventOutcome::Enriched));

        let event = ctx.into_event();
        let props = event.properties().unwrap();
        assert_eq!(props.get("ref"), Some(&json!("abc")));
        assert_eq!(props.get("$set"), Some(&json!({ "ref": "abc" })));
    }

    #[test]
    fn test_unchanged() {
        let ctx = context_with("https://x.com/?other=abc");
        InjectParamsTask::new(settings()).run(&ctx).unwrap();

        assert_eq!(ctx.outcome.get(), Some(&EventOutcome::Unchanged));
    }

    #[test]
    fn test_skipped_without_url() {
        let ctx = EventContext::new(PluginEvent::default());
        ctx.query.set(None).unwrap();

        InjectParamsTask::new(settings()).run(&ctx).unwrap();
        assert_eq!(ctx.outcome.get(), Some(&EventOutcome::Skipped));
    }

    #[test]
    fn test_requires_parsed_query() {
        let ctx = EventContext::new(PluginEvent::default());
        assert!(InjectParamsTask::new(settings()).run(&ctx).is_err());
    }
}
