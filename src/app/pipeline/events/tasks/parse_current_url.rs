use crate::app::pipeline::events::context::EventContext;
use crate::core::enrichment::query::QueryParams;
use crate::core::pipeline::BlockingTask;
use crate::core::settings::Settings;
use anyhow::{Error, anyhow};
use std::sync::Arc;
use tracing::{debug, warn};

/// Task to parse the event's `$current_url` into ['QueryParams'],
/// case folded when the settings ask for it
pub struct ParseCurrentUrlTask {
    settings: Arc<Settings>,
}

impl ParseCurrentUrlTask {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }
}

impl BlockingTask<EventContext, Error> for ParseCurrentUrlTask {
    fn run(&self, context: &EventContext) -> Result<(), Error> {
        let _span = crate::child_span_debug!("parse_current_url_task").entered();

        let query = {
            let event = context.event.read();

            QueryParams::from_event(&event, self.settings.ignore_case).inspect_err(|e| {
                warn!("Event {:?} has an unusable current url: {:#}", event.event(), e);
            })?
        };

        match &query {
            Some(query) => debug!("Parsed {} query parameters from current url", query.len()),
            None => debug!("Event has no current url"),
        }

        context
            .query
            .set(query)
            .map_err(|_| anyhow!("Could not set query params, already set?!"))?;

        Ok(())
    }
}
