use crate::app::pipeline::events::{EventContext, EventOutcome};
use crate::core::models::event::PluginEvent;
use crate::core::pipeline::Pipeline;
use anyhow::{Context, Error};
use std::io::{BufRead, Write};
use tracing::{debug, warn};

/// Counts of what happened to the events of one run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    pub processed: usize,
    pub enriched: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub dropped: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: EventOutcome) {
        self.processed += 1;

        match outcome {
            EventOutcome::Enriched => self.enriched += 1,
            EventOutcome::Unchanged => self.unchanged += 1,
            EventOutcome::Skipped => self.skipped += 1,
            EventOutcome::Dropped => self.dropped += 1,
        }
    }
}

/// Plays the host runtime for newline delimited json events. Each line
/// is one event, run through the event pipeline and written back out as
/// one line. Events which fail are logged and dropped, the run carries on
pub struct EventRunner<'a> {
    pipeline: &'a Pipeline<EventContext, Error>,
}

impl<'a> EventRunner<'a> {
    pub fn new(pipeline: &'a Pipeline<EventContext, Error>) -> Self {
        Self { pipeline }
    }

    fn process_line(&self, line: &str) -> (EventOutcome, Option<PluginEvent>) {
        let event: PluginEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                warn!("Dropping unparseable event: {}", e);
                return (EventOutcome::Dropped, None);
            }
        };

        let context = EventContext::new(event);

        if let Err(e) = self.pipeline.run(&context) {
            warn!("Dropping event which failed enrichment: {:#}", e);
            return (EventOutcome::Dropped, None);
        }

        let outcome = context
            .outcome
            .get()
            .copied()
            .unwrap_or(EventOutcome::Skipped);

        (outcome, Some(context.into_event()))
    }

    /// Only I/O errors on `input` or `output` end the run early
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut output: W) -> Result<RunSummary, Error> {
        let mut summary = RunSummary::default();

        for (line_no, line) in input.lines().enumerate() {
            let line = line.context("failed to read event input")?;
            if line.trim().is_empty() {
                continue;
            }

            let (outcome, event) = self.process_line(&line);
            debug!(line = line_no + 1, outcome = outcome.as_ref(), "Processed event");
            summary.record(outcome);

            if let Some(event) = event {
                serde_json::to_writer(&mut output, &event).context("failed to serialize event")?;
                output.write_all(b"\n").context("failed to write event")?;
            }
        }

        output.flush().context("failed to flush events")?;

        Ok(summary)
    }
}
