use mimalloc::MiMalloc;
use paramprops::app::lifecycle::context::StartupContext;
use paramprops::app::lifecycle::startup::build_start_pipeline;
use paramprops::app::runner::EventRunner;
use std::io::{BufWriter, stdin, stdout};
use std::path::PathBuf;
use tracing::info;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() {
    let cfg_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| "paramprops.yaml".into());

    let startup_pipeline = build_start_pipeline(cfg_path);
    let startup_ctx = StartupContext::default();

    match startup_pipeline.run(&startup_ctx) {
        Ok(_) => info!("Startup successful"),
        Err(e) => panic!("Startup failed: {:?}", e),
    }

    let event_pipeline = match startup_ctx.event_pipeline.get() {
        Some(event_pipeline) => event_pipeline,
        None => panic!("Startup finished without an event pipeline"),
    };

    let runner = EventRunner::new(event_pipeline);

    match runner.run(stdin().lock(), BufWriter::new(stdout().lock())) {
        Ok(summary) => info!(
            processed = summary.processed,
            enriched = summary.enriched,
            unchanged = summary.unchanged,
            skipped = summary.skipped,
            dropped = summary.dropped,
            "Event input exhausted, shutting down"
        ),
        Err(e) => panic!("Event runner failed: {:?}", e),
    }
}
