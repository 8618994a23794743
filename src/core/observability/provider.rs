use crate::app::config::{FileRotation, LogType, LoggingConfig};
use anyhow::{Context, Result, anyhow};
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

type DynLayer = Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync + 'static>;

/// Keeps the non-blocking log writers alive. Dropping this flushes
/// any buffered lines, so it should live until the process exits
pub struct ObservabilityGuard {
    _guards: Vec<WorkerGuard>,
}

impl std::fmt::Debug for ObservabilityGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservabilityGuard")
            .field("writers", &self._guards.len())
            .finish()
    }
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let crate_name = env!("CARGO_PKG_NAME");

    Ok(EnvFilter::from_default_env()
        .add_directive("error".parse()?)
        .add_directive(format!("{}={}", crate_name, config.level).parse()?))
}

fn fmt_layer(writer: NonBlocking, json: bool, color: bool, spans: bool) -> DynLayer {
    let span_events = if spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    if json {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_span_events(span_events)
            .boxed()
    } else {
        fmt::layer()
            .compact()
            .with_ansi(color)
            .with_writer(writer)
            .with_span_events(span_events)
            .boxed()
    }
}

/// Installs the global tracing subscriber with one layer per configured
/// sink. `log` records are bridged into the same subscriber
pub fn init(config: &LoggingConfig) -> Result<ObservabilityGuard> {
    config.validate()?;

    let filter = build_filter(config)?;

    let mut layers: Vec<DynLayer> = Vec::new();
    let mut guards = Vec::with_capacity(config.sinks.len());

    for sink in &config.sinks {
        match &sink.dest {
            LogType::Stderr { color, json, spans } => {
                let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
                guards.push(guard);
                layers.push(fmt_layer(writer, *json, *color, *spans));
            }
            LogType::File {
                path,
                json,
                rotation,
                max_files,
                spans,
            } => {
                let (writer, guard) = create_file_writer(path, rotation, *max_files)?;
                guards.push(guard);
                layers.push(fmt_layer(writer, *json, false, *spans));
            }
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("failed to initialize tracing subscriber")?;

    Ok(ObservabilityGuard { _guards: guards })
}

fn create_file_writer(
    path: &Path,
    rotation: &FileRotation,
    max_files: usize,
) -> Result<(NonBlocking, WorkerGuard)> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("Invalid file name in path: {}", path.display()))?;

    let directory = path
        .parent()
        .ok_or_else(|| anyhow!("Invalid directory in path: {}", path.display()))?;

    if !directory.as_os_str().is_empty() {
        std::fs::create_dir_all(directory).with_context(|| {
            format!("failed to create log directory {}", directory.display())
        })?;
    }

    cleanup_old_files(directory, file_name, max_files)?;

    let file_appender = match rotation {
        FileRotation::Daily => tracing_appender::rolling::daily(directory, file_name),
        FileRotation::Hourly => tracing_appender::rolling::hourly(directory, file_name),
        FileRotation::Never => tracing_appender::rolling::never(directory, file_name),
    };

    Ok(tracing_appender::non_blocking(file_appender))
}

/// Removes the oldest rotated files sharing the log file prefix until at
/// most `max_files` remain. Zero keeps everything
fn cleanup_old_files(directory: &Path, prefix: &str, max_files: usize) -> Result<()> {
    if max_files == 0 {
        return Ok(());
    }

    let directory = if directory.as_os_str().is_empty() {
        Path::new(".")
    } else {
        directory
    };

    let mut files: Vec<_> = std::fs::read_dir(directory)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(prefix))
        })
        .filter_map(|entry| {
            entry
                .metadata()
                .ok()
                .and_then(|meta| meta.modified().ok().map(|time| (entry.path(), time)))
        })
        .collect();

    if files.len() <= max_files {
        return Ok(());
    }

    files.sort_by(|a, b| b.1.cmp(&a.1));

    for (path, _) in files.iter().skip(max_files) {
        let _ = std::fs::remove_file(path);
    }

    Ok(())
}
