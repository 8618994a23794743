/// Creates a root span for an event at the given sample rate, or a child
/// span if a span is already active so traces stay complete.
///
/// Sampling happens before the span is built, so unsampled events pay
/// nothing for span bookkeeping.
///
/// # Arguments
/// * `sample_percent` - The fraction (0.0 to 1.0) of root spans to keep
/// * `span_name` - The name of the span if created (must be a literal)
///
/// # Example
/// ```
/// let span = paramprops::sample_or_attach_root_span!(0.01, "event_pipeline");
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! sample_or_attach_root_span {
    ($sample_percent:expr, $span_name:literal) => {{
        let current = ::tracing::Span::current();

        if !current.is_disabled() || ::rand::random::<f32>() < $sample_percent {
            ::tracing::info_span!($span_name)
        } else {
            ::tracing::Span::none()
        }
    }};
}

/// Creates a DEBUG-level child span only if the parent span is active (sampled),
/// otherwise `Span::none()`. The span is returned un-entered.
///
/// ```
/// let span = paramprops::child_span_debug!("inject_params_task", matched = 2);
/// let _enter = span.entered();
/// ```
#[macro_export]
macro_rules! child_span_debug {
    ($span_name:literal) => {{
        if !::tracing::Span::current().is_disabled() {
            ::tracing::debug_span!($span_name)
        } else {
            ::tracing::Span::none()
        }
    }};
    ($span_name:literal, $($fields:tt)*) => {{
        if !::tracing::Span::current().is_disabled() {
            ::tracing::debug_span!($span_name, $($fields)*)
        } else {
            ::tracing::Span::none()
        }
    }};
}
