//! Tracing configuration module for structured logging
//!
//! Applications configure subscribers; the library only emits trace events.

#[cfg(feature = "cli")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Log line layout, selected with `--log-format`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum TracingFormat {
    /// Colored, one line per event
    #[default]
    Console,
    /// Plain text without ANSI colors, for log files and CI
    Compact,
    /// One JSON object per event, including the active spans
    Json,
}

/// Subscriber settings for one process
#[derive(Debug, Default)]
pub struct TracingConfig {
    /// Number of `-v` flags
    pub verbosity: u8,
    pub format: TracingFormat,
    /// `RUST_LOG`-style directive; replaces the verbosity level when set
    pub env_filter: Option<String>,
    /// Logged once at startup to correlate a run's lines
    pub session_id: Option<String>,
}

impl TracingConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_env_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn with_session_id<S: Into<String>>(mut self, session_id: S) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Level directive for the current verbosity
    #[must_use]
    pub fn verbosity_to_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "info",  // progress and summary
            1 => "debug", // requests and per-record detail
            _ => "trace", // every image write
        }
    }

    /// Directive actually installed: the explicit filter, else the verbosity level
    #[must_use]
    pub fn filter_directive(&self) -> &str {
        self.env_filter
            .as_deref()
            .unwrap_or_else(|| self.verbosity_to_filter())
    }

    /// Install the global subscriber
    ///
    /// # Errors
    /// - Invalid filter directive
    /// - A global subscriber is already installed
    #[cfg(feature = "cli")]
    pub fn init(self) -> anyhow::Result<()> {
        use tracing_subscriber::fmt;

        let filter = EnvFilter::try_new(self.filter_directive())?;
        let registry = Registry::default().with(filter);
        let plain = || {
            fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .compact()
        };

        match self.format {
            TracingFormat::Console => registry.with(plain().with_ansi(true)).try_init()?,
            TracingFormat::Compact => registry
                .with(plain().with_ansi(false).without_time())
                .try_init()?,
            TracingFormat::Json => registry
                .with(fmt::layer().json().with_current_span(true).with_span_list(true))
                .try_init()?,
        }

        if let Some(session_id) = &self.session_id {
            tracing::debug!(session_id = %session_id, "Acquisition session started");
        }
        Ok(())
    }
}

/// Span creation helpers for common operations
pub mod spans {
    use tracing::{Level, Span};

    /// Span covering one whole acquisition run
    #[must_use]
    pub fn acquisition(source: &str, dataset_name: &str) -> Span {
        tracing::span!(
            Level::INFO,
            "acquisition",
            source = %source,
            dataset_name = %dataset_name
        )
    }

    /// Span for one `/rows` page request
    #[must_use]
    pub fn page_fetch(offset: u64, length: u32) -> Span {
        tracing::span!(Level::DEBUG, "page_fetch", offset = offset, length = length)
    }

    /// Span for materializing one record
    #[must_use]
    pub fn record(img_id: &str) -> Span {
        tracing::span!(Level::DEBUG, "record", img_id = %img_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(TracingConfig::new().with_verbosity(0).verbosity_to_filter(), "info");
        assert_eq!(TracingConfig::new().with_verbosity(1).verbosity_to_filter(), "debug");
        assert_eq!(TracingConfig::new().with_verbosity(2).verbosity_to_filter(), "trace");
        assert_eq!(TracingConfig::new().with_verbosity(10).verbosity_to_filter(), "trace");
    }

    #[test]
    fn test_config_builder() {
        let config = TracingConfig::new()
            .with_verbosity(2)
            .with_format(TracingFormat::Compact)
            .with_env_filter("vqa_fetch=debug")
            .with_session_id("test-session");

        assert_eq!(config.verbosity, 2);
        assert_eq!(config.format, TracingFormat::Compact);
        assert_eq!(config.session_id.as_deref(), Some("test-session"));
    }

    #[test]
    fn test_filter_directive_prefers_env_filter() {
        let config = TracingConfig::new().with_verbosity(1);
        assert_eq!(config.filter_directive(), "debug");

        let config = config.with_env_filter("vqa_fetch=trace,reqwest=warn");
        assert_eq!(config.filter_directive(), "vqa_fetch=trace,reqwest=warn");
    }

    #[test]
    fn test_default_config() {
        let config = TracingConfig::default();
        assert_eq!(config.format, TracingFormat::Console);
        assert_eq!(config.filter_directive(), "info");
        assert!(config.session_id.is_none());
    }

    #[test]
    fn test_spans_construct_without_subscriber() {
        let _ = spans::acquisition("org/ds:raw", "ds");
        let _ = spans::page_fetch(0, 100);
        let _ = spans::record("a1");
    }
}
