//! Console logging
//!
//! Log lines go to stderr so command output on stdout stays machine readable.
//! `RUST_LOG` takes precedence over `--log-level` and the level from the
//! configuration file.

use crate::config::LogLevel;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Changes the console level after logging is up
///
/// Logging is installed before the configuration file is read, so events
/// from loading it are not lost; the file's own level is applied afterwards.
pub struct LoggingHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LoggingHandle {
    /// Switch to `level` unless `RUST_LOG` chose the filter
    pub fn set_level(&self, level: LogLevel) -> Result<(), reload::Error> {
        if self.from_env {
            return Ok(());
        }
        self.filter.reload(EnvFilter::new(filter_directives(level)))
    }
}

/// Initialize console logging at `level`
pub fn init_logging(level: LogLevel) -> Result<LoggingHandle, TryInitError> {
    let (filter, from_env) = level_filter(level);
    let (filter, handle) = reload::Layer::new(filter);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init()?;

    Ok(LoggingHandle {
        filter: handle,
        from_env,
    })
}

/// `RUST_LOG` when set and valid, otherwise directives for `level`
fn level_filter(level: LogLevel) -> (EnvFilter, bool) {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(filter_directives(level)), false),
    }
}

fn filter_directives(level: LogLevel) -> String {
    let level = level.as_filter();
    format!("{},dump_targets={}", level, level)
}
