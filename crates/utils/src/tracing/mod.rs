use buildenv_core::BUILDENV_LOG_VAR;
use std::io::IsTerminal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "warn";
pub const VERBOSE_FILTER: &str = "debug";

/// Filter directives for this run.
///
/// `BUILDENV_LOG` wins when set, so `-v` can be narrowed per target.
#[must_use]
pub fn filter_directives(env_value: Option<&str>, verbose: bool) -> String {
    match env_value {
        Some(value) if !value.trim().is_empty() => value.to_string(),
        _ if verbose => VERBOSE_FILTER.to_string(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Initialize the tracing system.
///
/// Everything goes to stderr; stdout is reserved for exports.
pub fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let env_value = std::env::var(BUILDENV_LOG_VAR).ok();
    let filter = EnvFilter::try_new(filter_directives(env_value.as_deref(), verbose))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .compact()
        .with_target(verbose)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
