//! Log setup for the binary. Logs go to stderr; stdout carries the statement.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const CRATE_TARGET: &str = "statement_view";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogStyle {
    #[default]
    Compact,
    Json,
}

impl LogStyle {
    pub fn from_flag(json: bool) -> Self {
        if json {
            LogStyle::Json
        } else {
            LogStyle::Compact
        }
    }
}

/// Filter used when `RUST_LOG` is unset. Verbose runs show this crate's
/// debug events; dependencies stay at info.
pub fn default_directive(verbose: bool) -> String {
    if verbose {
        format!("{}=debug,info", CRATE_TARGET)
    } else {
        format!("{}=info,warn", CRATE_TARGET)
    }
}

pub fn init_logger(style: LogStyle, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let output = match style {
        LogStyle::Compact => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(verbose)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .boxed(),
        LogStyle::Json => fmt::layer()
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(false)
            .flatten_event(true)
            .boxed(),
    };

    tracing_subscriber::registry().with(output).with(filter).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_scopes_debug_to_crate() {
        assert_eq!(default_directive(true), "statement_view=debug,info");
        assert_eq!(default_directive(false), "statement_view=info,warn");
        assert!(EnvFilter::try_new(default_directive(true)).is_ok());
    }

    #[test]
    fn test_style_from_flag() {
        assert_eq!(LogStyle::from_flag(true), LogStyle::Json);
        assert_eq!(LogStyle::from_flag(false), LogStyle::Compact);
        assert_eq!(LogStyle::default(), LogStyle::Compact);
    }
}
