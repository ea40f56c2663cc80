use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::Cli;

const DEFAULT_LOG_FILENAME: &str = "unvar.log";

/// Installs the global subscriber. Logs go to stderr so rewritten code on
/// stdout stays clean. The returned guard flushes the file writer on drop.
pub fn init_logging(cli: &Cli) -> Option<WorkerGuard> {
    let filter = build_filter(cli);

    if let Some(ref log_file) = cli.log_file {
        Some(init_file_logging(log_file, filter, cli.log_json))
    } else {
        init_stderr_logging(filter, cli.log_json);
        None
    }
}

fn build_filter(cli: &Cli) -> EnvFilter {
    let level = cli.log_level.as_tracing_level();
    EnvFilter::from_default_env().add_directive(level.into())
}

fn init_stderr_logging(filter: EnvFilter, json: bool) {
    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .init();
    }
}

fn init_file_logging(path: &Path, filter: EnvFilter, json: bool) -> WorkerGuard {
    let parent = path.parent().unwrap_or(Path::new("."));
    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(DEFAULT_LOG_FILENAME);

    let file_appender = tracing_appender::rolling::never(parent, filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(fmt::layer().json().with_writer(non_blocking))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .init();
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse_cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn filter_uses_requested_level() {
        let cli = parse_cli(&["unvar", "init", "--log-level", "debug"]);
        let filter = build_filter(&cli);

        assert!(
            filter.max_level_hint() >= Some(tracing::level_filters::LevelFilter::DEBUG)
        );
    }

    #[test]
    fn default_filter_is_warn() {
        let cli = parse_cli(&["unvar", "init"]);
        let filter = build_filter(&cli);

        assert!(
            filter.max_level_hint() >= Some(tracing::level_filters::LevelFilter::WARN)
        );
    }
}
