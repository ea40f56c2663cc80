use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::commands::Commands;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "unvar",
    author,
    version,
    about = "Rewrites JavaScript var declarations into let and const",
    long_about = "unvar replaces var declarations with const when a variable is never\n\
                  reassigned and with let when it is, leaving var in place wherever\n\
                  narrowing its scope could change what the program does."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, value_enum, global = true, default_value = "warn", help = "Set the log level")]
    pub log_level: LogLevel,

    #[arg(long, global = true, help = "Write logs to the specified file")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Output logs in JSON format")]
    pub log_json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_fix_command() {
        let cli = Cli::try_parse_from(["unvar", "fix", "./src"]).unwrap();
        match cli.command {
            Commands::Fix(args) => {
                assert_eq!(args.path.to_str().unwrap(), "./src");
                assert!(!args.write);
                assert!(args.transforms.is_empty());
            }
            _ => panic!("Expected Fix command"),
        }
    }

    #[test]
    fn cli_parses_fix_with_write_and_transforms() {
        let cli = Cli::try_parse_from([
            "unvar",
            "fix",
            "app.js",
            "--write",
            "--transform",
            "let",
            "--transform",
            "T001",
        ])
        .unwrap();
        match cli.command {
            Commands::Fix(args) => {
                assert!(args.write);
                assert_eq!(args.transforms, vec!["let", "T001"]);
            }
            _ => panic!("Expected Fix command"),
        }
    }

    #[test]
    fn check_accepts_report_flags() {
        let cli = Cli::try_parse_from([
            "unvar",
            "check",
            "lib",
            "-f",
            "json",
            "--show-unchanged",
            "--no-color",
        ])
        .unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.format, crate::commands::check::OutputFormat::Json);
        assert!(args.show_unchanged);
        assert!(args.no_color);
    }

    #[test]
    fn cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["unvar", "check", ".", "--format", "xml"]).is_err());
    }

    #[test]
    fn init_defaults_to_current_directory() {
        let cli = Cli::try_parse_from(["unvar", "init"]).unwrap();
        let Commands::Init(args) = cli.command else {
            panic!("expected init");
        };
        assert_eq!(args.dir, PathBuf::from("."));
        assert!(!args.force);

        let cli = Cli::try_parse_from(["unvar", "init", "web", "-f"]).unwrap();
        let Commands::Init(args) = cli.command else {
            panic!("expected init");
        };
        assert_eq!(args.dir, PathBuf::from("web"));
        assert!(args.force);
    }

    #[test]
    fn cli_parses_default_logging() {
        let cli = Cli::try_parse_from(["unvar", "init"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Warn);
        assert!(cli.log_file.is_none());
        assert!(!cli.log_json);
    }

    #[test]
    fn cli_parses_logging_after_subcommand() {
        let cli = Cli::try_parse_from([
            "unvar",
            "check",
            ".",
            "--log-level",
            "debug",
            "--log-file",
            "/tmp/unvar.log",
            "--log-json",
        ])
        .unwrap();
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/unvar.log")));
        assert!(cli.log_json);
    }

    #[test]
    fn path_is_required() {
        assert!(Cli::try_parse_from(["unvar", "fix"]).is_err());
        assert!(Cli::try_parse_from(["unvar", "check"]).is_err());
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
        assert!(LogLevel::Trace.as_tracing_level() > LogLevel::Error.as_tracing_level());
    }
}
