use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser, ValueEnum};
use tickbox_app::store::DEFAULT_COLLECTION;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::commands::Command;

/// Environment variable holding a log filter directive; it wins over
/// `-v`/`-q`.
pub const LOG_ENV: &str = "TICKBOX_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(self, terminal: bool) -> bool {
        match self {
            ColorMode::Auto => terminal,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tickbox",
    version,
    about = "Drive the todo page from the terminal",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    /// More log output; repeat for debug and trace.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Less log output; twice silences everything.
    #[arg(
        short = 'q',
        long = "quiet",
        action = ArgAction::Count,
        conflicts_with = "verbose"
    )]
    pub quiet: u8,

    /// Directory holding the collection files.
    #[arg(long = "data", env = "TICKBOX_DATA", value_name = "DIR")]
    pub data: Option<PathBuf>,

    /// Collection to open; stored as `<DIR>/<NAME>.data`.
    #[arg(
        short = 'c',
        long = "collection",
        value_name = "NAME",
        default_value = DEFAULT_COLLECTION
    )]
    pub collection: String,

    #[arg(long = "color", value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Route fragments such as `#/active`, then one command and its
    /// arguments.
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub rest: Vec<String>,
}

pub fn log_level(verbose: u8, quiet: u8) -> LevelFilter {
    match (quiet, verbose) {
        (0, 0) => LevelFilter::WARN,
        (0, 1) => LevelFilter::INFO,
        (0, 2) => LevelFilter::DEBUG,
        (0, _) => LevelFilter::TRACE,
        (1, _) => LevelFilter::ERROR,
        _ => LevelFilter::OFF,
    }
}

/// Logs to stderr, filtered by `$TICKBOX_LOG` when set and by the
/// verbosity counts otherwise.
pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(log_level(verbose, quiet).into())
        .with_env_var(LOG_ENV)
        .from_env()
        .map_err(|e| anyhow!("invalid {LOG_ENV} filter: {e}"))?;

    let stderr_is_terminal = std::io::stderr().is_terminal();
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(stderr_is_terminal)
        .try_init()
    {
        debug!(error = %err, "subscriber already installed");
    }
    Ok(())
}

/// What one run asks for: the fragments to route through, then a single
/// command with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub routes: Vec<String>,
    pub command: Command,
    pub args: Vec<String>,
}

impl Invocation {
    /// Leading `#` tokens are routes; the next token names the command,
    /// `list` when there is none.
    #[tracing::instrument(skip(rest))]
    pub fn parse(rest: Vec<String>) -> anyhow::Result<Self> {
        let mut tokens = rest.into_iter().peekable();
        let mut routes = Vec::new();
        while let Some(route) = tokens.next_if(|tok| tok.starts_with('#')) {
            routes.push(route);
        }

        let command = match tokens.next() {
            Some(token) => Command::resolve(&token)?,
            None => Command::List,
        };
        let args: Vec<String> = tokens.collect();
        if args.iter().any(|arg| arg.starts_with('#')) {
            warn!(%command, "route tokens after the command are passed as arguments");
        }

        debug!(%command, ?routes, ?args, "parsed invocation");
        Ok(Self {
            routes,
            command,
            args,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|tok| tok.to_string()).collect()
    }

    #[test]
    fn routes_precede_the_command() {
        let inv = Invocation::parse(strings(&["#/active", "tog", "2"])).expect("parse");
        assert_eq!(inv.routes, strings(&["#/active"]));
        assert_eq!(inv.command, Command::Toggle);
        assert_eq!(inv.args, strings(&["2"]));
    }

    #[test]
    fn bare_routes_list_the_page() {
        let inv = Invocation::parse(strings(&["#/completed"])).expect("parse");
        assert_eq!(inv.command, Command::List);
        assert!(inv.args.is_empty());

        let inv = Invocation::parse(vec![]).expect("parse");
        assert_eq!(inv.command, Command::List);
        assert!(inv.routes.is_empty());
    }

    #[test]
    fn unknown_and_ambiguous_commands_fail() {
        assert!(Invocation::parse(strings(&["t"])).is_err());
        assert!(Invocation::parse(strings(&["frobnicate"])).is_err());
    }

    #[test]
    fn flags_come_before_the_trailing_args() {
        let cli = GlobalCli::try_parse_from([
            "tickbox",
            "-vv",
            "--collection",
            "work",
            "--color",
            "never",
            "#/active",
            "add",
            "-1",
            "more",
        ])
        .expect("parse");
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.collection, "work");
        assert_eq!(cli.color, ColorMode::Never);
        assert_eq!(cli.rest, strings(&["#/active", "add", "-1", "more"]));
    }

    #[test]
    fn defaults_without_flags() {
        let cli = GlobalCli::try_parse_from(["tickbox"]).expect("parse");
        assert_eq!(cli.collection, DEFAULT_COLLECTION);
        assert_eq!(cli.color, ColorMode::Auto);
        assert!(cli.rest.is_empty());
        assert!(GlobalCli::try_parse_from(["tickbox", "-v", "-q"]).is_err());
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(log_level(0, 0), LevelFilter::WARN);
        assert_eq!(log_level(1, 0), LevelFilter::INFO);
        assert_eq!(log_level(2, 0), LevelFilter::DEBUG);
        assert_eq!(log_level(5, 0), LevelFilter::TRACE);
        assert_eq!(log_level(0, 1), LevelFilter::ERROR);
        assert_eq!(log_level(0, 2), LevelFilter::OFF);
    }

    #[test]
    fn color_auto_follows_the_terminal() {
        assert!(ColorMode::Auto.enabled(true));
        assert!(!ColorMode::Auto.enabled(false));
        assert!(ColorMode::Always.enabled(false));
        assert!(!ColorMode::Never.enabled(true));
    }
}
