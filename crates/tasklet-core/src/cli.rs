use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Args, Parser, Subcommand};
use tasklet_shared::task::{DEFAULT_CATEGORY, DEFAULT_PRIORITY};
use tasklet_shared::{StatusFilter, TaskDraft, ThemeMode};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct PreprocessedArgs {
    pub cleaned_args: Vec<OsString>,
    pub rc_overrides: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tasklet",
    version,
    about = "Tasklet: a small task list manager",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "taskletrc")]
    pub taskletrc: Option<PathBuf>,

    #[arg(long = "data")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Add a task; blank text is ignored.
    Add(AddArgs),
    /// List tasks.
    List(ListArgs),
    /// Flip a task between complete and not complete.
    Toggle { id: u64 },
    /// Delete a task.
    Delete { id: u64 },
    /// Print the visible tasks as a JSON array.
    Export(ListArgs),
    /// Replace the collection with a JSON array read from a file.
    Import { path: PathBuf },
    /// Print the effective configuration.
    Config,
    /// Read commands from stdin, one per line.
    Shell,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,

    #[arg(long, default_value = DEFAULT_CATEGORY)]
    pub category: String,

    #[arg(long, default_value = DEFAULT_PRIORITY)]
    pub priority: String,

    #[arg(long = "due-date", default_value = "")]
    pub due_date: String,

    #[arg(long = "due-time", default_value = "")]
    pub due_time: String,
}

impl AddArgs {
    pub fn into_draft(self) -> TaskDraft {
        TaskDraft::new(self.text.join(" "))
            .category(self.category)
            .priority(self.priority)
            .due(self.due_date, self.due_time)
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[arg(long, short = 'f', default_value = "all")]
    pub filter: StatusFilter,

    #[arg(long, short = 's', default_value = "")]
    pub search: String,

    #[arg(long, default_value = "light")]
    pub theme: ThemeMode,
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

/// Pulls `rc.key=value` / `rc.key:value` positional overrides out of the
/// argument list before clap sees it.
#[tracing::instrument(skip_all)]
pub fn preprocess_args(raw: &[OsString]) -> anyhow::Result<PreprocessedArgs> {
    let mut cleaned = Vec::with_capacity(raw.len());
    let mut overrides: Vec<(String, String)> = Vec::new();

    let mut iter = raw.iter().cloned();
    if let Some(bin) = iter.next() {
        cleaned.push(bin);
    }

    for arg in iter {
        let s = arg.to_string_lossy();
        if let Some(rest) = s.strip_prefix("rc.") {
            let parsed = if let Some((k, v)) = rest.split_once('=') {
                Some((format!("rc.{k}"), v.to_string()))
            } else if let Some((k, v)) = rest.split_once(':') {
                Some((format!("rc.{k}"), v.to_string()))
            } else {
                None
            };

            if let Some((k, v)) = parsed {
                debug!(key = %k, value = %v, "captured positional rc override");
                overrides.push((k, v));
                continue;
            }
        }

        cleaned.push(arg);
    }

    Ok(PreprocessedArgs {
        cleaned_args: cleaned,
        rc_overrides: overrides,
    })
}

/// Resolves the command to run, falling back to `default.command`.
#[tracing::instrument(skip(cfg, command))]
pub fn resolve_command(cfg: &Config, command: Option<CliCommand>) -> anyhow::Result<CliCommand> {
    if let Some(command) = command {
        return Ok(command);
    }

    let name = cfg.default_command();
    debug!(command = name, "no explicit command, using default");
    match name {
        "list" => Ok(CliCommand::List(ListArgs::default())),
        "shell" => Ok(CliCommand::Shell),
        "export" => Ok(CliCommand::Export(ListArgs::default())),
        "config" => Ok(CliCommand::Config),
        other => Err(anyhow!("unsupported default.command: {other}")),
    }
}
