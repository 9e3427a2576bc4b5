//! Argument parsing and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use wellfile_config::RunLogKind;
use wellfile_fsops::MatchMode;
use wellfile_telemetry::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, TelemetryError, init_logging,
    log_format_from_config,
};

use crate::commands::abandon::handle_abandon;
use crate::commands::copy::handle_copy;
use crate::commands::index::{handle_catalog, handle_index, handle_wbd_index};
use crate::context::{AppContext, CliError, CliResult};

/// Parses CLI arguments, executes the requested command, and returns the process
/// exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    match execute(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn execute(cli: Cli) -> CliResult<()> {
    let ctx = AppContext::load(cli.config.as_deref(), cli.output)?;
    install_logging(&cli, &ctx)?;
    dispatch(cli.command, &ctx).await
}

fn install_logging(cli: &Cli, ctx: &AppContext) -> CliResult<()> {
    let level = cli
        .log_level
        .as_deref()
        .or(ctx.config.logging.level.as_deref())
        .unwrap_or(DEFAULT_LOG_LEVEL);
    let format = cli
        .log_format
        .map(LogFormat::from)
        .or_else(|| log_format_from_config(ctx.config.logging.format.as_deref()))
        .unwrap_or_else(LogFormat::infer);
    let config = LoggingConfig {
        level,
        format,
        build_id: env!("CARGO_PKG_VERSION"),
    };
    init_logging(&config).map_err(|err| match err {
        TelemetryError::InvalidLevel { value } => {
            CliError::validation(format!("invalid log level '{value}'"))
        }
        other => CliError::failure(other),
    })
}

async fn dispatch(command: Command, ctx: &AppContext) -> CliResult<()> {
    match command {
        Command::Copy(args) => {
            handle_copy(ctx, MatchMode::Wells, args.ids, args.ids_file, args.target).await
        }
        Command::CopyNames(args) => {
            handle_copy(ctx, MatchMode::Names, args.names, args.names_file, args.target).await
        }
        Command::Index(args) => handle_index(ctx, args),
        Command::WbdIndex(args) => handle_wbd_index(ctx, args),
        Command::Catalog(args) => handle_catalog(ctx, args),
        Command::Abandon(args) => handle_abandon(ctx, args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "wellfile",
    version,
    about = "Copy, index and cross-check well-diagram files"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "WELLFILE_CONFIG",
        help = "Path to a JSON configuration document"
    )]
    pub(crate) config: Option<PathBuf>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for command results"
    )]
    pub(crate) output: OutputFormat,
    #[arg(
        long,
        global = true,
        env = "WELLFILE_LOG",
        help = "Log level or filter directive; RUST_LOG takes precedence"
    )]
    pub(crate) log_level: Option<String>,
    #[arg(long, global = true, value_enum, help = "Log line format")]
    pub(crate) log_format: Option<LogFormatArg>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Copy the newest diagram for each 12-digit well identifier.
    Copy(CopyArgs),
    /// Copy the newest file for each exact file name.
    CopyNames(CopyNamesArgs),
    /// Catalog every file under the given folders.
    Index(IndexArgs),
    /// Index well-diagram PDFs by API.
    WbdIndex(WbdIndexArgs),
    /// Index the pending folders listed in a folder catalog.
    Catalog(CatalogArgs),
    /// Flag copied diagrams that predate the well's abandonment.
    Abandon(AbandonArgs),
}

/// Where to search, where to copy, and how to log a copy run.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct CopyTargetArgs {
    #[arg(
        long = "source",
        value_name = "DIR",
        help = "Source folder to search (repeatable; replaces configured sources)"
    )]
    pub(crate) sources: Vec<PathBuf>,
    #[arg(long = "dest", value_name = "DIR", help = "Destination folder")]
    pub(crate) destination: Option<PathBuf>,
    #[arg(long, value_enum, help = "Run log format written to the destination")]
    pub(crate) run_log: Option<RunLogArg>,
}

#[derive(Debug, Args)]
pub(crate) struct CopyArgs {
    #[arg(long = "id", value_name = "UWI", help = "Well identifier (repeatable)")]
    pub(crate) ids: Vec<String>,
    #[arg(long, value_name = "FILE", help = "Text file with one identifier per line")]
    pub(crate) ids_file: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) target: CopyTargetArgs,
}

#[derive(Debug, Args)]
pub(crate) struct CopyNamesArgs {
    #[arg(long = "name", value_name = "FILE_NAME", help = "File name (repeatable)")]
    pub(crate) names: Vec<String>,
    #[arg(long, value_name = "FILE", help = "Text file with one file name per line")]
    pub(crate) names_file: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) target: CopyTargetArgs,
}

#[derive(Debug, Args)]
pub(crate) struct IndexArgs {
    #[arg(required = true, value_name = "DIR", help = "Folders to catalog")]
    pub(crate) roots: Vec<PathBuf>,
    #[arg(long, value_name = "FILE", help = "JSON index to write")]
    pub(crate) out: PathBuf,
    #[arg(long, help = "Also write a CSV next to the JSON index")]
    pub(crate) csv: bool,
}

#[derive(Debug, Args)]
pub(crate) struct WbdIndexArgs {
    #[arg(value_name = "DIR", help = "Folders to index (defaults to configured copy sources)")]
    pub(crate) roots: Vec<PathBuf>,
    #[arg(long, value_name = "FILE", help = "JSON index to write; a CSV is written alongside")]
    pub(crate) out: PathBuf,
    #[arg(long, help = "Longest accepted file name, in characters")]
    pub(crate) max_name_len: Option<usize>,
    #[arg(
        long = "exclude",
        value_name = "MARKER",
        help = "Skip directories whose path contains MARKER (repeatable; replaces configured markers)"
    )]
    pub(crate) exclude: Vec<String>,
}

#[derive(Debug, Args)]
pub(crate) struct CatalogArgs {
    #[arg(long, value_name = "FILE", default_value = "folders.json")]
    pub(crate) catalog: PathBuf,
    #[arg(
        long,
        value_name = "DIR",
        help = "Where per-folder indexes are written (defaults to the catalog's folder)"
    )]
    pub(crate) out_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub(crate) struct AbandonArgs {
    #[arg(long, value_name = "FILE", help = "CSV run log from a copy run")]
    pub(crate) run_log: PathBuf,
    #[arg(long, value_name = "FILE", help = "Exported well-status report (CSV)")]
    pub(crate) status_report: PathBuf,
    #[arg(long, value_name = "FILE", help = "Write findings to this CSV")]
    pub(crate) out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum RunLogArg {
    Csv,
    Text,
}

impl From<RunLogArg> for RunLogKind {
    fn from(value: RunLogArg) -> Self {
        match value {
            RunLogArg::Csv => Self::Csv,
            RunLogArg::Text => Self::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("wellfile").chain(args.iter().copied()))
    }

    #[test]
    fn copy_accepts_repeated_ids_and_sources() -> Result<(), clap::Error> {
        let cli = parse(&[
            "copy",
            "--id",
            "040192017100",
            "--id",
            "040192017105",
            "--source",
            "/a",
            "--source",
            "/b",
            "--dest",
            "/out",
            "--run-log",
            "text",
        ])?;
        let Command::Copy(args) = cli.command else {
            panic!("expected copy command");
        };
        assert_eq!(args.ids, vec!["040192017100", "040192017105"]);
        assert_eq!(args.target.sources, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(args.target.destination, Some(PathBuf::from("/out")));
        assert_eq!(args.target.run_log, Some(RunLogArg::Text));
        Ok(())
    }

    #[test]
    fn global_flags_work_after_the_subcommand() -> Result<(), clap::Error> {
        let cli = parse(&[
            "copy-names",
            "--names-file",
            "names.txt",
            "--output",
            "json",
            "--log-format",
            "json",
            "--log-level",
            "debug",
        ])?;
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.log_format, Some(LogFormatArg::Json));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Command::CopyNames(_)));
        Ok(())
    }

    #[test]
    fn index_requires_roots_and_output() {
        assert!(parse(&["index", "--out", "index.json"]).is_err());
        assert!(parse(&["index", "/srv/a"]).is_err());
        assert!(parse(&["index", "/srv/a", "--out", "index.json", "--csv"]).is_ok());
    }

    #[test]
    fn catalog_defaults_to_folders_json() -> Result<(), clap::Error> {
        let cli = parse(&["catalog"])?;
        let Command::Catalog(args) = cli.command else {
            panic!("expected catalog command");
        };
        assert_eq!(args.catalog, PathBuf::from("folders.json"));
        assert!(args.out_dir.is_none());
        Ok(())
    }

    #[test]
    fn unknown_output_format_is_rejected() {
        assert!(parse(&["--output", "yaml", "catalog"]).is_err());
    }

    #[test]
    fn run_log_arg_maps_to_config_kind() {
        assert_eq!(RunLogKind::from(RunLogArg::Csv), RunLogKind::Csv);
        assert_eq!(RunLogKind::from(RunLogArg::Text), RunLogKind::Text);
    }
}
