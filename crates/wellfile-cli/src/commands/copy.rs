use std::path::{Path, PathBuf};

use anyhow::anyhow;
use chrono::Local;
use uuid::Uuid;
use wellfile_config::CopyPolicy;
use wellfile_events::EventBus;
use wellfile_fsops::{
    FsOpsError, MatchMode, ResolveRequest, ResolverService, RunReport, read_input_list,
};

use crate::cli::CopyTargetArgs;
use crate::context::{AppContext, CliError, CliResult};
use crate::output::{render_progress, render_run_report};

pub(crate) async fn handle_copy(
    ctx: &AppContext,
    mode: MatchMode,
    inline: Vec<String>,
    list_file: Option<PathBuf>,
    target: CopyTargetArgs,
) -> CliResult<()> {
    let lines = collect_lines(mode, inline, list_file.as_deref())?;
    let policy = resolve_policy(&ctx.config.copy, target)?;
    let report = run_resolver(ctx, mode, lines, policy).await?;
    render_run_report(&report, ctx.output)?;
    if let Some(message) = &report.log_error {
        eprintln!("warning: run log was not written: {message}");
    }
    Ok(())
}

fn collect_lines(
    mode: MatchMode,
    inline: Vec<String>,
    list_file: Option<&Path>,
) -> CliResult<Vec<String>> {
    let mut lines = match list_file {
        Some(path) => read_input_list(path).map_err(fsops_error)?,
        None => Vec::new(),
    };
    lines.extend(inline);
    if lines.iter().all(|line| line.trim().is_empty()) {
        let hint = match mode {
            MatchMode::Wells => "provide --id or --ids-file",
            MatchMode::Names => "provide --name or --names-file",
        };
        return Err(CliError::validation(format!("no inputs given; {hint}")));
    }
    Ok(lines)
}

/// Overlay command-line targets on the configured copy policy.
pub(crate) fn resolve_policy(
    configured: &CopyPolicy,
    target: CopyTargetArgs,
) -> CliResult<CopyPolicy> {
    let mut policy = configured.clone();
    if !target.sources.is_empty() {
        policy.sources = target.sources;
    }
    if let Some(destination) = target.destination {
        policy.destination = Some(destination);
    }
    if let Some(kind) = target.run_log {
        policy.run_log = kind.into();
    }
    if policy.sources.is_empty() {
        return Err(CliError::validation(
            "no source folders given; pass --source or set copy.sources in the config",
        ));
    }
    if policy.destination.is_none() {
        return Err(CliError::validation(
            "no destination given; pass --dest or set copy.destination in the config",
        ));
    }
    Ok(policy)
}

async fn run_resolver(
    ctx: &AppContext,
    mode: MatchMode,
    lines: Vec<String>,
    policy: CopyPolicy,
) -> CliResult<RunReport> {
    let events = EventBus::new();
    let mut stream = events.subscribe(None);
    let service = ResolverService::new().with_events(events);
    let run_id = Uuid::new_v4();

    let mut worker = tokio::task::spawn_blocking(move || {
        service.apply(ResolveRequest {
            run_id,
            mode,
            lines: &lines,
            policy: &policy,
            started: Local::now(),
        })
    });

    let joined = loop {
        tokio::select! {
            joined = &mut worker => break joined,
            Some(envelope) = stream.next() => render_progress(&envelope.event, ctx.output),
        }
    };
    while let Some(envelope) = stream.try_next() {
        render_progress(&envelope.event, ctx.output);
    }

    joined
        .map_err(|err| CliError::failure(anyhow!("resolver worker failed: {err}")))?
        .map_err(fsops_error)
}

fn fsops_error(err: FsOpsError) -> CliError {
    match err {
        FsOpsError::InvalidInput { .. } => CliError::validation(err.detail()),
        other => CliError::failure(anyhow!(other.detail())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{OutputFormat, RunLogArg};
    use std::fs;
    use wellfile_config::{RunLogKind, WellfileConfig};
    use wellfile_test_support::fixtures::{temp_dir, write_file, write_lines};

    fn context(output: OutputFormat) -> AppContext {
        AppContext {
            config: WellfileConfig::default(),
            output,
        }
    }

    #[test]
    fn flags_override_configured_policy() -> Result<(), CliError> {
        let configured = CopyPolicy {
            sources: vec![PathBuf::from("/configured")],
            destination: Some(PathBuf::from("/configured-out")),
            run_log: RunLogKind::Csv,
        };
        let policy = resolve_policy(
            &configured,
            CopyTargetArgs {
                sources: vec![PathBuf::from("/flag")],
                destination: None,
                run_log: Some(RunLogArg::Text),
            },
        )?;
        assert_eq!(policy.sources, vec![PathBuf::from("/flag")]);
        assert_eq!(policy.destination, Some(PathBuf::from("/configured-out")));
        assert_eq!(policy.run_log, RunLogKind::Text);
        Ok(())
    }

    #[test]
    fn missing_sources_or_destination_are_validation_errors() {
        let empty = CopyPolicy::default();
        let no_sources = resolve_policy(&empty, CopyTargetArgs::default());
        assert!(matches!(no_sources, Err(CliError::Validation(_))));

        let no_destination = resolve_policy(
            &empty,
            CopyTargetArgs {
                sources: vec![PathBuf::from("/src")],
                ..CopyTargetArgs::default()
            },
        );
        assert!(matches!(no_destination, Err(CliError::Validation(_))));
    }

    #[test]
    fn empty_input_is_a_validation_error() {
        let outcome = collect_lines(MatchMode::Wells, vec!["  ".to_string()], None);
        assert!(matches!(outcome, Err(CliError::Validation(_))));
    }

    #[test]
    fn unreadable_input_list_is_a_failure() -> anyhow::Result<()> {
        let dir = temp_dir("cli-copy")?;
        let missing = dir.path().join("nope.txt");
        let outcome = collect_lines(MatchMode::Wells, Vec::new(), Some(missing.as_path()));
        assert!(matches!(outcome, Err(CliError::Failure(_))));
        Ok(())
    }

    #[tokio::test]
    async fn copy_runs_on_a_worker_and_reports() -> anyhow::Result<()> {
        let source = temp_dir("cli-src")?;
        let destination = temp_dir("cli-dst")?;
        write_file(&source.path().join("deep/0401920171.pdf"), "diagram")?;
        let ids = source.path().join("ids.txt");
        write_lines(&ids, &["040192017100", "12345"])?;

        let target = CopyTargetArgs {
            sources: vec![source.path().to_path_buf()],
            destination: Some(destination.path().to_path_buf()),
            run_log: None,
        };
        let ctx = context(OutputFormat::Json);
        let lines = collect_lines(MatchMode::Wells, Vec::new(), Some(ids.as_path()))
            .map_err(|err| anyhow!(err.display_message()))?;
        let policy = resolve_policy(&ctx.config.copy, target)
            .map_err(|err| anyhow!(err.display_message()))?;
        let report = run_resolver(&ctx, MatchMode::Wells, lines, policy)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;

        assert_eq!(report.summary.copied, 1);
        assert_eq!(report.summary.invalid_input, 1);
        assert_eq!(
            fs::read_to_string(destination.path().join("0401920171.pdf"))?,
            "diagram"
        );
        assert!(report.log_path.is_some());
        Ok(())
    }
}
