use anyhow::anyhow;
use wellfile_abandon::{AbandonError, CsvWellStatusSource, check_abandonment, write_findings_csv};
use wellfile_fsops::read_copied_dates;

use crate::cli::AbandonArgs;
use crate::context::{AppContext, CliError, CliResult};
use crate::output::render_findings;

pub(crate) fn handle_abandon(ctx: &AppContext, args: AbandonArgs) -> CliResult<()> {
    let files = read_copied_dates(&args.run_log)
        .map_err(|err| CliError::failure(anyhow!(err.detail())))?;
    let source = CsvWellStatusSource::new(&args.status_report);
    let findings = check_abandonment(&files, &source).map_err(abandon_error)?;
    if let Some(out) = &args.out {
        write_findings_csv(out, &findings).map_err(abandon_error)?;
    }
    render_findings(&findings, ctx.output)
}

fn abandon_error(err: AbandonError) -> CliError {
    match err {
        AbandonError::MissingColumn { column, path } => CliError::validation(format!(
            "status report {} has no {column} column",
            path.display()
        )),
        other => CliError::failure(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use std::fs;
    use wellfile_config::WellfileConfig;
    use wellfile_test_support::fixtures::{temp_dir, write_file};

    const RUN_LOG: &str = "\
Identifier,API,Bore,Status,CopiedFilePath,LastModified,TargetFilePath,AllFoundPaths,ErrorMessage
040192017100,0401920171,00,Copied,/srv/a/0401920171.pdf,2023-01-15 08:00:00,/out/0401920171.pdf,/srv/a/0401920171.pdf,
040192017205,0401920172,05,Copied,/srv/a/0401920172_05.pdf,2024-06-01 08:00:00,/out/0401920172_05.pdf,/srv/a/0401920172_05.pdf,
040192017300,0401920173,00,NotFound,,,,,
";

    fn context() -> AppContext {
        AppContext {
            config: WellfileConfig::default(),
            output: OutputFormat::Json,
        }
    }

    #[test]
    fn stale_diagrams_are_written_to_findings() -> anyhow::Result<()> {
        let dir = temp_dir("cli-abandon")?;
        let run_log = dir.path().join("run.csv");
        let report = dir.path().join("status.csv");
        let out = dir.path().join("findings.csv");
        write_file(&run_log, RUN_LOG)?;
        write_file(
            &report,
            "API,WellStatus,AbandonmentDate\n04-019-20171,PA,2023-03-01\n0401920172,PA,2024-01-01\n",
        )?;

        handle_abandon(
            &context(),
            AbandonArgs {
                run_log,
                status_report: report,
                out: Some(out.clone()),
            },
        )
        .map_err(|err| anyhow::anyhow!(err.display_message()))?;

        let written = fs::read_to_string(&out)?;
        let rows: Vec<&str> = written.lines().skip(1).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("0401920171.pdf,0401920171,00,") && rows[0].ends_with(",Yes"));
        assert!(rows[1].ends_with(",No"));
        Ok(())
    }

    #[test]
    fn missing_api_column_is_a_validation_error() -> anyhow::Result<()> {
        let dir = temp_dir("cli-abandon")?;
        let run_log = dir.path().join("run.csv");
        let report = dir.path().join("status.csv");
        write_file(&run_log, RUN_LOG)?;
        write_file(&report, "Name,WellStatus\nSomething,PA\n")?;

        let outcome = handle_abandon(
            &context(),
            AbandonArgs {
                run_log,
                status_report: report,
                out: None,
            },
        );
        assert!(matches!(outcome, Err(CliError::Validation(message)) if message.contains("API")));
        Ok(())
    }

    #[test]
    fn unreadable_run_log_is_a_failure() -> anyhow::Result<()> {
        let dir = temp_dir("cli-abandon")?;
        let outcome = handle_abandon(
            &context(),
            AbandonArgs {
                run_log: dir.path().join("missing.csv"),
                status_report: dir.path().join("status.csv"),
                out: None,
            },
        );
        assert!(matches!(outcome, Err(CliError::Failure(_))));
        Ok(())
    }
}
