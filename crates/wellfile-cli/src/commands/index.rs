use std::path::{Path, PathBuf};

use chrono::Local;
use wellfile_config::IndexPolicy;
use wellfile_indexer::{
    IndexError, WbdIndexer, csv_sibling, index_catalog, index_files, write_csv, write_json,
};

use crate::cli::{CatalogArgs, IndexArgs, WbdIndexArgs};
use crate::context::{AppContext, CliError, CliResult};
use crate::output::{IndexSummary, render_catalog_run, render_index_summary};

pub(crate) fn handle_index(ctx: &AppContext, args: IndexArgs) -> CliResult<()> {
    let index = index_files(&args.roots);
    write_json(&args.out, "file_index", &index.entries).map_err(index_error)?;
    let csv = if args.csv {
        let path = csv_sibling(&args.out);
        write_csv(&path, &index.entries).map_err(index_error)?;
        Some(path)
    } else {
        None
    };
    render_index_summary(
        &IndexSummary {
            kind: "file",
            entries: index.entries.len(),
            output: args.out,
            csv,
            skipped_roots: index.skipped_roots,
        },
        ctx.output,
    )
}

pub(crate) fn handle_wbd_index(ctx: &AppContext, args: WbdIndexArgs) -> CliResult<()> {
    let roots = if args.roots.is_empty() {
        ctx.config.copy.sources.clone()
    } else {
        args.roots
    };
    if roots.is_empty() {
        return Err(CliError::validation(
            "no folders given; pass DIR arguments or set copy.sources in the config",
        ));
    }
    let policy = wbd_policy(&ctx.config.index, args.max_name_len, args.exclude)?;

    let indexer = WbdIndexer::new(&policy).map_err(index_error)?;
    let index = indexer.index(&roots);
    write_json(&args.out, "wbd_index", &index.entries).map_err(index_error)?;
    let csv = csv_sibling(&args.out);
    write_csv(&csv, &index.entries).map_err(index_error)?;

    render_index_summary(
        &IndexSummary {
            kind: "diagram",
            entries: index.entries.len(),
            output: args.out,
            csv: Some(csv),
            skipped_roots: index.skipped_roots,
        },
        ctx.output,
    )
}

fn wbd_policy(
    configured: &IndexPolicy,
    max_name_len: Option<usize>,
    exclude: Vec<String>,
) -> CliResult<IndexPolicy> {
    let mut policy = configured.clone();
    if let Some(max) = max_name_len {
        if max == 0 {
            return Err(CliError::validation("--max-name-len must be positive"));
        }
        policy.max_file_name_len = max;
    }
    if !exclude.is_empty() {
        policy.exclude_dir_markers = exclude;
    }
    Ok(policy)
}

pub(crate) fn handle_catalog(ctx: &AppContext, args: CatalogArgs) -> CliResult<()> {
    let out_dir = args
        .out_dir
        .unwrap_or_else(|| catalog_folder(&args.catalog));
    let run = index_catalog(&args.catalog, &out_dir, Local::now().naive_local())
        .map_err(index_error)?;
    render_catalog_run(&run, ctx.output)
}

fn catalog_folder(catalog: &Path) -> PathBuf {
    match catalog.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn index_error(err: IndexError) -> CliError {
    CliError::failure(err)
}
