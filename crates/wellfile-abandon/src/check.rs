//! Diagram-versus-abandonment comparison.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;
use wellfile_fsops::WellFileDate;

use crate::error::{AbandonError, AbandonResult};
use crate::source::{WellStatus, WellStatusSource};

const FINDING_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Comparison result for one copied diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbandonmentFinding {
    /// 10-digit API.
    pub api: String,
    /// 2-digit bore.
    pub bore: String,
    /// Diagram file name.
    pub file_name: String,
    /// Local modification time of the diagram.
    pub file_modified: NaiveDateTime,
    /// Reported well status.
    pub well_status: Option<String>,
    /// Latest abandonment date on record.
    pub abandonment_date: Option<NaiveDateTime>,
    /// The well was abandoned after the diagram was last touched.
    pub stale: bool,
}

/// Compare every file against the statuses `source` reports for its API.
///
/// When a well has several status rows the one with the latest abandonment date
/// wins. A finding is stale when that date is later than the file's modification
/// time. Date-only report values count as midnight.
///
/// # Errors
///
/// Returns an error if the source cannot be read.
pub fn check_abandonment<S>(
    files: &[WellFileDate],
    source: &S,
) -> AbandonResult<Vec<AbandonmentFinding>>
where
    S: WellStatusSource + ?Sized,
{
    let apis: BTreeSet<String> = files.iter().map(|file| file.api.clone()).collect();
    let latest = latest_by_api(source.statuses(&apis)?);

    let findings: Vec<_> = files
        .iter()
        .map(|file| {
            let status = latest.get(&file.api);
            let abandonment_date = status.and_then(|row| row.abandonment_date);
            AbandonmentFinding {
                api: file.api.clone(),
                bore: file.bore.clone(),
                file_name: file.file_name.clone(),
                file_modified: file.modified,
                well_status: status.and_then(|row| row.status.clone()),
                abandonment_date,
                stale: abandonment_date.is_some_and(|date| date > file.modified),
            }
        })
        .collect();
    info!(
        files = findings.len(),
        stale = findings.iter().filter(|finding| finding.stale).count(),
        "abandonment check completed"
    );
    Ok(findings)
}

fn latest_by_api(rows: Vec<WellStatus>) -> BTreeMap<String, WellStatus> {
    let mut latest: BTreeMap<String, WellStatus> = BTreeMap::new();
    for row in rows {
        match latest.get(&row.api) {
            Some(current) if current.abandonment_date >= row.abandonment_date => {}
            _ => {
                latest.insert(row.api.clone(), row);
            }
        }
    }
    latest
}

#[derive(Serialize)]
struct FindingRow<'a> {
    #[serde(rename = "File Name")]
    file_name: &'a str,
    #[serde(rename = "API")]
    api: &'a str,
    #[serde(rename = "Wellbore")]
    bore: &'a str,
    #[serde(rename = "FileModified")]
    file_modified: String,
    #[serde(rename = "WellStatus")]
    well_status: &'a str,
    #[serde(rename = "AbandonmentDate")]
    abandonment_date: String,
    #[serde(rename = "Stale")]
    stale: &'static str,
}

impl<'a> From<&'a AbandonmentFinding> for FindingRow<'a> {
    fn from(finding: &'a AbandonmentFinding) -> Self {
        Self {
            file_name: &finding.file_name,
            api: &finding.api,
            bore: &finding.bore,
            file_modified: finding.file_modified.format(FINDING_TIME_FORMAT).to_string(),
            well_status: finding.well_status.as_deref().unwrap_or_default(),
            abandonment_date: finding
                .abandonment_date
                .map(|date| date.format(FINDING_TIME_FORMAT).to_string())
                .unwrap_or_default(),
            stale: if finding.stale { "Yes" } else { "No" },
        }
    }
}

/// Write findings to `path` as CSV.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_findings_csv(path: &Path, findings: &[AbandonmentFinding]) -> AbandonResult<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|source| AbandonError::csv("findings.create", path, source))?;
    for finding in findings {
        writer
            .serialize(FindingRow::from(finding))
            .map_err(|source| AbandonError::csv("findings.write", path, source))?;
    }
    writer.flush().map_err(|source| AbandonError::Io {
        operation: "findings.flush",
        path: path.to_path_buf(),
        source,
    })
}
