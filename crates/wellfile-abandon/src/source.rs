//! Well-status sources.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::dates::parse_report_date;
use crate::error::{AbandonError, AbandonResult};

const API_DIGITS: usize = 10;
const UWI_DIGITS: usize = 12;

/// One status row for a well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WellStatus {
    /// 10-digit API.
    pub api: String,
    /// Reported status text.
    pub status: Option<String>,
    /// Abandonment effective date, when the report has a readable one.
    pub abandonment_date: Option<NaiveDateTime>,
}

/// Supplies well statuses for a set of APIs.
pub trait WellStatusSource {
    /// Status rows for `apis`; a well may have several rows or none.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying report cannot be read.
    fn statuses(&self, apis: &BTreeSet<String>) -> AbandonResult<Vec<WellStatus>>;
}

/// Reads statuses from an exported CSV report.
#[derive(Debug, Clone)]
pub struct CsvWellStatusSource {
    path: PathBuf,
}

impl CsvWellStatusSource {
    /// Source backed by the report at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Report location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WellStatusSource for CsvWellStatusSource {
    fn statuses(&self, apis: &BTreeSet<String>) -> AbandonResult<Vec<WellStatus>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|source| AbandonError::csv("report.open", &self.path, source))?;
        let headers = reader
            .headers()
            .map_err(|source| AbandonError::csv("report.headers", &self.path, source))?
            .clone();
        let columns = ColumnMap::from_headers(&headers, &self.path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record =
                record.map_err(|source| AbandonError::csv("report.read", &self.path, source))?;
            let field = |index: Option<usize>| {
                index
                    .and_then(|i| record.get(i))
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
            };
            let Some(api) = field(Some(columns.api)).and_then(normalize_api) else {
                debug!(row = ?record.position().map(csv::Position::line), "skipping row without a usable API");
                continue;
            };
            if !apis.contains(&api) {
                continue;
            }
            rows.push(WellStatus {
                api,
                status: field(columns.status).map(str::to_string),
                abandonment_date: field(columns.abandonment_date).and_then(parse_report_date),
            });
        }
        Ok(rows)
    }
}

/// Column positions resolved from report headers.
#[derive(Debug)]
struct ColumnMap {
    api: usize,
    status: Option<usize>,
    abandonment_date: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord, path: &Path) -> AbandonResult<Self> {
        let mut api = None;
        let mut status = None;
        let mut abandonment_date = None;
        for (index, header) in headers.iter().enumerate() {
            match header.trim().to_lowercase().as_str() {
                "api" | "well_api" | "well_api_nbr" | "api_number" | "uwi" => {
                    api.get_or_insert(index);
                }
                "wellstatus" | "well_status" | "status" | "well status" => {
                    status.get_or_insert(index);
                }
                "abandonmentdate"
                | "abandonment_date"
                | "abandonment date"
                | "abandonment_effective_date"
                | "cmpl_state_eftv_dttm" => {
                    abandonment_date.get_or_insert(index);
                }
                _ => {}
            }
        }
        let api = api.ok_or_else(|| AbandonError::MissingColumn {
            column: "API",
            path: path.to_path_buf(),
        })?;
        Ok(Self {
            api,
            status,
            abandonment_date,
        })
    }
}

/// Reduce a 10- or 12-digit well number to its 10-digit API.
fn normalize_api(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| !matches!(c, '-' | ' ')).collect();
    if !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    match digits.len() {
        API_DIGITS => Some(digits),
        UWI_DIGITS => Some(digits[..API_DIGITS].to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chrono::NaiveDate;
    use wellfile_test_support::fixtures::{temp_dir, write_file};

    fn apis(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn header_aliases_and_api_lengths_are_accepted() -> Result<()> {
        let dir = temp_dir("status")?;
        let path = dir.path().join("status.csv");
        write_file(
            &path,
            "WELL_API_NBR,Well Status,Abandonment_Effective_Date,Extra\n\
             040192017105,Abandoned,03/04/2021,x\n\
             0401920172,Active,,y\n\
             9999999999,Abandoned,2020-01-01,z\n\
             bad,Abandoned,2020-01-01,z\n",
        )?;
        let source = CsvWellStatusSource::new(&path);

        let rows = source.statuses(&apis(&["0401920171", "0401920172"]))?;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].api, "0401920171");
        assert_eq!(rows[0].status.as_deref(), Some("Abandoned"));
        assert_eq!(
            rows[0].abandonment_date.map(|date| date.date()),
            NaiveDate::from_ymd_opt(2021, 3, 4)
        );
        assert_eq!(rows[1].api, "0401920172");
        assert!(rows[1].abandonment_date.is_none());
        Ok(())
    }

    #[test]
    fn missing_api_column_is_an_error() -> Result<()> {
        let dir = temp_dir("status")?;
        let path = dir.path().join("status.csv");
        write_file(&path, "Name,Status\nwell,Active\n")?;
        let outcome = CsvWellStatusSource::new(&path).statuses(&apis(&["0401920171"]));
        assert!(matches!(
            outcome,
            Err(AbandonError::MissingColumn { column: "API", .. })
        ));
        Ok(())
    }

    #[test]
    fn api_normalisation() {
        assert_eq!(normalize_api("04-019-20171").as_deref(), Some("0401920171"));
        assert_eq!(normalize_api("040192017100").as_deref(), Some("0401920171"));
        assert!(normalize_api("04019").is_none());
        assert!(normalize_api("04019201710x").is_none());
    }
}
