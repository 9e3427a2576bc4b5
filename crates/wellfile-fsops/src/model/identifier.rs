//! Well identifiers and the file names they resolve to.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// Length of a full well identifier (API + bore).
pub const IDENTIFIER_LEN: usize = 12;
/// Length of the API portion of an identifier.
pub const API_LEN: usize = 10;
/// Extension carried by well-diagram files.
pub const DIAGRAM_EXTENSION: &str = "pdf";
/// Bore suffix whose files may also be stored under the bare API.
pub const PRIMARY_BORE: &str = "00";

/// A validated 12-digit well identifier: a 10-digit API followed by a 2-digit bore.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Parse a trimmed input line; `None` unless it is exactly 12 ASCII digits.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (trimmed.len() == IDENTIFIER_LEN && trimmed.bytes().all(|byte| byte.is_ascii_digit()))
            .then(|| Self(trimmed.to_string()))
    }

    /// Full identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 10-digit API.
    #[must_use]
    pub fn api(&self) -> &str {
        &self.0[..API_LEN]
    }

    /// The 2-digit bore suffix.
    #[must_use]
    pub fn bore(&self) -> &str {
        &self.0[API_LEN..]
    }

    /// File names accepted for this identifier.
    ///
    /// Bore `00` accepts both `{API}.pdf` and `{API}_00.pdf`; any other bore accepts
    /// only `{API}_{Bore}.pdf`.
    #[must_use]
    pub fn file_names(&self) -> Vec<String> {
        let api = self.api();
        let bore = self.bore();
        let suffixed = format!("{api}_{bore}.{DIAGRAM_EXTENSION}");
        if bore == PRIMARY_BORE {
            vec![format!("{api}.{DIAGRAM_EXTENSION}"), suffixed]
        } else {
            vec![suffixed]
        }
    }
}

impl Display for Identifier {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// How input lines are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Lines are 12-digit well identifiers resolved to diagram file names.
    Wells,
    /// Lines are exact file names.
    Names,
}

impl MatchMode {
    /// Stable label used in logs and events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wells => "wells",
            Self::Names => "names",
        }
    }

    /// Reason recorded when a line is rejected in this mode.
    #[must_use]
    pub const fn rejection_reason(self) -> &'static str {
        match self {
            Self::Wells => "must be exactly 12 digits",
            Self::Names => "must be a bare file name",
        }
    }
}

/// What a task is looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKey {
    /// A well identifier and its accepted diagram names.
    Well(Identifier),
    /// One exact file name.
    Name(String),
}

impl TaskKey {
    /// Text of the input line that produced the task.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Well(identifier) => identifier.as_str(),
            Self::Name(name) => name,
        }
    }

    /// File names that match the task during the scan.
    #[must_use]
    pub fn file_names(&self) -> Vec<String> {
        match self {
            Self::Well(identifier) => identifier.file_names(),
            Self::Name(name) => vec![name.clone()],
        }
    }

    /// API component, for well tasks.
    #[must_use]
    pub fn api(&self) -> Option<&str> {
        match self {
            Self::Well(identifier) => Some(identifier.api()),
            Self::Name(_) => None,
        }
    }

    /// Bore component, for well tasks.
    #[must_use]
    pub fn bore(&self) -> Option<&str> {
        match self {
            Self::Well(identifier) => Some(identifier.bore()),
            Self::Name(_) => None,
        }
    }
}
