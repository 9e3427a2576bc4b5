//! Shared error type and application context for command handlers.

use std::fmt::{self, Display, Formatter};
use std::path::Path;

use anyhow::anyhow;
use wellfile_config::{ConfigError, WellfileConfig, load_config};

use crate::cli::OutputFormat;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

/// Application context passed to command handlers.
#[derive(Debug, Clone)]
pub(crate) struct AppContext {
    pub(crate) config: WellfileConfig,
    pub(crate) output: OutputFormat,
}

impl AppContext {
    /// Load the configuration document when one is given; otherwise use defaults.
    pub(crate) fn load(config_path: Option<&Path>, output: OutputFormat) -> CliResult<Self> {
        let config = match config_path {
            Some(path) => load_config(path).map_err(|err| config_error(path, err))?,
            None => WellfileConfig::default(),
        };
        Ok(Self { config, output })
    }
}

fn config_error(path: &Path, err: ConfigError) -> CliError {
    match err {
        ConfigError::InvalidField {
            section,
            field,
            value,
            reason,
        } => CliError::validation(format!(
            "invalid configuration in {}: {section}.{field} {reason}{}",
            path.display(),
            value.map(|value| format!(" ({value})")).unwrap_or_default()
        )),
        ConfigError::Json { source, .. } => CliError::validation(format!(
            "configuration {} is not valid: {source}",
            path.display()
        )),
        ConfigError::Io { source, .. } => CliError::failure(anyhow!(
            "failed to read configuration {}: {source}",
            path.display()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wellfile_test_support::fixtures::{temp_dir, write_file};

    #[test]
    fn exit_codes_distinguish_validation_from_failure() {
        let validation = CliError::validation("bad input");
        assert_eq!(validation.exit_code(), 2);
        assert_eq!(validation.display_message(), "bad input");

        let failure = CliError::failure(anyhow!("disk full"));
        assert_eq!(failure.exit_code(), 3);
        assert_eq!(failure.display_message(), "disk full");
    }

    #[test]
    fn missing_config_path_uses_defaults() -> Result<(), CliError> {
        let ctx = AppContext::load(None, OutputFormat::Table)?;
        assert_eq!(ctx.config, WellfileConfig::default());
        Ok(())
    }

    #[test]
    fn invalid_config_is_a_validation_error() -> anyhow::Result<()> {
        let dir = temp_dir("cli-config")?;
        let path = dir.path().join("wellfile.json");
        write_file(&path, r#"{"index": {"max_file_name_len": 0}}"#)?;
        let outcome = AppContext::load(Some(&path), OutputFormat::Json);
        assert!(matches!(outcome, Err(CliError::Validation(_))));

        write_file(&path, "{not json")?;
        let outcome = AppContext::load(Some(&path), OutputFormat::Json);
        assert!(matches!(outcome, Err(CliError::Validation(_))));

        let outcome = AppContext::load(Some(&dir.path().join("missing.json")), OutputFormat::Json);
        assert!(matches!(outcome, Err(CliError::Failure(_))));
        Ok(())
    }
}
