pub mod generate;
pub mod insights;
pub mod metrics;
pub mod recommend;

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>, data: Option<Value>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Load config then both tables, mapping each failure to the right exit code.
pub(crate) mod load {
    use std::path::Path;

    use marketlens_core::config::{AppConfig, LoadOptions};
    use marketlens_core::{Catalog, Survey};
    use marketlens_data::{load_catalog_json, load_survey_csv, DataError};

    use super::CommandResult;

    pub(crate) fn config(command: &str) -> Result<AppConfig, CommandResult> {
        AppConfig::load(LoadOptions::default()).map_err(|error| {
            CommandResult::failure(
                command,
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            )
        })
    }

    pub(crate) fn tables(
        command: &str,
        survey_path: &Path,
        catalog_path: &Path,
    ) -> Result<(Survey, Catalog), CommandResult> {
        let survey = load_survey_csv(survey_path)
            .map_err(|error| data_failure(command, error))?;
        let catalog = load_catalog_json(catalog_path)
            .map_err(|error| data_failure(command, error))?;
        Ok((survey, catalog))
    }

    // Rows that parse but fail table validation carry the validation exit code.
    fn data_failure(command: &str, error: DataError) -> CommandResult {
        match error {
            DataError::Engine(inner) => {
                CommandResult::failure(command, "table_validation", inner.to_string(), 2)
            }
            other => CommandResult::failure(command, "data_load", other.to_string(), 3),
        }
    }
}
