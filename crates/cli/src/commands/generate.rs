use std::path::Path;

use marketlens_data::{generate_survey, write_survey_csv, DataError};
use serde_json::json;

use crate::commands::{load, CommandResult};

pub fn run(count: usize, seed: u64, output: &Path) -> CommandResult {
    if let Err(failure) = load::config("generate") {
        return failure;
    }

    if count == 0 {
        return CommandResult::failure(
            "generate",
            "validation",
            "count must be at least 1",
            2,
        );
    }

    let survey = match generate_survey(count, seed) {
        Ok(survey) => survey,
        Err(DataError::Engine(inner)) => {
            return CommandResult::failure("generate", "validation", inner.to_string(), 2);
        }
        Err(error) => {
            return CommandResult::failure("generate", "data_load", error.to_string(), 3);
        }
    };

    if let Err(error) = write_survey_csv(output, &survey) {
        return CommandResult::failure("generate", "write", error.to_string(), 3);
    }

    tracing::info!(count, seed, path = %output.display(), "synthetic survey written");

    CommandResult::success(
        "generate",
        format!("wrote {count} customers to {}", output.display()),
        Some(json!({
            "count": count,
            "seed": seed,
            "path": output.display().to_string(),
            "fingerprint": survey.fingerprint(),
        })),
    )
}
