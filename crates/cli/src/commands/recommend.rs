use std::path::Path;

use marketlens_core::{CustomerId, DeterministicAnalysisRuntime, EngineError};

use crate::commands::{load, CommandResult};

pub fn run(
    survey_path: &Path,
    catalog_path: &Path,
    user: &str,
    top_k: Option<usize>,
) -> CommandResult {
    let config = match load::config("recommend") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let top_k = top_k.unwrap_or(config.recommend.top_k);

    let (survey, catalog) = match load::tables("recommend", survey_path, catalog_path) {
        Ok(tables) => tables,
        Err(failure) => return failure,
    };

    let runtime = DeterministicAnalysisRuntime::default();
    let customer_id = CustomerId(user.to_owned());
    let entries = match runtime.recommendations(&survey, &catalog, &customer_id, top_k) {
        Ok(entries) => entries,
        Err(error) => {
            let class = match error {
                EngineError::Configuration(_) => "config_validation",
                _ => "validation",
            };
            return CommandResult::failure("recommend", class, error.to_string(), 2);
        }
    };

    tracing::info!(user = %customer_id, returned = entries.len(), top_k, "ranked recommendations");

    let data = match serde_json::to_value(&entries) {
        Ok(data) => data,
        Err(error) => {
            return CommandResult::failure("recommend", "serialization", error.to_string(), 2);
        }
    };

    CommandResult::success(
        "recommend",
        format!("{} ranked products for {customer_id}", entries.len()),
        Some(data),
    )
}
