use std::path::Path;

use marketlens_core::{
    AnalysisInput, AnalysisRuntime, DeterministicAnalysisRuntime, DeterministicScorer,
    InsightEngine,
};

use crate::commands::{load, CommandResult};

pub fn run(survey_path: &Path, catalog_path: &Path) -> CommandResult {
    let config = match load::config("metrics") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let (survey, catalog) = match load::tables("metrics", survey_path, catalog_path) {
        Ok(tables) => tables,
        Err(failure) => return failure,
    };

    let runtime =
        DeterministicAnalysisRuntime::new(DeterministicScorer, InsightEngine::new(config.insights));
    let report = match runtime.evaluate(AnalysisInput { survey: &survey, catalog: &catalog }) {
        Ok(report) => report,
        Err(error) => {
            return CommandResult::failure("metrics", "evaluation", error.to_string(), 2);
        }
    };

    tracing::info!(customers = survey.len(), products = catalog.len(), "metrics snapshot computed");

    let data = match serde_json::to_value(&report) {
        Ok(data) => data,
        Err(error) => {
            return CommandResult::failure("metrics", "serialization", error.to_string(), 2);
        }
    };

    CommandResult::success(
        "metrics",
        format!("snapshot over {} customers and {} products", survey.len(), catalog.len()),
        Some(data),
    )
}
