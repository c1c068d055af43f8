use std::path::Path;

use marketlens_core::{
    AnalysisInput, AnalysisRuntime, DeterministicAnalysisRuntime, DeterministicScorer,
    InsightEngine,
};
use serde_json::json;

use crate::commands::{load, CommandResult};

pub fn run(survey_path: &Path, catalog_path: &Path) -> CommandResult {
    let config = match load::config("insights") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let (survey, catalog) = match load::tables("insights", survey_path, catalog_path) {
        Ok(tables) => tables,
        Err(failure) => return failure,
    };

    let runtime =
        DeterministicAnalysisRuntime::new(DeterministicScorer, InsightEngine::new(config.insights));
    let report = match runtime.evaluate(AnalysisInput { survey: &survey, catalog: &catalog }) {
        Ok(report) => report,
        Err(error) => {
            return CommandResult::failure("insights", "evaluation", error.to_string(), 2);
        }
    };

    tracing::info!(fired = report.insights.len(), "business rules evaluated");

    let fired: Vec<_> = report
        .insights
        .iter()
        .map(|key| json!({ "key": key.key(), "description": key.description() }))
        .collect();

    CommandResult::success(
        "insights",
        format!("{} of {} rules fired", fired.len(), marketlens_core::InsightKey::ALL.len()),
        Some(json!(fired)),
    )
}
