pub mod catalog;
pub mod error;
pub mod survey;

pub use catalog::{expand_catalog, load_catalog_json};
pub use error::DataError;
pub use survey::{generate_survey, load_survey_csv, write_survey_csv};
