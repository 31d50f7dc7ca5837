//! # Financial Insights
//!
//! A rule-based assistant that answers free-text questions about the yearly
//! financial figures of a fixed set of companies (Microsoft, Tesla, Apple).
//!
//! ## Core Concepts
//!
//! - **Dataset**: cleaned records, one per company and fiscal year, with
//!   year-over-year growth derived once at load time
//! - **Intent**: company, optional year, requested metrics and a summary flag,
//!   matched from the query with fixed keywords and a year pattern
//! - **Selection**: the record for the requested year, or the latest year with
//!   a fallback notice
//! - **Response**: templated answer text plus one follow-up suggestion
//!
//! Growth cells carry an explicit availability flag. A stored `0.0` is only a
//! real 0% change when the flag is set.
//!
//! ## Example
//!
//! ```rust
//! use financial_insights::*;
//!
//! let rows = vec![
//!     raw_row([("Company", "Apple"), ("Fiscal Year", "2022"), ("Total Revenue ($M)", "100")]),
//!     raw_row([("Company", "Apple"), ("Fiscal Year", "2023"), ("Total Revenue ($M)", "120")]),
//! ];
//! let dataset = DatasetPreparer::prepare(&rows);
//!
//! let reply = answer("Apple revenue growth", &dataset);
//! assert!(reply.starts_with("Apple's Revenue Growth for FY2023 was 20.00%."));
//! ```

pub mod composer;
pub mod config;
pub mod dataset;
pub mod error;
pub mod ingestion;
pub mod intent;
pub mod preparer;
pub mod schema;
pub mod selector;
pub mod session;
pub mod utils;

pub use composer::{FollowUp, MetricAnswer, MetricLine, Response, ResponseComposer, Summary};
pub use config::InsightsConfig;
pub use dataset::Dataset;
pub use error::{InsightsError, Result};
pub use ingestion::{raw_row, read_csv_rows, CellValue, RawRow};
pub use intent::QueryIntent;
pub use preparer::{DatasetPreparer, PreparationReport};
pub use schema::*;
pub use selector::{select_record, SelectedRecord, Selection, YearFallback};
pub use session::{ChatMessage, ChatSession, Role};

use log::debug;

/// Interprets `query` against `dataset` and returns the structured response.
pub fn respond(query: &str, dataset: &Dataset) -> Response {
    let intent = QueryIntent::parse(query);
    debug!("Interpreted query {:?} as {:?}", query, intent);
    ResponseComposer::compose(&intent, dataset)
}

/// The answer text for `query`. Pure: the dataset is the only input besides
/// the query.
pub fn answer(query: &str, dataset: &Dataset) -> String {
    respond(query, dataset).to_string()
}

/// Owns a prepared dataset and answers queries against it.
pub struct InsightEngine {
    dataset: Dataset,
}

impl InsightEngine {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    /// Loads the configured CSV once; an unreadable source is an error.
    pub fn from_config(config: &InsightsConfig) -> Result<Self> {
        let dataset = DatasetPreparer::load(&config.data_path)?;
        if dataset.is_empty() {
            return Err(InsightsError::EmptyDataset);
        }
        Ok(Self::new(dataset))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn answer(&self, query: &str) -> String {
        answer(query, &self.dataset)
    }

    pub fn session(&self) -> Result<ChatSession<'_>> {
        ChatSession::new(&self.dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> InsightEngine {
        let rows = vec![
            raw_row([
                ("Company", "Microsoft"),
                ("Fiscal Year", "2023"),
                ("Net Income ($M)", "72,361"),
            ]),
            raw_row([
                ("Company", "Microsoft"),
                ("Fiscal Year", "2024"),
                ("Net Income ($M)", "88,136"),
            ]),
        ];
        InsightEngine::new(DatasetPreparer::prepare(&rows))
    }

    #[test]
    fn test_answer_net_income_with_follow_up() {
        let reply = engine().answer("What was Microsoft's profit in 2023?");
        assert_eq!(
            reply,
            "Microsoft's Net Income for FY2023 was $72,361M.\n\
             Perhaps Microsoft's cash flow or net income growth for FY2023 next?"
        );
    }

    #[test]
    fn test_answer_is_pure() {
        let engine = engine();
        let first = engine.answer("microsoft net income growth");
        let second = engine.answer("microsoft net income growth");
        assert_eq!(first, second);
        assert!(first.starts_with("Microsoft's Net Income Growth for FY2024 was 21.80%."));
    }

    #[test]
    fn test_from_config_missing_source() {
        let config = InsightsConfig {
            data_path: std::env::temp_dir().join("financial_insights_no_such_file.csv"),
        };
        assert!(matches!(
            InsightEngine::from_config(&config),
            Err(InsightsError::SourceUnavailable { .. })
        ));
    }
}
