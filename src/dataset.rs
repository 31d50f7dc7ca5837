use crate::error::{InsightsError, Result};
use crate::schema::{Company, FinancialRecord, Metric, COMPANY_COLUMN, FISCAL_YEAR_COLUMN};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;

/// The prepared, read-only dataset every query runs against.
///
/// Records are unique by `(company, fiscal_year)` and sorted by company name,
/// then fiscal year ascending. Deserialized datasets are checked against the
/// same rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(try_from = "StoredDataset")]
pub struct Dataset {
    records: Vec<FinancialRecord>,
}

// Unchecked wire shape of `Dataset`.
#[derive(Deserialize)]
struct StoredDataset {
    records: Vec<FinancialRecord>,
}

impl TryFrom<StoredDataset> for Dataset {
    type Error = InsightsError;

    fn try_from(stored: StoredDataset) -> Result<Self> {
        Self::from_records(stored.records)
    }
}

impl Dataset {
    pub(crate) fn from_sorted(records: Vec<FinancialRecord>) -> Self {
        Self { records }
    }

    /// Builds a dataset from already prepared records, rejecting duplicate
    /// `(company, fiscal_year)` pairs and restoring the sort order.
    pub fn from_records(mut records: Vec<FinancialRecord>) -> Result<Self> {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert((record.company, record.fiscal_year)) {
                return Err(InsightsError::InvalidDataset(format!(
                    "duplicate record for {} FY{}",
                    record.company, record.fiscal_year
                )));
            }
        }

        records.sort_by(|a, b| {
            a.company
                .name()
                .cmp(b.company.name())
                .then(a.fiscal_year.cmp(&b.fiscal_year))
        });
        Ok(Self { records })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[FinancialRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The company's records in ascending fiscal-year order.
    pub fn for_company(&self, company: Company) -> Vec<&FinancialRecord> {
        self.records
            .iter()
            .filter(|r| r.company == company)
            .collect()
    }

    pub fn companies(&self) -> Vec<Company> {
        let mut companies: Vec<Company> = Vec::new();
        for record in &self.records {
            if !companies.contains(&record.company) {
                companies.push(record.company);
            }
        }
        companies
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Writes the materialized table: source columns followed by one growth
    /// column per metric. Growth that is not available is left blank.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = vec![COMPANY_COLUMN, FISCAL_YEAR_COLUMN];
        header.extend(Metric::ALL.iter().map(|m| m.column()));
        header.extend(Metric::ALL.iter().map(|m| m.growth_column()));
        wtr.write_record(&header)?;

        for record in &self.records {
            let mut row = vec![record.company.to_string(), record.fiscal_year.to_string()];
            row.extend(Metric::ALL.iter().map(|m| record.value(*m).to_string()));
            row.extend(Metric::ALL.iter().map(|m| {
                record
                    .growth(*m)
                    .as_option()
                    .map(|v| v.to_string())
                    .unwrap_or_default()
            }));
            wtr.write_record(&row)?;
        }

        wtr.flush()?;
        Ok(())
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(Dataset)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}
