use crate::dataset::Dataset;
use crate::error::Result;
use crate::ingestion::{read_csv_rows, RawRow};
use crate::schema::{
    Company, FinancialRecord, GrowthValue, Metric, MetricGrowth, COMPANY_COLUMN,
    FISCAL_YEAR_COLUMN,
};
use log::{debug, error, info, warn};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

/// Diagnostics collected while preparing a dataset. None of them are fatal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparationReport {
    pub rows_read: usize,
    pub rows_used: usize,
    pub missing_columns: Vec<String>,
    pub warnings: Vec<String>,
}

// Cleaned row before growth derivation; `None` means missing.
struct CleanRow {
    company: Company,
    fiscal_year: i32,
    values: BTreeMap<Metric, Option<f64>>,
}

pub struct DatasetPreparer;

impl DatasetPreparer {
    pub fn prepare(rows: &[RawRow]) -> Dataset {
        Self::prepare_with_report(rows).0
    }

    pub fn prepare_with_report(rows: &[RawRow]) -> (Dataset, PreparationReport) {
        let mut report = PreparationReport {
            rows_read: rows.len(),
            ..Default::default()
        };

        let present: BTreeSet<&str> = rows
            .iter()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect();

        let mut metrics = Vec::new();
        for metric in Metric::ALL {
            if present.contains(metric.column()) {
                metrics.push(metric);
            } else {
                warn!(
                    "Column '{}' not found in the data. Please check the CSV header names.",
                    metric.column()
                );
                report.missing_columns.push(metric.column().to_string());
            }
        }

        let mut clean = Self::clean_rows(rows, &metrics, &mut report);

        // Growth looks at the previous row, so the order is load-bearing.
        clean.sort_by(|a, b| {
            a.company
                .name()
                .cmp(b.company.name())
                .then(a.fiscal_year.cmp(&b.fiscal_year))
        });

        let records = Self::derive_growth(&clean);
        report.rows_used = records.len();

        info!(
            "Prepared {} financial records from {} raw rows",
            report.rows_used, report.rows_read
        );
        for warning in &report.warnings {
            debug!("Preparation detail: {}", warning);
        }

        (Dataset::from_sorted(records), report)
    }

    /// Reads and prepares a CSV source.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Dataset> {
        let rows = read_csv_rows(path)?;
        Ok(Self::prepare(&rows))
    }

    /// Like [`DatasetPreparer::load`], but an unreadable source is logged and
    /// turned into an empty dataset. Callers must treat empty as unusable.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Dataset {
        match Self::load(path) {
            Ok(dataset) => dataset,
            Err(e) => {
                error!("{}", e);
                Dataset::empty()
            }
        }
    }

    fn clean_rows(
        rows: &[RawRow],
        metrics: &[Metric],
        report: &mut PreparationReport,
    ) -> Vec<CleanRow> {
        let mut seen: HashSet<(Company, i32)> = HashSet::new();
        let mut clean = Vec::with_capacity(rows.len());

        for (idx, row) in rows.iter().enumerate() {
            let company = match row.get(COMPANY_COLUMN).map(|c| c.as_text().parse::<Company>()) {
                Some(Ok(company)) => company,
                Some(Err(e)) => {
                    report.warnings.push(format!("Row {}: {}; row skipped", idx, e));
                    continue;
                }
                None => {
                    report
                        .warnings
                        .push(format!("Row {}: no '{}' value; row skipped", idx, COMPANY_COLUMN));
                    continue;
                }
            };

            let Some(fiscal_year) = row.get(FISCAL_YEAR_COLUMN).and_then(|c| c.to_year()) else {
                report.warnings.push(format!(
                    "Row {}: '{}' is missing or not a whole year; row skipped",
                    idx, FISCAL_YEAR_COLUMN
                ));
                continue;
            };

            if !seen.insert((company, fiscal_year)) {
                report.warnings.push(format!(
                    "Row {}: duplicate record for {} FY{}; keeping the first one",
                    idx, company, fiscal_year
                ));
                continue;
            }

            let mut values = BTreeMap::new();
            for metric in Metric::ALL {
                let value = if metrics.contains(&metric) {
                    let parsed = row.get(metric.column()).and_then(|c| c.to_number());
                    if parsed.is_none() {
                        report.warnings.push(format!(
                            "Row {}: '{}' for {} FY{} is not numeric; treated as missing",
                            idx,
                            metric.column(),
                            company,
                            fiscal_year
                        ));
                    }
                    parsed
                } else {
                    None
                };
                values.insert(metric, value);
            }

            clean.push(CleanRow {
                company,
                fiscal_year,
                values,
            });
        }

        clean
    }

    fn derive_growth(sorted: &[CleanRow]) -> Vec<FinancialRecord> {
        let mut records = Vec::with_capacity(sorted.len());

        for (idx, row) in sorted.iter().enumerate() {
            let previous = idx
                .checked_sub(1)
                .map(|p| &sorted[p])
                .filter(|p| p.company == row.company);

            let growth = match previous {
                Some(prev) => MetricGrowth::from_fn(|metric| {
                    GrowthValue::from_option(pct_change(
                        prev.values[&metric],
                        row.values[&metric],
                    ))
                }),
                None => MetricGrowth::none(),
            };

            let value = |metric: Metric| row.values[&metric].unwrap_or(0.0);

            records.push(FinancialRecord {
                company: row.company,
                fiscal_year: row.fiscal_year,
                total_revenue: value(Metric::TotalRevenue),
                net_income: value(Metric::NetIncome),
                total_assets: value(Metric::TotalAssets),
                total_liabilities: value(Metric::TotalLiabilities),
                operating_cash_flow: value(Metric::OperatingCashFlow),
                growth,
            });
        }

        records
    }
}

/// Percentage change from `previous` to `current`. A zero base has no defined
/// percentage and counts as not available.
pub fn pct_change(previous: Option<f64>, current: Option<f64>) -> Option<f64> {
    let (previous, current) = (previous?, current?);
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::{raw_row, CellValue};

    fn row(company: &str, year: &str, revenue: &str) -> RawRow {
        raw_row([
            ("Company", company),
            ("Fiscal Year", year),
            ("Total Revenue ($M)", revenue),
            ("Net Income ($M)", "10"),
            ("Total Assets ($M)", "100"),
            ("Total Liabilities ($M)", "50"),
            ("Cash Flow from Operating Activities ($M)", "20"),
        ])
    }

    #[test]
    fn test_pct_change() {
        assert_eq!(pct_change(Some(100.0), Some(120.0)), Some(20.0));
        assert_eq!(pct_change(Some(0.0), Some(120.0)), None);
        assert_eq!(pct_change(None, Some(120.0)), None);
        assert_eq!(pct_change(Some(100.0), None), None);
    }

    #[test]
    fn test_sorts_before_growth() {
        let rows = vec![
            row("Apple", "2024", "150"),
            row("Tesla", "2022", "80"),
            row("Apple", "2022", "100"),
            row("Apple", "2023", "120"),
        ];
        let dataset = DatasetPreparer::prepare(&rows);

        let order: Vec<(Company, i32)> = dataset
            .records()
            .iter()
            .map(|r| (r.company, r.fiscal_year))
            .collect();
        assert_eq!(
            order,
            vec![
                (Company::Apple, 2022),
                (Company::Apple, 2023),
                (Company::Apple, 2024),
                (Company::Tesla, 2022),
            ]
        );

        let apple = dataset.for_company(Company::Apple);
        assert!(!apple[0].growth(Metric::TotalRevenue).available);
        assert_eq!(apple[1].growth(Metric::TotalRevenue).as_option(), Some(20.0));
        assert_eq!(apple[2].growth(Metric::TotalRevenue).as_option(), Some(25.0));
        // Tesla's first record must not chain onto Apple's last.
        assert!(!dataset.for_company(Company::Tesla)[0]
            .growth(Metric::TotalRevenue)
            .available);
    }

    #[test]
    fn test_unparseable_value_is_missing_not_zero() {
        let rows = vec![row("Apple", "2022", "100"), row("Apple", "2023", "n/a")];
        let (dataset, report) = DatasetPreparer::prepare_with_report(&rows);

        let latest = &dataset.records()[1];
        assert_eq!(latest.total_revenue, 0.0);
        assert!(!latest.growth(Metric::TotalRevenue).available);
        assert_eq!(latest.growth(Metric::NetIncome).as_option(), Some(0.0));
        assert!(report.warnings.iter().any(|w| w.contains("not numeric")));
    }

    #[test]
    fn test_missing_column_is_reported() {
        let rows = vec![
            raw_row([("Company", "Tesla"), ("Fiscal Year", "2022")]),
            raw_row([("Company", "Tesla"), ("Fiscal Year", "2023")]),
        ];
        let (dataset, report) = DatasetPreparer::prepare_with_report(&rows);

        assert_eq!(dataset.len(), 2);
        assert_eq!(report.missing_columns.len(), 5);
        assert!(report
            .missing_columns
            .contains(&"Net Income ($M)".to_string()));
        assert!(!dataset.records()[1].growth(Metric::NetIncome).available);
    }

    #[test]
    fn test_skips_unknown_companies_and_duplicates() {
        let mut unknown = row("Amazon", "2022", "1");
        unknown.insert("Fiscal Year".to_string(), CellValue::from(2022));
        let rows = vec![
            unknown,
            row("Apple", "2022", "100"),
            row("Apple", "2022", "999"),
            row("Apple", "twenty", "5"),
        ];
        let (dataset, report) = DatasetPreparer::prepare_with_report(&rows);

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].total_revenue, 100.0);
        assert_eq!(report.rows_read, 4);
        assert_eq!(report.rows_used, 1);
        assert_eq!(report.warnings.len(), 3);
    }

    #[test]
    fn test_numeric_cells_are_accepted() {
        let rows = vec![raw_row([
            ("Company", CellValue::from("Microsoft")),
            ("Fiscal Year", CellValue::from(2024)),
            ("Total Revenue ($M)", CellValue::from(245_122.0)),
        ])];
        let dataset = DatasetPreparer::prepare(&rows);
        assert_eq!(dataset.records()[0].total_revenue, 245_122.0);
        assert_eq!(dataset.records()[0].fiscal_year, 2024);
    }

    #[test]
    fn test_load_or_empty_on_missing_source() {
        let path = std::env::temp_dir().join("financial_insights_missing_source.csv");
        assert!(DatasetPreparer::load_or_empty(&path).is_empty());
    }
}
