use crate::dataset::Dataset;
use crate::schema::{Company, FinancialRecord};

/// A requested year that was not in the data and the year used instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearFallback {
    pub requested: i32,
    pub substituted: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedRecord<'a> {
    pub record: &'a FinancialRecord,
    pub year_used: i32,
    pub fallback: Option<YearFallback>,
    pub company_records: usize,
    pub earliest_year: i32,
}

impl SelectedRecord<'_> {
    /// Growth answers need at least two records for the company, whichever
    /// year was picked.
    pub fn growth_available(&self) -> bool {
        self.company_records > 1
    }

    pub fn is_earliest_year(&self) -> bool {
        self.year_used == self.earliest_year
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection<'a> {
    NoData,
    Found(SelectedRecord<'a>),
}

/// Picks the record for `requested_year`, or the company's latest year when
/// no year was asked for or the asked year is absent.
pub fn select_record(
    dataset: &Dataset,
    company: Company,
    requested_year: Option<i32>,
) -> Selection<'_> {
    let records = dataset.for_company(company);

    let (Some(earliest), Some(latest)) = (
        records.iter().min_by_key(|r| r.fiscal_year),
        records.iter().max_by_key(|r| r.fiscal_year),
    ) else {
        return Selection::NoData;
    };

    let exact = requested_year.and_then(|year| records.iter().find(|r| r.fiscal_year == year));

    let (record, fallback) = match (exact, requested_year) {
        (Some(record), _) => (*record, None),
        (None, Some(requested)) => (
            *latest,
            Some(YearFallback {
                requested,
                substituted: latest.fiscal_year,
            }),
        ),
        (None, None) => (*latest, None),
    };

    Selection::Found(SelectedRecord {
        record,
        year_used: record.fiscal_year,
        fallback,
        company_records: records.len(),
        earliest_year: earliest.fiscal_year,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::raw_row;
    use crate::preparer::DatasetPreparer;

    fn dataset() -> Dataset {
        let rows: Vec<_> = [("Tesla", "2023"), ("Tesla", "2022"), ("Apple", "2022")]
            .into_iter()
            .map(|(c, y)| {
                raw_row([
                    ("Company", c),
                    ("Fiscal Year", y),
                    ("Total Revenue ($M)", "1"),
                ])
            })
            .collect();
        DatasetPreparer::prepare(&rows)
    }

    fn found(selection: Selection<'_>) -> SelectedRecord<'_> {
        match selection {
            Selection::Found(selected) => selected,
            Selection::NoData => panic!("expected a record"),
        }
    }

    #[test]
    fn test_defaults_to_latest_year() {
        let dataset = dataset();
        let selected = found(select_record(&dataset, Company::Tesla, None));
        assert_eq!(selected.year_used, 2023);
        assert_eq!(selected.fallback, None);
        assert!(selected.growth_available());
        assert!(!selected.is_earliest_year());
    }

    #[test]
    fn test_exact_year() {
        let dataset = dataset();
        let selected = found(select_record(&dataset, Company::Tesla, Some(2022)));
        assert_eq!(selected.year_used, 2022);
        assert_eq!(selected.record.fiscal_year, 2022);
        assert_eq!(selected.fallback, None);
        assert!(selected.is_earliest_year());
    }

    #[test]
    fn test_missing_year_falls_back_to_latest() {
        let dataset = dataset();
        let selected = found(select_record(&dataset, Company::Tesla, Some(2024)));
        assert_eq!(selected.year_used, 2023);
        assert_eq!(
            selected.fallback,
            Some(YearFallback {
                requested: 2024,
                substituted: 2023
            })
        );
    }

    #[test]
    fn test_single_record_has_no_growth() {
        let dataset = dataset();
        let selected = found(select_record(&dataset, Company::Apple, None));
        assert!(!selected.growth_available());
    }

    #[test]
    fn test_no_data_for_company() {
        let dataset = dataset();
        assert_eq!(
            select_record(&dataset, Company::Microsoft, Some(2023)),
            Selection::NoData
        );
    }
}
