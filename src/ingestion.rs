use crate::error::{InsightsError, Result};
use csv::ReaderBuilder;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A raw cell as it arrives from the source, before any cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Strips thousands separators and surrounding whitespace, then parses.
    /// Anything that is not a finite number is missing.
    pub fn to_number(&self) -> Option<f64> {
        let value = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.replace(',', "").trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    pub fn to_year(&self) -> Option<i32> {
        match self {
            CellValue::Text(s) => s
                .trim()
                .parse::<i32>()
                .ok()
                .or_else(|| self.integral_number()),
            CellValue::Number(_) => self.integral_number(),
        }
    }

    fn integral_number(&self) -> Option<i32> {
        let n = self.to_number()?;
        (n.fract() == 0.0 && n >= i32::MIN as f64 && n <= i32::MAX as f64).then_some(n as i32)
    }

    pub fn as_text(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(value as f64)
    }
}

pub type RawRow = BTreeMap<String, CellValue>;

/// Builds a row from `(column, cell)` pairs.
pub fn raw_row<I, K, V>(cells: I) -> RawRow
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<CellValue>,
{
    cells
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Reads a headered CSV into raw rows. Every cell stays text; cleaning is the
/// preparer's job.
pub fn read_csv_rows<P: AsRef<Path>>(path: P) -> Result<Vec<RawRow>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| source_error(path, e))?;

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| source_error(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    debug!("CSV '{}' headers: {:?}", path.display(), headers);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row = headers
            .iter()
            .zip(record.iter())
            .map(|(h, cell)| (h.clone(), CellValue::Text(cell.to_string())))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Any I/O failure while opening the file or reading its header means the
/// source itself is unusable.
fn source_error(path: &Path, err: csv::Error) -> InsightsError {
    if matches!(err.kind(), csv::ErrorKind::Io(_)) {
        debug!("CSV source '{}' unreadable: {}", path.display(), err);
        InsightsError::SourceUnavailable {
            path: path.display().to_string(),
        }
    } else {
        InsightsError::CsvError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_number_normalization() {
        assert_eq!(CellValue::from(" 394,328 ").to_number(), Some(394_328.0));
        assert_eq!(CellValue::from("-1,234.5").to_number(), Some(-1234.5));
        assert_eq!(CellValue::from(42.0).to_number(), Some(42.0));
        assert_eq!(CellValue::from("n/a").to_number(), None);
        assert_eq!(CellValue::from("").to_number(), None);
        assert_eq!(CellValue::from("nan").to_number(), None);
        assert_eq!(CellValue::Number(f64::INFINITY).to_number(), None);
    }

    #[test]
    fn test_cell_to_year() {
        assert_eq!(CellValue::from(" 2023 ").to_year(), Some(2023));
        assert_eq!(CellValue::from("2023.0").to_year(), Some(2023));
        assert_eq!(CellValue::from(2024).to_year(), Some(2024));
        assert_eq!(CellValue::from(2023.5).to_year(), None);
        assert_eq!(CellValue::from("FY23").to_year(), None);
    }

    #[test]
    fn test_missing_csv_is_source_unavailable() {
        let path = std::env::temp_dir().join("financial_insights_does_not_exist.csv");
        let err = read_csv_rows(&path).unwrap_err();
        assert!(matches!(err, InsightsError::SourceUnavailable { .. }));
        assert!(err.to_string().contains("was not found"));
    }

    #[test]
    fn test_unreadable_csv_is_source_unavailable() {
        // A directory opens but cannot be read as a file.
        let err = read_csv_rows(std::env::temp_dir()).unwrap_err();
        assert!(matches!(err, InsightsError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_read_csv_rows_keeps_text_cells() {
        let path = std::env::temp_dir().join("financial_insights_ingestion_test.csv");
        std::fs::write(
            &path,
            "Company,Fiscal Year,Total Revenue ($M)\nApple,2022,\"394,328\"\n",
        )
        .unwrap();

        let rows = read_csv_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Company"], CellValue::from("Apple"));
        assert_eq!(rows[0]["Total Revenue ($M)"].to_number(), Some(394_328.0));

        std::fs::remove_file(&path).ok();
    }
}
