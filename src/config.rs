use crate::error::{InsightsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_PATH: &str = "financial_data.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsConfig {
    /// CSV file holding one row per company and fiscal year.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
}

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
        }
    }
}

impl InsightsConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<()> {
        if self.data_path.as_os_str().is_empty() {
            return Err(InsightsError::InvalidConfig(
                "data_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InsightsConfig::from_json("{}").unwrap();
        assert_eq!(config, InsightsConfig::default());
        assert_eq!(config.data_path, PathBuf::from("financial_data.csv"));
    }

    #[test]
    fn test_custom_path() {
        let config = InsightsConfig::from_json(r#"{"data_path": "data/fy.csv"}"#).unwrap();
        assert_eq!(config.data_path, PathBuf::from("data/fy.csv"));
    }

    #[test]
    fn test_empty_path_rejected() {
        let err = InsightsConfig::from_json(r#"{"data_path": ""}"#).unwrap_err();
        assert!(matches!(err, InsightsError::InvalidConfig(_)));
    }
}
