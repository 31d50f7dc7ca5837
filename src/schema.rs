use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const COMPANY_COLUMN: &str = "Company";
pub const FISCAL_YEAR_COLUMN: &str = "Fiscal Year";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
pub enum Company {
    Microsoft,
    Tesla,
    Apple,
}

impl Company {
    /// Matching priority: when a query names several companies the first one
    /// in this list wins.
    pub const ALL: [Company; 3] = [Company::Microsoft, Company::Tesla, Company::Apple];

    pub fn name(&self) -> &'static str {
        match self {
            Company::Microsoft => "Microsoft",
            Company::Tesla => "Tesla",
            Company::Apple => "Apple",
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Company::Microsoft => "microsoft",
            Company::Tesla => "tesla",
            Company::Apple => "apple",
        }
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Company {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Company::ALL
            .into_iter()
            .find(|c| c.keyword() == needle)
            .ok_or_else(|| format!("Unknown company '{}'", s.trim()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalRevenue,
    NetIncome,
    TotalAssets,
    TotalLiabilities,
    OperatingCashFlow,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::TotalRevenue,
        Metric::NetIncome,
        Metric::TotalAssets,
        Metric::TotalLiabilities,
        Metric::OperatingCashFlow,
    ];

    /// Exact source column header, unit suffix included.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::TotalRevenue => "Total Revenue ($M)",
            Metric::NetIncome => "Net Income ($M)",
            Metric::TotalAssets => "Total Assets ($M)",
            Metric::TotalLiabilities => "Total Liabilities ($M)",
            Metric::OperatingCashFlow => "Cash Flow from Operating Activities ($M)",
        }
    }

    pub fn growth_column(&self) -> &'static str {
        match self {
            Metric::TotalRevenue => "Revenue Growth (%)",
            Metric::NetIncome => "Net Income Growth (%)",
            Metric::TotalAssets => "Total Assets Growth (%)",
            Metric::TotalLiabilities => "Total Liabilities Growth (%)",
            Metric::OperatingCashFlow => "Cash Flow from Operating Activities Growth (%)",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::TotalRevenue => "Total Revenue",
            Metric::NetIncome => "Net Income",
            Metric::TotalAssets => "Total Assets",
            Metric::TotalLiabilities => "Total Liabilities",
            Metric::OperatingCashFlow => "Cash Flow from Operating Activities",
        }
    }

    pub fn growth_label(&self) -> &'static str {
        match self {
            Metric::TotalRevenue => "Revenue Growth",
            Metric::NetIncome => "Net Income Growth",
            Metric::TotalAssets => "Total Assets Growth",
            Metric::TotalLiabilities => "Total Liabilities Growth",
            Metric::OperatingCashFlow => "Cash Flow from Operating Activities Growth",
        }
    }

    /// Plural balance-sheet labels read "were", the rest "was".
    pub fn verb(&self) -> &'static str {
        match self {
            Metric::TotalAssets | Metric::TotalLiabilities => "were",
            _ => "was",
        }
    }
}

/// A metric a query can ask about: the absolute figure or its year-over-year growth.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema)]
#[serde(tag = "kind", content = "metric", rename_all = "snake_case")]
pub enum MetricTag {
    Absolute(Metric),
    Growth(Metric),
}

impl MetricTag {
    pub const ALL: [MetricTag; 10] = [
        MetricTag::Absolute(Metric::TotalRevenue),
        MetricTag::Absolute(Metric::NetIncome),
        MetricTag::Absolute(Metric::TotalAssets),
        MetricTag::Absolute(Metric::TotalLiabilities),
        MetricTag::Absolute(Metric::OperatingCashFlow),
        MetricTag::Growth(Metric::TotalRevenue),
        MetricTag::Growth(Metric::NetIncome),
        MetricTag::Growth(Metric::TotalAssets),
        MetricTag::Growth(Metric::TotalLiabilities),
        MetricTag::Growth(Metric::OperatingCashFlow),
    ];

    pub fn metric(&self) -> Metric {
        match self {
            MetricTag::Absolute(m) | MetricTag::Growth(m) => *m,
        }
    }

    pub fn is_growth(&self) -> bool {
        matches!(self, MetricTag::Growth(_))
    }
}

/// A growth percentage together with its availability.
///
/// Unavailable cells are stored as `0.0` so the dataset stays fully numeric,
/// but `available` is the only thing consumers may use to tell a genuine
/// 0% change apart from a missing one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct GrowthValue {
    #[schemars(description = "Year-over-year change in percent; 0.0 when not available")]
    pub value: f64,

    #[schemars(description = "False when no previous fiscal year (or no usable previous value) exists")]
    pub available: bool,
}

impl GrowthValue {
    pub fn available(value: f64) -> Self {
        Self {
            value,
            available: true,
        }
    }

    pub fn not_available() -> Self {
        Self {
            value: 0.0,
            available: false,
        }
    }

    pub fn from_option(value: Option<f64>) -> Self {
        value.map_or_else(Self::not_available, Self::available)
    }

    pub fn as_option(&self) -> Option<f64> {
        self.available.then_some(self.value)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct MetricGrowth {
    pub total_revenue: GrowthValue,
    pub net_income: GrowthValue,
    pub total_assets: GrowthValue,
    pub total_liabilities: GrowthValue,
    pub operating_cash_flow: GrowthValue,
}

impl MetricGrowth {
    pub fn none() -> Self {
        Self::from_fn(|_| GrowthValue::not_available())
    }

    pub fn from_fn(mut f: impl FnMut(Metric) -> GrowthValue) -> Self {
        Self {
            total_revenue: f(Metric::TotalRevenue),
            net_income: f(Metric::NetIncome),
            total_assets: f(Metric::TotalAssets),
            total_liabilities: f(Metric::TotalLiabilities),
            operating_cash_flow: f(Metric::OperatingCashFlow),
        }
    }

    pub fn get(&self, metric: Metric) -> GrowthValue {
        match metric {
            Metric::TotalRevenue => self.total_revenue,
            Metric::NetIncome => self.net_income,
            Metric::TotalAssets => self.total_assets,
            Metric::TotalLiabilities => self.total_liabilities,
            Metric::OperatingCashFlow => self.operating_cash_flow,
        }
    }
}

/// One company's figures for one fiscal year, in millions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct FinancialRecord {
    pub company: Company,

    #[schemars(description = "The accounting year this record pertains to")]
    pub fiscal_year: i32,

    pub total_revenue: f64,
    pub net_income: f64,
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub operating_cash_flow: f64,

    #[schemars(description = "Year-over-year growth against the same company's previous fiscal year")]
    pub growth: MetricGrowth,
}

impl FinancialRecord {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::TotalRevenue => self.total_revenue,
            Metric::NetIncome => self.net_income,
            Metric::TotalAssets => self.total_assets,
            Metric::TotalLiabilities => self.total_liabilities,
            Metric::OperatingCashFlow => self.operating_cash_flow,
        }
    }

    pub fn growth(&self, metric: Metric) -> GrowthValue {
        self.growth.get(metric)
    }
}
