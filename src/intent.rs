use crate::schema::{Company, Metric, MetricTag};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(202[2-4])\b").unwrap())
}

pub const SUMMARY_KEYWORDS: [&str; 4] = ["summarise", "performance", "overview", "financial health"];

/// Keywords per metric tag, in declaration order.
pub fn keywords(tag: MetricTag) -> &'static [&'static str] {
    match tag {
        MetricTag::Absolute(Metric::TotalRevenue) => &["total revenue", "revenue"],
        MetricTag::Absolute(Metric::NetIncome) => &["net income", "profit"],
        MetricTag::Absolute(Metric::TotalAssets) => &["total assets", "assets"],
        MetricTag::Absolute(Metric::TotalLiabilities) => &["total liabilities", "liabilities"],
        MetricTag::Absolute(Metric::OperatingCashFlow) => &[
            "cash flow from operating activities",
            "operating cash flow",
            "cash flow",
        ],
        MetricTag::Growth(Metric::TotalRevenue) => &["revenue growth"],
        MetricTag::Growth(Metric::NetIncome) => &["net income growth", "profit growth"],
        MetricTag::Growth(Metric::TotalAssets) => &["assets growth"],
        MetricTag::Growth(Metric::TotalLiabilities) => &["liabilities growth"],
        MetricTag::Growth(Metric::OperatingCashFlow) => {
            &["operating cash flow growth", "cash flow growth"]
        }
    }
}

/// What a free-text query asks for. Absent pieces are `None`/empty, never errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryIntent {
    pub company: Option<Company>,
    pub requested_year: Option<i32>,
    /// Every matched tag, growth included, in `MetricTag::ALL` order.
    pub metrics: Vec<MetricTag>,
    pub summary_requested: bool,
}

impl QueryIntent {
    pub fn parse(query: &str) -> Self {
        let folded = query.to_lowercase();

        let company = Company::ALL
            .into_iter()
            .find(|c| folded.contains(c.keyword()));

        let requested_year = year_re()
            .captures(&folded)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok());

        // "revenue growth" is a growth question, so growth phrases must not
        // also trigger the absolute keywords they contain.
        let mut masked = folded.clone();
        for tag in MetricTag::ALL.iter().filter(|t| t.is_growth()) {
            for phrase in keywords(*tag) {
                masked = masked.replace(phrase, " ");
            }
        }

        let metrics = MetricTag::ALL
            .into_iter()
            .filter(|tag| {
                let haystack = if tag.is_growth() { &folded } else { &masked };
                keywords(*tag).iter().any(|k| haystack.contains(k))
            })
            .collect();

        let summary_requested = SUMMARY_KEYWORDS.iter().any(|k| folded.contains(k));

        Self {
            company,
            requested_year,
            metrics,
            summary_requested,
        }
    }

    pub fn absolute_metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.metrics.iter().filter_map(|tag| match tag {
            MetricTag::Absolute(m) => Some(*m),
            MetricTag::Growth(_) => None,
        })
    }

    /// The tags that can contribute to an answer: growth needs more than one
    /// record for the company.
    pub fn effective_metrics(&self, growth_available: bool) -> Vec<MetricTag> {
        self.metrics
            .iter()
            .copied()
            .filter(|tag| growth_available || !tag.is_growth())
            .collect()
    }
}
