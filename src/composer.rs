//! Turns an interpreted query plus the selected record into the answer text.
//!
//! Branches are tried in a fixed order: missing company, missing data,
//! summary, individual metrics, generic fallback. Each outcome is a
//! [`Response`] variant and renders through `Display`.

use crate::dataset::Dataset;
use crate::intent::QueryIntent;
use crate::schema::{Company, FinancialRecord, GrowthValue, Metric, MetricTag};
use crate::selector::{select_record, SelectedRecord, Selection, YearFallback};
use crate::utils::{format_millions, format_pct};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    CompanyRequired,
    NoData { company: Company },
    Summary(Summary),
    Metrics(MetricAnswer),
    Unrecognized { company: Company },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub company: Company,
    pub year: i32,
    pub total_revenue: f64,
    pub net_income: f64,
    pub operating_cash_flow: f64,
    /// `None` when the year is the company's first or it has a single record.
    pub growth: Option<SummaryGrowth>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryGrowth {
    pub revenue: GrowthValue,
    pub net_income: GrowthValue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricLine {
    Absolute { metric: Metric, value: f64 },
    Growth { metric: Metric, value: f64 },
    GrowthNotAvailable { metric: Metric },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    NetIncomeOrRevenueGrowth,
    CashFlowOrNetIncomeGrowth,
    FinancialHealthSummary,
    OtherGrowthMetrics,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricAnswer {
    pub company: Company,
    pub year: i32,
    pub fallback: Option<YearFallback>,
    pub lines: Vec<MetricLine>,
    pub follow_up: Option<FollowUp>,
}

pub struct ResponseComposer;

impl ResponseComposer {
    pub fn compose(intent: &QueryIntent, dataset: &Dataset) -> Response {
        let Some(company) = intent.company else {
            return Response::CompanyRequired;
        };

        let selected = match select_record(dataset, company, intent.requested_year) {
            Selection::NoData => return Response::NoData { company },
            Selection::Found(selected) => selected,
        };

        if intent.summary_requested {
            return Response::Summary(Summary::new(company, &selected));
        }

        let metrics = intent.effective_metrics(selected.growth_available());
        if metrics.is_empty() {
            return Response::Unrecognized { company };
        }

        Response::Metrics(MetricAnswer {
            company,
            year: selected.year_used,
            fallback: selected.fallback,
            lines: metrics
                .iter()
                .map(|tag| MetricLine::new(*tag, selected.record))
                .collect(),
            follow_up: FollowUp::choose(&metrics),
        })
    }
}

impl Summary {
    fn new(company: Company, selected: &SelectedRecord<'_>) -> Self {
        let record = selected.record;
        let growth = (!selected.is_earliest_year() && selected.growth_available()).then(|| {
            SummaryGrowth {
                revenue: record.growth(Metric::TotalRevenue),
                net_income: record.growth(Metric::NetIncome),
            }
        });

        Self {
            company,
            year: selected.year_used,
            total_revenue: record.total_revenue,
            net_income: record.net_income,
            operating_cash_flow: record.operating_cash_flow,
            growth,
        }
    }
}

impl MetricLine {
    fn new(tag: MetricTag, record: &FinancialRecord) -> Self {
        match tag {
            MetricTag::Absolute(metric) => MetricLine::Absolute {
                metric,
                value: record.value(metric),
            },
            MetricTag::Growth(metric) => match record.growth(metric).as_option() {
                Some(value) => MetricLine::Growth { metric, value },
                None => MetricLine::GrowthNotAvailable { metric },
            },
        }
    }

    fn render(&self, company: Company, year: i32) -> String {
        match self {
            MetricLine::Absolute { metric, value } => format!(
                "{}'s {} for FY{} {} {}.",
                company,
                metric.label(),
                year,
                metric.verb(),
                format_millions(*value)
            ),
            MetricLine::Growth { metric, value } => format!(
                "{}'s {} for FY{} was {}.",
                company,
                metric.growth_label(),
                year,
                format_pct(*value)
            ),
            MetricLine::GrowthNotAvailable { metric } => format!(
                "{}'s {} data for FY{} is not available (requires previous year's data).",
                company,
                metric.growth_label(),
                year
            ),
        }
    }
}

impl FollowUp {
    /// First matching category wins.
    pub fn choose(metrics: &[MetricTag]) -> Option<Self> {
        let any_growth = metrics.iter().any(MetricTag::is_growth);
        let has = |metric: Metric| metrics.contains(&MetricTag::Absolute(metric));

        if has(Metric::TotalRevenue) && !any_growth {
            Some(FollowUp::NetIncomeOrRevenueGrowth)
        } else if has(Metric::NetIncome) && !any_growth {
            Some(FollowUp::CashFlowOrNetIncomeGrowth)
        } else if has(Metric::TotalAssets) || has(Metric::TotalLiabilities) {
            Some(FollowUp::FinancialHealthSummary)
        } else if any_growth {
            Some(FollowUp::OtherGrowthMetrics)
        } else {
            None
        }
    }

    fn render(&self, company: Company, year: i32) -> String {
        match self {
            FollowUp::NetIncomeOrRevenueGrowth => format!(
                "Would you also like to know about {}'s net income or revenue growth for FY{}?",
                company, year
            ),
            FollowUp::CashFlowOrNetIncomeGrowth => format!(
                "Perhaps {}'s cash flow or net income growth for FY{} next?",
                company, year
            ),
            FollowUp::FinancialHealthSummary => format!(
                "Would you like a summary of {}'s overall financial health for FY{}?",
                company, year
            ),
            FollowUp::OtherGrowthMetrics => format!(
                "Would you like to know about {}'s other growth metrics or a summary of its financial health for FY{}?",
                company, year
            ),
        }
    }
}

impl YearFallback {
    pub fn notice(&self, company: Company) -> String {
        format!(
            "I couldn't find data for {} in FY{}. Displaying data for FY{} instead.",
            company, self.requested, self.substituted
        )
    }
}

fn summary_growth_line(label: &str, growth: GrowthValue) -> String {
    let value = growth
        .as_option()
        .map(format_pct)
        .unwrap_or_else(|| "N/A".to_string());
    format!("- {} (YoY): {}", label, value)
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Here's a summary of {}'s financial performance for FY{}:",
            self.company, self.year
        )?;
        writeln!(f, "- Total Revenue: {}", format_millions(self.total_revenue))?;
        writeln!(f, "- Net Income: {}", format_millions(self.net_income))?;
        writeln!(
            f,
            "- Cash Flow from Operations: {}",
            format_millions(self.operating_cash_flow)
        )?;
        match &self.growth {
            Some(growth) => {
                writeln!(f, "{}", summary_growth_line("Revenue Growth", growth.revenue))?;
                writeln!(f, "{}", summary_growth_line("Net Income Growth", growth.net_income))?;
            }
            None => writeln!(
                f,
                "Growth data for FY{} is not available (requires previous year's data in the dataset).",
                self.year
            )?,
        }
        write!(
            f,
            "\nIs there a specific metric you'd like to dive deeper into, or perhaps compare another year's performance?"
        )
    }
}

impl fmt::Display for MetricAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::with_capacity(self.lines.len() + 1);
        if let Some(fallback) = &self.fallback {
            parts.push(fallback.notice(self.company));
        }
        parts.extend(self.lines.iter().map(|l| l.render(self.company, self.year)));

        write!(f, "{}", parts.join(" "))?;
        if let Some(follow_up) = &self.follow_up {
            write!(f, "\n{}", follow_up.render(self.company, self.year))?;
        }
        Ok(())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::CompanyRequired => write!(
                f,
                "I need a company name (Microsoft, Tesla, or Apple) to provide financial insights. Please try again."
            ),
            Response::NoData { company } => write!(
                f,
                "No data available for **{}**. Please check the company name or the dataset.",
                company
            ),
            Response::Summary(summary) => fmt::Display::fmt(summary, f),
            Response::Metrics(answer) => fmt::Display::fmt(answer, f),
            Response::Unrecognized { company } => write!(
                f,
                "I'm not sure how to answer that about {}. \
                 I can tell you about its total revenue, net income, assets, liabilities, cash flow, or their growth rates. \
                 Try asking 'What is Microsoft's revenue for 2023?' or 'Summarise Apple's performance for 2022'.",
                company
            ),
        }
    }
}
