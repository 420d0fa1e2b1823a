use chrono::NaiveDate;
use serde::Serialize;
use tabled::Tabled;

use crate::classify::EntityLabel;
use crate::util::{display_amount, display_pct};

/// Raw wide-format table as read from disk: one header row and string cells.
#[derive(Debug, Clone, Default)]
pub struct WideTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub fn from_token(token: &str) -> Option<Quarter> {
        match token {
            "Q1" => Some(Quarter::Q1),
            "Q2" => Some(Quarter::Q2),
            "Q3" => Some(Quarter::Q3),
            "Q4" => Some(Quarter::Q4),
            _ => None,
        }
    }

    /// Last calendar month of the quarter.
    pub fn end_month(self) -> u32 {
        match self {
            Quarter::Q1 => 3,
            Quarter::Q2 => 6,
            Quarter::Q3 => 9,
            Quarter::Q4 => 12,
        }
    }
}

/// One value per entity x industry x gas x period after reshaping.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionRecord {
    pub country: String,
    pub industry: String,
    pub gas_type: String,
    pub unit: String,
    pub period: String,
    pub emissions: f64,
    pub year: i32,
    /// `None` when the quarter token was not one of `Q1..Q4`.
    pub quarter: Option<Quarter>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct DatedTotal {
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Emissions")]
    #[tabled(rename = "Emissions", display_with = "display_amount")]
    pub emissions: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct EntityTotal {
    #[serde(rename = "Entity")]
    #[tabled(rename = "Entity")]
    pub entity: String,
    #[serde(rename = "Emissions")]
    #[tabled(rename = "Emissions", display_with = "display_amount")]
    pub emissions: f64,
}

/// A `(date, category, sum)` row; used for industry and entity trends.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct TrendRow {
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Key")]
    #[tabled(rename = "Key")]
    pub key: String,
    #[serde(rename = "Emissions")]
    #[tabled(rename = "Emissions", display_with = "display_amount")]
    pub emissions: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct PctChangeRow {
    #[serde(rename = "Entity")]
    #[tabled(rename = "Entity")]
    pub entity: String,
    #[serde(rename = "Base")]
    #[tabled(rename = "Base", display_with = "display_amount")]
    pub base: f64,
    #[serde(rename = "Comp")]
    #[tabled(rename = "Comp", display_with = "display_amount")]
    pub comp: f64,
    #[serde(rename = "PctChange")]
    #[tabled(rename = "PctChange", display_with = "display_pct")]
    pub pct_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct EntityLabelRow {
    #[serde(rename = "Entity")]
    #[tabled(rename = "Entity")]
    pub entity: String,
    #[serde(rename = "Label")]
    #[tabled(rename = "Label")]
    pub label: EntityLabel,
}

#[derive(Debug, Serialize)]
pub struct ViewSummary {
    pub title: String,
    pub file: String,
    pub rows: usize,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub total_records: usize,
    pub unit_label: String,
    pub use_countries: bool,
    pub latest_country_period: Option<String>,
    pub latest_region_period: Option<String>,
    pub base_year: i32,
    pub compare_year: i32,
    pub total_emissions: f64,
    pub views: Vec<ViewSummary>,
}
