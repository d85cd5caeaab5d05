use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    #[default]
    Confirmed,
    Deaths,
    Recovered,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [Self::Confirmed, Self::Deaths, Self::Recovered];

    pub fn label(self) -> &'static str {
        match self {
            Self::Confirmed => "Confirmed",
            Self::Deaths => "Deaths",
            Self::Recovered => "Recovered",
        }
    }

    /// Name of the value column in chart output, e.g. `Deaths cases`.
    pub fn column_label(self) -> String {
        format!("{} cases", self.label())
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn default_average() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartQuery {
    #[serde(default)]
    pub kind: DatasetKind,
    pub country: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    #[serde(default = "default_average")]
    pub average: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub value: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChartResponse {
    pub title: String,
    pub kind: DatasetKind,
    pub country: String,
    pub averaged: bool,
    pub columns: [String; 2],
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaResponse {
    pub countries: Vec<String>,
    pub kinds: Vec<DatasetKind>,
    pub dates: Vec<NaiveDate>,
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub default_country: String,
    pub default_start: NaiveDate,
    pub default_average: bool,
    pub min_span_days: i64,
}
