//! Country-by-date time-series tables in the Johns Hopkins CSSE layout.
//!
//! Each file has four leading metadata columns (`Province/State`,
//! `Country/Region`, `Lat`, `Long`) followed by one column per report date in
//! `M/D/YY` form. Cells hold cumulative counts for one region.

use crate::errors::DataError;
use crate::models::DatasetKind;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::io::Read;
use tracing::{debug, warn};

const PROVINCE_COLUMN: usize = 0;
const COUNTRY_COLUMN: usize = 1;
const METADATA_COLUMNS: usize = 4;
const DATE_FORMAT: &str = "%m/%d/%y";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRow {
    pub province: Option<String>,
    pub country: String,
    pub values: Vec<i64>,
}

/// One loaded file. Immutable after construction; every row carries exactly
/// one value per date column.
#[derive(Debug, Clone)]
pub struct TimeSeriesTable {
    kind: DatasetKind,
    dates: Vec<NaiveDate>,
    rows: Vec<RegionRow>,
    skipped_rows: usize,
}

impl TimeSeriesTable {
    /// Parses a whole CSV document. A bad header fails the load; bad data
    /// rows are logged and skipped.
    pub fn from_reader<R: Read>(kind: DatasetKind, reader: R) -> Result<Self, DataError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let dates = parse_header(rdr.headers()?)?;
        let expected_len = METADATA_COLUMNS + dates.len();

        let mut rows = Vec::new();
        let mut skipped_rows = 0;
        for (idx, record) in rdr.records().enumerate() {
            // header occupies line 1
            let lineno = idx + 2;
            let record = match record {
                Ok(record) => record,
                Err(err) => {
                    warn!(%kind, lineno, "skipping unreadable row: {err}");
                    skipped_rows += 1;
                    continue;
                }
            };
            match parse_row(&record, expected_len) {
                Ok(row) => rows.push(row),
                Err(reason) => {
                    warn!(%kind, lineno, "skipping malformed row: {reason}");
                    skipped_rows += 1;
                }
            }
        }

        debug!(%kind, rows = rows.len(), dates = dates.len(), skipped_rows, "parsed time series");
        Ok(Self {
            kind,
            dates,
            rows,
            skipped_rows,
        })
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    /// Report dates, parallel to each row's values.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rows(&self) -> &[RegionRow] {
        &self.rows
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Distinct country names in sorted order.
    pub fn countries(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.country.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Cumulative series for a country: the element-wise sum of all of its
    /// regional rows.
    pub fn country_series(&self, country: &str) -> Result<Vec<i64>, DataError> {
        let mut matched = self
            .rows
            .iter()
            .filter(|row| row.country == country)
            .peekable();
        if matched.peek().is_none() {
            return Err(DataError::CountryNotFound {
                country: country.to_string(),
                kind: self.kind,
            });
        }

        let mut total = vec![0i64; self.dates.len()];
        for row in matched {
            for (sum, value) in total.iter_mut().zip(&row.values) {
                *sum = sum.saturating_add(*value);
            }
        }
        Ok(total)
    }
}

fn parse_header(header: &csv::StringRecord) -> Result<Vec<NaiveDate>, DataError> {
    if header.len() <= METADATA_COLUMNS {
        return Err(DataError::MissingDates);
    }
    header
        .iter()
        .skip(METADATA_COLUMNS)
        .map(|column| {
            NaiveDate::parse_from_str(column.trim(), DATE_FORMAT)
                .map_err(|_| DataError::InvalidDateColumn(column.to_string()))
        })
        .collect()
}

fn parse_row(record: &csv::StringRecord, expected_len: usize) -> Result<RegionRow, String> {
    if record.len() != expected_len {
        return Err(format!("expected {expected_len} fields, found {}", record.len()));
    }

    let country = record.get(COUNTRY_COLUMN).unwrap_or_default().trim();
    if country.is_empty() {
        return Err("missing country".to_string());
    }
    let province = record
        .get(PROVINCE_COLUMN)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned);

    let values = record
        .iter()
        .skip(METADATA_COLUMNS)
        .map(|cell| {
            cell.trim()
                .parse::<i64>()
                .map_err(|_| format!("invalid count '{cell}'"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RegionRow {
        province,
        country: country.to_string(),
        values,
    })
}
