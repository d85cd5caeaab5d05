use crate::dataset::TimeSeriesTable;
use crate::errors::DataError;
use crate::models::{DatasetKind, MetaResponse};
use crate::series::{AVERAGED_OFFSET, AlignedSeries};
use chrono::NaiveDate;

pub const DEFAULT_COUNTRY: &str = "Canada";
pub const MIN_SPAN_DAYS: i64 = 14;
pub const PREFERRED_START: NaiveDate = NaiveDate::from_ymd_opt(2021, 1, 1).expect("valid date");

/// One chart request. Missing bounds fall back to the edges of the series.
#[derive(Debug, Clone)]
pub struct ChartRequest {
    pub kind: DatasetKind,
    pub country: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub average: bool,
}

/// Two-column chart table: `Date` and `<Kind> cases`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chart {
    pub title: String,
    pub columns: [String; 2],
    pub rows: Vec<(NaiveDate, i64)>,
}

/// The three loaded tables. Built once at startup and only read afterwards.
#[derive(Debug)]
pub struct Dashboard {
    confirmed: TimeSeriesTable,
    deaths: TimeSeriesTable,
    recovered: TimeSeriesTable,
}

impl Dashboard {
    pub fn new(
        confirmed: TimeSeriesTable,
        deaths: TimeSeriesTable,
        recovered: TimeSeriesTable,
    ) -> Self {
        Self {
            confirmed,
            deaths,
            recovered,
        }
    }

    pub fn table(&self, kind: DatasetKind) -> &TimeSeriesTable {
        match kind {
            DatasetKind::Confirmed => &self.confirmed,
            DatasetKind::Deaths => &self.deaths,
            DatasetKind::Recovered => &self.recovered,
        }
    }

    pub fn chart(&self, request: &ChartRequest) -> Result<Chart, DataError> {
        let table = self.table(request.kind);
        let index = table.dates();
        let cumulative = table.country_series(&request.country)?;

        let series = if request.average {
            AlignedSeries::averaged(index, &cumulative)
        } else {
            AlignedSeries::daily(index, &cumulative)
        };

        let (Some(first), Some(last)) = (series.first_date(), series.last_date()) else {
            return Err(DataError::SeriesTooShort {
                country: request.country.clone(),
                dates: index.len(),
            });
        };
        let start = request.start.unwrap_or(first);
        // the daily series stops one report short of the index; a known
        // report date past the series end selects through its last value
        let end = match request.end {
            Some(date) if date > last && index.contains(&date) => last,
            Some(date) => date,
            None => last,
        };

        let rows = series.slice(index, start, end)?;
        Ok(Chart {
            title: chart_title(request.kind, &request.country, request.average),
            columns: ["Date".to_string(), request.kind.column_label()],
            rows,
        })
    }

    /// Everything the page needs to build its controls.
    pub fn meta(&self) -> MetaResponse {
        let table = self.table(DatasetKind::Confirmed);
        let dates = table.dates().to_vec();
        let countries = table.countries();

        let max_date = dates.last().copied().unwrap_or_default();
        let min_date = dates
            .get(AVERAGED_OFFSET)
            .or(dates.first())
            .copied()
            .unwrap_or_default();
        let default_start = PREFERRED_START.clamp(min_date, max_date.max(min_date));
        let default_country = if countries.iter().any(|name| name == DEFAULT_COUNTRY) {
            DEFAULT_COUNTRY.to_string()
        } else {
            countries.first().cloned().unwrap_or_default()
        };

        MetaResponse {
            countries,
            kinds: DatasetKind::ALL.to_vec(),
            dates,
            min_date,
            max_date,
            default_country,
            default_start,
            default_average: true,
            min_span_days: MIN_SPAN_DAYS,
        }
    }
}

pub fn chart_title(kind: DatasetKind, country: &str, average: bool) -> String {
    let kind = kind.label().to_lowercase();
    if average {
        format!("Seven day average for {kind} cases in {country}")
    } else {
        format!("Daily {kind} cases in {country}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::SAMPLE;

    const LONG: &str = "\
Province/State,Country/Region,Lat,Long,12/28/20,12/29/20,12/30/20,12/31/20,1/1/21,1/2/21,1/3/21,1/4/21,1/5/21,1/6/21
,Peru,-9.2,-75.0,0,1,3,6,10,15,21,28,36,45
";

    fn table(kind: DatasetKind, csv: &str) -> TimeSeriesTable {
        TimeSeriesTable::from_reader(kind, csv.as_bytes()).unwrap()
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(
            table(DatasetKind::Confirmed, LONG),
            table(DatasetKind::Deaths, LONG),
            table(DatasetKind::Recovered, SAMPLE),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn averaged_chart_over_full_range() {
        let chart = dashboard()
            .chart(&ChartRequest {
                kind: DatasetKind::Confirmed,
                country: "Peru".into(),
                start: None,
                end: None,
                average: true,
            })
            .unwrap();
        assert_eq!(chart.title, "Seven day average for confirmed cases in Peru");
        assert_eq!(chart.columns, ["Date".to_string(), "Confirmed cases".to_string()]);
        // daily = 1..=9, windows ending on 1/4, 1/5, 1/6
        assert_eq!(
            chart.rows,
            vec![
                (date(2021, 1, 4), 4),
                (date(2021, 1, 5), 5),
                (date(2021, 1, 6), 6),
            ]
        );
    }

    #[test]
    fn daily_chart_respects_bounds() {
        let chart = dashboard()
            .chart(&ChartRequest {
                kind: DatasetKind::Deaths,
                country: "Peru".into(),
                start: Some(date(2020, 12, 30)),
                end: Some(date(2021, 1, 1)),
                average: false,
            })
            .unwrap();
        assert_eq!(chart.title, "Daily deaths cases in Peru");
        assert_eq!(chart.columns[1], "Deaths cases");
        assert_eq!(
            chart.rows,
            vec![
                (date(2020, 12, 30), 3),
                (date(2020, 12, 31), 4),
                (date(2021, 1, 1), 5),
            ]
        );
    }

    #[test]
    fn averaged_start_before_window_is_rejected() {
        let err = dashboard()
            .chart(&ChartRequest {
                kind: DatasetKind::Confirmed,
                country: "Peru".into(),
                start: Some(date(2020, 12, 28)),
                end: Some(date(2021, 1, 6)),
                average: true,
            })
            .unwrap_err();
        assert!(matches!(err, DataError::DateNotFound(d) if d == date(2020, 12, 28)));
    }

    #[test]
    fn unknown_country_is_not_an_empty_chart() {
        let err = dashboard()
            .chart(&ChartRequest {
                kind: DatasetKind::Recovered,
                country: "Peru".into(),
                start: None,
                end: None,
                average: false,
            })
            .unwrap_err();
        assert!(matches!(err, DataError::CountryNotFound { kind: DatasetKind::Recovered, .. }));
    }

    #[test]
    fn too_short_for_averaging_is_reported_as_such() {
        let err = dashboard()
            .chart(&ChartRequest {
                kind: DatasetKind::Recovered,
                country: "Canada".into(),
                start: None,
                end: None,
                average: true,
            })
            .unwrap_err();
        assert!(matches!(
            err,
            DataError::SeriesTooShort { ref country, dates: 4 } if country == "Canada"
        ));
    }

    #[test]
    fn daily_chart_accepts_last_report_date_as_end() {
        let dashboard = dashboard();
        let meta = dashboard.meta();
        let chart = dashboard
            .chart(&ChartRequest {
                kind: DatasetKind::Confirmed,
                country: "Peru".into(),
                start: Some(meta.min_date),
                end: Some(meta.max_date),
                average: false,
            })
            .unwrap();
        // daily labels stop at 1/5; 1/6 closes the last difference
        assert_eq!(
            chart.rows,
            vec![(date(2021, 1, 4), 8), (date(2021, 1, 5), 9)]
        );
    }

    #[test]
    fn end_outside_index_is_still_rejected() {
        let err = dashboard()
            .chart(&ChartRequest {
                kind: DatasetKind::Confirmed,
                country: "Peru".into(),
                start: Some(date(2021, 1, 4)),
                end: Some(date(2021, 1, 7)),
                average: false,
            })
            .unwrap_err();
        assert!(matches!(err, DataError::DateNotFound(d) if d == date(2021, 1, 7)));
    }

    #[test]
    fn meta_describes_controls() {
        let meta = dashboard().meta();
        assert_eq!(meta.countries, vec!["Peru"]);
        assert_eq!(meta.default_country, "Peru");
        assert_eq!(meta.dates.len(), 10);
        assert_eq!(meta.min_date, date(2021, 1, 4));
        assert_eq!(meta.max_date, date(2021, 1, 6));
        assert_eq!(meta.default_start, date(2021, 1, 4));
        assert!(meta.default_average);
        assert_eq!(meta.min_span_days, MIN_SPAN_DAYS);
    }
}
