use crate::dashboard::Dashboard;
use crate::dataset::TimeSeriesTable;
use crate::errors::LoadError;
use crate::models::DatasetKind;
use std::{env, fmt, path::PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

const JHU_BASE_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl DataSource {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value.to_string())
        } else {
            Self::Path(PathBuf::from(value))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// File name used by the upstream repository for each dataset.
pub fn file_name(kind: DatasetKind) -> &'static str {
    match kind {
        DatasetKind::Confirmed => "time_series_covid19_confirmed_global.csv",
        DatasetKind::Deaths => "time_series_covid19_deaths_global.csv",
        DatasetKind::Recovered => "time_series_covid19_recovered_global.csv",
    }
}

fn override_var(kind: DatasetKind) -> &'static str {
    match kind {
        DatasetKind::Confirmed => "COVID_CONFIRMED_CSV",
        DatasetKind::Deaths => "COVID_DEATHS_CSV",
        DatasetKind::Recovered => "COVID_RECOVERED_CSV",
    }
}

pub fn resolve_source(kind: DatasetKind) -> DataSource {
    resolve_source_from(kind, |name| env::var(name).ok())
}

/// Per-dataset override, then `COVID_DATA_DIR`, then the upstream URL.
pub fn resolve_source_from(
    kind: DatasetKind,
    lookup: impl Fn(&str) -> Option<String>,
) -> DataSource {
    if let Some(value) = lookup(override_var(kind)).filter(|value| !value.trim().is_empty()) {
        return DataSource::parse(&value);
    }
    if let Some(dir) = lookup("COVID_DATA_DIR").filter(|value| !value.trim().is_empty()) {
        return DataSource::Path(PathBuf::from(dir).join(file_name(kind)));
    }
    DataSource::Url(format!("{JHU_BASE_URL}{}", file_name(kind)))
}

pub async fn fetch_source(source: &DataSource) -> Result<Vec<u8>, LoadError> {
    match source {
        DataSource::Path(path) => fs::read(path).await.map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        }),
        DataSource::Url(url) => fetch_url(url).await.map_err(|source| LoadError::Http {
            url: url.clone(),
            source,
        }),
    }
}

async fn fetch_url(url: &str) -> Result<Vec<u8>, reqwest::Error> {
    let response = reqwest::get(url).await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

pub async fn load_table(kind: DatasetKind, source: &DataSource) -> Result<TimeSeriesTable, LoadError> {
    let bytes = fetch_source(source).await.inspect_err(|err| error!("{err}"))?;
    let table = TimeSeriesTable::from_reader(kind, bytes.as_slice())
        .map_err(|source| LoadError::Parse { kind, source })?;

    if table.skipped_rows() > 0 {
        warn!(%kind, skipped = table.skipped_rows(), "some rows were skipped");
    }
    info!(
        %kind,
        %source,
        rows = table.rows().len(),
        dates = table.dates().len(),
        "loaded time series"
    );
    Ok(table)
}

/// Loads all three datasets. Called once before the server starts.
pub async fn load_dashboard() -> Result<Dashboard, LoadError> {
    let confirmed = resolve_source(DatasetKind::Confirmed);
    let deaths = resolve_source(DatasetKind::Deaths);
    let recovered = resolve_source(DatasetKind::Recovered);

    let (confirmed, deaths, recovered) = tokio::try_join!(
        load_table(DatasetKind::Confirmed, &confirmed),
        load_table(DatasetKind::Deaths, &deaths),
        load_table(DatasetKind::Recovered, &recovered),
    )?;
    Ok(Dashboard::new(confirmed, deaths, recovered))
}
