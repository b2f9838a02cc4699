use std::env;
use std::time::Duration;

use clap::Parser;
use log::warn;

pub const DEFAULT_CSV_BASE_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series";
pub const DEFAULT_WORLD_STATS_URL: &str =
    "https://www.worldometers.info/world-population/population-by-country/";
pub const CONFIRMED_FILE: &str = "time_series_covid19_confirmed_global.csv";
pub const DEATHS_FILE: &str = "time_series_covid19_deaths_global.csv";

/// (name, url) pairs shown on the status page.
pub const SOURCE_ATTRIBUTIONS: [(&str, &str); 2] = [
    (
        "COVID-19 Data Repository by the CSSE at Johns Hopkins University",
        "https://github.com/CSSEGISandData/COVID-19",
    ),
    ("Worldometer", "https://www.worldometers.info"),
];

#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Interface to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port number
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Path of the DuckDB file holding the datasets
    #[arg(long, env = "COVID_DUCKDB_PATH", default_value = "covid_stats.duckdb")]
    pub duckdb_path: String,

    /// Environment name, e.g., test, prod.  Loads `.env/<env>.env` if given.
    #[arg(short, long)]
    pub env: Option<String>,
}

/// Where the raw data comes from.
#[derive(Debug, Clone, PartialEq)]
pub struct Sources {
    pub csv_base_url: String,
    pub world_stats_url: String,
    pub fetch_timeout: Duration,
}

impl Default for Sources {
    fn default() -> Self {
        Sources {
            csv_base_url: DEFAULT_CSV_BASE_URL.to_string(),
            world_stats_url: DEFAULT_WORLD_STATS_URL.to_string(),
            fetch_timeout: Duration::from_secs(60),
        }
    }
}

impl Sources {
    /// Read `COVID_CSV_BASE_URL`, `WORLD_STATS_URL` and `FETCH_TIMEOUT_SECS`,
    /// falling back to the public sources.
    pub fn from_env() -> Sources {
        let mut sources = Sources::default();
        if let Ok(url) = env::var("COVID_CSV_BASE_URL") {
            sources.csv_base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(url) = env::var("WORLD_STATS_URL") {
            sources.world_stats_url = url;
        }
        if let Ok(secs) = env::var("FETCH_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(n) => sources.fetch_timeout = Duration::from_secs(n),
                Err(_) => warn!(
                    "ignoring FETCH_TIMEOUT_SECS={}, using {}s",
                    secs,
                    sources.fetch_timeout.as_secs()
                ),
            }
        }
        sources
    }

    pub fn csv_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.csv_base_url, file_name)
    }

    pub fn confirmed_url(&self) -> String {
        self.csv_url(CONFIRMED_FILE)
    }

    pub fn deaths_url(&self) -> String {
        self.csv_url(DEATHS_FILE)
    }
}
