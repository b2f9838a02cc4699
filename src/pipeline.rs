//! Sequence the ingestion and the derived-table jobs.
//!
//! `update_source` downloads both raw sources and overwrites the tables of
//! the `source` dataset.  `update_output` recomputes the `output` dataset
//! with SQL that runs inside the warehouse.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use jiff::civil::Date;
use log::{error, info, warn};

use crate::config::Sources;
use crate::country::{add_country_codes, CountryResolver};
use crate::db::warehouse::{
    CreateDisposition, LoadConfig, LoadJob, QueryConfig, Warehouse, WriteDisposition,
};
use crate::error::{EtlError, Result};
use crate::fetch::{fetch_csv, fetch_html_table, SourceClient};
use crate::frame::Value;
use crate::normalize::{
    ensure_unique, join_on, normalize_world_stats, unpivot_time_series, DAILY_JOIN_KEYS,
    DAILY_STATS, DAILY_UNIQUE_KEYS, WORLD_NAME_COLUMN, WORLD_STATS,
};

pub const SOURCE_DATASET: &str = "source";
pub const OUTPUT_DATASET: &str = "output";
pub const DAILY_STATS_TABLE: &str = "daily_stats";
pub const WORLD_STATS_TABLE: &str = "world_stats";
pub const DAYS_AFTER_NTH_CASE_TABLE: &str = "days_after_nth_case";

/// Number of finished runs kept in memory.
const MAX_HISTORY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Pending,
    Extracting,
    Transforming,
    Loading,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Pending => "pending",
            Stage::Extracting => "extracting",
            Stage::Transforming => "transforming",
            Stage::Loading => "loading",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// One execution of a job and the stages it went through.
///
/// Every job moves `Pending -> Extracting -> Transforming -> Loading ->
/// Done`.  For query jobs extracting means reading the input tables, and the
/// transform and the write are one warehouse job.  Any error ends the run in
/// `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub job: String,
    history: Vec<Stage>,
}

impl Run {
    pub fn new(job: &str) -> Run {
        Run {
            job: job.to_string(),
            history: vec![Stage::Pending],
        }
    }

    pub fn stage(&self) -> Stage {
        *self.history.last().unwrap_or(&Stage::Pending)
    }

    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.stage(), Stage::Done | Stage::Failed)
    }

    fn advance(&mut self, next: Stage) {
        info!("{}: {} -> {}", self.job, self.stage(), next);
        self.history.push(next);
    }

    fn complete<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.advance(Stage::Done),
            Err(e) => {
                error!("{} failed while {}: {}", self.job, self.stage(), e);
                self.advance(Stage::Failed);
            }
        }
        result
    }
}

pub struct Pipeline {
    source: Arc<dyn SourceClient>,
    warehouse: Arc<dyn Warehouse>,
    resolver: Arc<dyn CountryResolver>,
    sources: Sources,
    runs: Mutex<Vec<Run>>,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn SourceClient>,
        warehouse: Arc<dyn Warehouse>,
        resolver: Arc<dyn CountryResolver>,
        sources: Sources,
    ) -> Pipeline {
        Pipeline {
            source,
            warehouse,
            resolver,
            sources,
            runs: Mutex::new(Vec::new()),
        }
    }

    /// Refresh both tables of the source dataset.  Stops at the first
    /// failure.
    pub fn update_source(&self) -> Result<()> {
        self.ingest_daily_stats()?;
        self.ingest_world_stats()?;
        Ok(())
    }

    /// Recompute the output dataset from the source dataset.
    pub fn update_output(&self) -> Result<()> {
        self.query_job(
            &format!("{}.{}", OUTPUT_DATASET, DAILY_STATS_TABLE),
            &[
                (SOURCE_DATASET, DAILY_STATS_TABLE),
                (SOURCE_DATASET, WORLD_STATS_TABLE),
            ],
            || self.compute_daily_stats(),
        )?;
        self.query_job(
            &format!("{}.{}", OUTPUT_DATASET, DAYS_AFTER_NTH_CASE_TABLE),
            &[(OUTPUT_DATASET, DAILY_STATS_TABLE)],
            || self.compute_days_after_nth_case(),
        )?;
        Ok(())
    }

    /// Latest date in `source.daily_stats`.
    pub fn last_update(&self) -> Result<Date> {
        let query = format!(
            "SELECT max(date) AS date FROM {}",
            self.warehouse
                .get_table_ref(SOURCE_DATASET, DAILY_STATS_TABLE)
                .sql()
        );
        let config = QueryConfig {
            use_query_cache: false,
            ..QueryConfig::default()
        };
        let frame = self
            .warehouse
            .run_query(&query, &config)?
            .ok_or_else(|| EtlError::Empty("the last update query returned nothing".to_string()))?;
        frame
            .value("date", 0)
            .and_then(Value::as_date)
            .ok_or_else(|| EtlError::Empty("source.daily_stats has no rows".to_string()))
    }

    /// Finished runs, oldest first.
    pub fn runs(&self) -> Vec<Run> {
        self.lock_runs().clone()
    }

    /// Confirmed cases and deaths per region and day, with country codes.
    pub fn ingest_daily_stats(&self) -> Result<LoadJob> {
        let mut run = Run::new(&format!("{}.{}", SOURCE_DATASET, DAILY_STATS_TABLE));
        let result = self.daily_stats_steps(&mut run);
        let result = run.complete(result);
        self.record(run);
        result
    }

    /// Population table, with country codes.
    pub fn ingest_world_stats(&self) -> Result<LoadJob> {
        let mut run = Run::new(&format!("{}.{}", SOURCE_DATASET, WORLD_STATS_TABLE));
        let result = self.world_stats_steps(&mut run);
        let result = run.complete(result);
        self.record(run);
        result
    }

    fn daily_stats_steps(&self, run: &mut Run) -> Result<LoadJob> {
        run.advance(Stage::Extracting);
        let confirmed = fetch_csv(self.source.as_ref(), &self.sources.confirmed_url())?;
        let deaths = fetch_csv(self.source.as_ref(), &self.sources.deaths_url())?;

        run.advance(Stage::Transforming);
        let confirmed = unpivot_time_series(&confirmed, "confirmed")?;
        let deaths = unpivot_time_series(&deaths, "deaths")?;
        let mut frame = join_on(&confirmed, &deaths, &DAILY_JOIN_KEYS)?;
        if frame.height() < confirmed.height() {
            info!(
                "{} confirmed rows have no matching deaths row",
                confirmed.height() - frame.height()
            );
        }
        add_country_codes(&mut frame, "country_region", self.resolver.as_ref())?;
        ensure_unique(&frame, &DAILY_UNIQUE_KEYS)?;
        DAILY_STATS.check(&frame)?;

        run.advance(Stage::Loading);
        let config = LoadConfig {
            partition: Some("date".to_string()),
            clustering_fields: vec!["country_region".to_string(), "province_state".to_string()],
            create_disposition: CreateDisposition::CreateIfNeeded,
            write_disposition: WriteDisposition::WriteTruncate,
        };
        self.warehouse
            .load_table(SOURCE_DATASET, DAILY_STATS_TABLE, &frame, &config)
    }

    fn world_stats_steps(&self, run: &mut Run) -> Result<LoadJob> {
        run.advance(Stage::Extracting);
        let raw = fetch_html_table(self.source.as_ref(), &self.sources.world_stats_url)?;

        run.advance(Stage::Transforming);
        let mut frame = normalize_world_stats(raw)?;
        add_country_codes(&mut frame, WORLD_NAME_COLUMN, self.resolver.as_ref())?;
        WORLD_STATS.check(&frame)?;

        run.advance(Stage::Loading);
        let config = LoadConfig {
            create_disposition: CreateDisposition::CreateIfNeeded,
            write_disposition: WriteDisposition::WriteTruncate,
            ..LoadConfig::default()
        };
        self.warehouse
            .load_table(SOURCE_DATASET, WORLD_STATS_TABLE, &frame, &config)
    }

    fn query_job<F>(&self, job: &str, inputs: &[(&str, &str)], f: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        let mut run = Run::new(job);
        let result = self.query_steps(&mut run, inputs, f);
        let result = run.complete(result);
        self.record(run);
        result
    }

    fn query_steps<F>(&self, run: &mut Run, inputs: &[(&str, &str)], f: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        run.advance(Stage::Extracting);
        for (dataset, table) in inputs {
            let input = self.warehouse.get_table_ref(dataset, table);
            let query = format!("SELECT count(*) AS n FROM {}", input.sql());
            let rows = self
                .warehouse
                .run_query(&query, &QueryConfig::default())?
                .and_then(|frame| frame.value("n", 0).and_then(Value::as_f64))
                .unwrap_or(0.0);
            info!("{}: reading {} rows of {}", run.job, rows, input);
        }

        run.advance(Stage::Transforming);
        run.advance(Stage::Loading);
        f()
    }

    /// Day over day growth per region, growth rates and growth per million
    /// inhabitants.  Regions without a population row are dropped.
    fn compute_daily_stats(&self) -> Result<()> {
        let query = r#"
SELECT
    daily_stats.*,
    CASE WHEN prev_confirmed > 0 THEN round(confirmed_growth / prev_confirmed, 2) ELSE NULL END AS confirmed_growth_rate,
    CASE WHEN prev_deaths > 0 THEN round(deaths_growth / prev_deaths, 2) ELSE NULL END AS deaths_growth_rate,
    world_stats.population,
    confirmed_growth / world_stats.population * 1000000 AS confirmed_growth_per_million,
    deaths_growth / world_stats.population * 1000000 AS deaths_growth_per_million
FROM (
    SELECT
        *,
        confirmed - prev_confirmed AS confirmed_growth,
        deaths - prev_deaths AS deaths_growth
    FROM (
        SELECT
            *,
            COALESCE(lag(confirmed) OVER (PARTITION BY country_region, province_state ORDER BY date), 0) AS prev_confirmed,
            COALESCE(lag(deaths) OVER (PARTITION BY country_region, province_state ORDER BY date), 0) AS prev_deaths
        FROM source.daily_stats
    )
) AS daily_stats
JOIN source.world_stats AS world_stats
USING (country_code)
        "#;
        let config = QueryConfig {
            partition: Some("date".to_string()),
            clustering_fields: vec!["country_region".to_string(), "province_state".to_string()],
            destination: Some(
                self.warehouse
                    .get_table_ref(OUTPUT_DATASET, DAILY_STATS_TABLE),
            ),
            create_disposition: CreateDisposition::CreateIfNeeded,
            write_disposition: WriteDisposition::WriteTruncate,
            use_query_cache: false,
        };
        self.warehouse.run_query(query, &config)?;
        Ok(())
    }

    /// Country totals from the first day with at least 100 confirmed cases
    /// on.  `days_after_nth_case` counts qualifying days, not calendar days.
    fn compute_days_after_nth_case(&self) -> Result<()> {
        let query = r#"
SELECT
    *,
    row_number() OVER (PARTITION BY country_region ORDER BY date) AS days_after_nth_case
FROM (
    SELECT
        country_region,
        date,
        sum(confirmed) AS confirmed,
        sum(deaths) AS deaths
    FROM output.daily_stats
    GROUP BY country_region, date
    HAVING sum(confirmed) >= 100
)
        "#;
        let config = QueryConfig {
            destination: Some(
                self.warehouse
                    .get_table_ref(OUTPUT_DATASET, DAYS_AFTER_NTH_CASE_TABLE),
            ),
            create_disposition: CreateDisposition::CreateIfNeeded,
            write_disposition: WriteDisposition::WriteTruncate,
            use_query_cache: false,
            ..QueryConfig::default()
        };
        self.warehouse.run_query(query, &config)?;
        Ok(())
    }

    fn record(&self, run: Run) {
        let mut runs = self.lock_runs();
        if runs.len() == MAX_HISTORY {
            runs.remove(0);
        }
        runs.push(run);
    }

    /// The history is only ever appended to, so it stays usable after a
    /// panic in another thread.
    fn lock_runs(&self) -> MutexGuard<'_, Vec<Run>> {
        self.runs.lock().unwrap_or_else(|e: PoisonError<_>| {
            warn!("run history lock was poisoned, recovering it");
            e.into_inner()
        })
    }
}
