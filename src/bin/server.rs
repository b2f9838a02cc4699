use std::path::Path;
use std::sync::Arc;

use actix_web::middleware::{self, Logger};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use clap::Parser;
use covid_stats::api::{jobs, status};
use covid_stats::config::{Args, Sources};
use covid_stats::country::RegexCountryResolver;
use covid_stats::db::duck_warehouse::DuckWarehouse;
use covid_stats::fetch::HttpSource;
use covid_stats::pipeline::Pipeline;
use env_logger::Env;
use log::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    if let Some(env) = &args.env {
        dotenvy::from_path(Path::new(format!(".env/{}.env", env).as_str()))
            .map_err(std::io::Error::other)?;
    }

    let sources = Sources::from_env();
    let warehouse = DuckWarehouse::open(&args.duckdb_path).map_err(std::io::Error::other)?;
    let http = HttpSource::new(sources.fetch_timeout).map_err(std::io::Error::other)?;
    let pipeline = Data::new(Pipeline::new(
        Arc::new(http),
        Arc::new(warehouse),
        Arc::new(RegexCountryResolver),
        sources,
    ));

    info!("listening on {}:{}", args.host, args.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(middleware::Compress::default())
            .app_data(pipeline.clone())
            .service(status::index)
            .service(jobs::update_source)
            .service(jobs::update_output)
    })
    .bind((args.host.as_str(), args.port))?
    .run()
    .await
}
