use actix_web::http::header::ContentType;
use actix_web::{get, web, HttpResponse, Responder};
use build_html::{Container, ContainerType, Html, HtmlContainer, HtmlPage};
use itertools::Itertools;
use jiff::civil::Date;

use crate::config::SOURCE_ATTRIBUTIONS;
use crate::pipeline::{Pipeline, Run};

/// Status page: date of the latest observation and where the data comes
/// from.
#[get("/")]
async fn index(pipeline: web::Data<Pipeline>) -> impl Responder {
    let pipeline = pipeline.into_inner();
    let res = web::block(move || pipeline.last_update().map(|date| (date, pipeline.runs()))).await;
    match res {
        Ok(Ok((date, runs))) => HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(render_index(date, &runs)),
        Ok(Err(e)) => HttpResponse::InternalServerError().body(e.to_string()),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub fn render_index(last_update: Date, runs: &[Run]) -> String {
    let mut sources = Container::new(ContainerType::UnorderedList);
    for (name, url) in SOURCE_ATTRIBUTIONS {
        sources.add_link(url, name);
    }

    let mut page = HtmlPage::new()
        .with_title("COVID-19 stats")
        .with_header(1, "COVID-19 stats")
        .with_paragraph(format!("Last update: {}", last_update))
        .with_header(2, "Sources")
        .with_container(sources);

    if !runs.is_empty() {
        let mut table = build_html::Table::new();
        table.add_header_row(vec!["Job", "Stage", "History"]);
        for run in runs.iter().rev() {
            table.add_body_row(vec![
                run.job.clone(),
                run.stage().to_string(),
                run.history().iter().join(" > "),
            ]);
        }
        page.add_header(2, "Recent jobs");
        page.add_table(table);
    }
    page.to_html_string()
}
