//! Download the raw sources and turn them into frames.

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, info};
use reqwest::{
    blocking::Client,
    header::{ACCEPT, USER_AGENT},
    StatusCode,
};
use scraper::{ElementRef, Html, Selector};

use crate::error::{EtlError, Result};
use crate::frame::{Frame, Value};

/// Anything that can hand back the body of a url.
pub trait SourceClient: Send + Sync {
    fn get_text(&self, url: &str) -> Result<String>;
}

/// Blocking http client.  Call it from a blocking thread, never from an
/// async task.
pub struct HttpSource {
    pub timeout: Duration,
    pub user_agent: String,
    client: Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<HttpSource> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(EtlError::HttpClient)?;
        Ok(HttpSource {
            timeout,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string(),
            client,
        })
    }
}

impl SourceClient for HttpSource {
    fn get_text(&self, url: &str) -> Result<String> {
        let to_fetch_error = |source| EtlError::Fetch {
            url: url.to_string(),
            source,
        };
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "text/html,text/csv,*/*")
            .send()
            .map_err(to_fetch_error)?;
        if response.status() != StatusCode::OK {
            return Err(EtlError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        let body = response.text().map_err(to_fetch_error)?;
        info!("downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

/// Serves canned bodies keyed by url.
#[derive(Default)]
pub struct StaticSource {
    pages: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> StaticSource {
        StaticSource::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> StaticSource {
        self.pages.insert(url.into(), body.into());
        self
    }
}

impl SourceClient for StaticSource {
    fn get_text(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| EtlError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
    }
}

pub fn fetch_csv(client: &dyn SourceClient, url: &str) -> Result<Frame> {
    let body = client.get_text(url)?;
    parse_csv(&body)
}

pub fn fetch_html_table(client: &dyn SourceClient, url: &str) -> Result<Frame> {
    let body = client.get_text(url)?;
    parse_html_table(&body, url)
}

/// First record holds the labels.  Empty cells become nulls, every other
/// cell stays a string.
pub fn parse_csv(body: &str) -> Result<Frame> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body.as_bytes());
    let labels: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    let mut rows: Vec<Vec<Value>> = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|cell| {
                    if cell.is_empty() {
                        Value::Null
                    } else {
                        Value::Str(cell.to_string())
                    }
                })
                .collect(),
        );
    }
    debug!("parsed csv with {} columns and {} rows", labels.len(), rows.len());
    Ok(Frame::from_rows(labels, rows)?)
}

/// Scrape the rows of an html page.  The first `<tr>` must carry the `<th>`
/// labels and every other row exactly one `<td>` per label.
pub fn parse_html_table(html: &str, url: &str) -> Result<Frame> {
    let structure_error = |reason: String| EtlError::PageStructure {
        url: url.to_string(),
        reason,
    };

    let row_sel = Selector::parse("tr").expect("Invalid CSS selector for rows");
    let th_sel = Selector::parse("th").expect("Invalid CSS selector for header cells");
    let td_sel = Selector::parse("td").expect("Invalid CSS selector for data cells");

    let doc = Html::parse_document(html);
    let rows: Vec<ElementRef> = doc.select(&row_sel).collect();
    let (head, body) = rows
        .split_first()
        .ok_or_else(|| structure_error("no table rows found".to_string()))?;

    let labels: Vec<String> = head.select(&th_sel).map(cell_text).collect();
    if labels.is_empty() {
        return Err(structure_error(
            "the first table row has no header cells".to_string(),
        ));
    }
    if body.is_empty() {
        return Err(structure_error("the table has no data rows".to_string()));
    }

    let mut data: Vec<Vec<Value>> = Vec::with_capacity(body.len());
    for (i, row) in body.iter().enumerate() {
        let cells: Vec<Value> = row
            .select(&td_sel)
            .map(|cell| Value::Str(cell_text(cell)))
            .collect();
        if cells.len() != labels.len() {
            return Err(structure_error(format!(
                "row {} has {} cells but the header has {} labels",
                i + 1,
                cells.len(),
                labels.len()
            )));
        }
        data.push(cells);
    }
    Ok(Frame::from_rows(labels, data)?)
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}
