use actix_web::{post, web, HttpResponse, Responder};
use log::error;

use crate::pipeline::Pipeline;

/// Download the raw sources and overwrite the source dataset.  Meant to be
/// called by a scheduler.
#[post("/update-source")]
async fn update_source(pipeline: web::Data<Pipeline>) -> impl Responder {
    let pipeline = pipeline.into_inner();
    let res = web::block(move || pipeline.update_source()).await;
    match res {
        Ok(Ok(())) => HttpResponse::Ok().finish(),
        Ok(Err(e)) => {
            error!("update-source failed: {}", e);
            HttpResponse::InternalServerError().body(e.to_string())
        }
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

/// Recompute the output dataset from the source dataset.
#[post("/update-output")]
async fn update_output(pipeline: web::Data<Pipeline>) -> impl Responder {
    let pipeline = pipeline.into_inner();
    let res = web::block(move || pipeline.update_output()).await;
    match res {
        Ok(Ok(())) => HttpResponse::Ok().finish(),
        Ok(Err(e)) => {
            error!("update-output failed: {}", e);
            HttpResponse::InternalServerError().body(e.to_string())
        }
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}
