use crate::db::{self, Store};
use crate::error::AppError;
use actix_web::{web, HttpResponse};
use rusqlite::Connection;
use tracker_common::model::batch::Batch;
use tracker_common::responses::ApiResponse;

/// `GET /api/batches`
pub async fn process_list(store: web::Data<Store>) -> Result<HttpResponse, AppError> {
    let batches = store.run(|conn| db::list_batches(conn)).await?;
    let count = batches.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(batches).with_count(count)))
}

/// `GET /api/batches/{id}`
pub async fn process(
    store: web::Data<Store>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    let batch = store.run(move |conn| get_batch(conn, &id)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(batch)))
}

/// `GET /api/batches/code/{batch_id}`
pub async fn process_by_code(
    store: web::Data<Store>,
    code: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let code = code.into_inner();
    let batch = store.run(move |conn| get_batch_by_code(conn, &code)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(batch)))
}

pub fn get_batch(conn: &Connection, id: &str) -> Result<Batch, AppError> {
    db::find_batch(conn, id)?.ok_or_else(|| AppError::NotFound("Batch not found".to_string()))
}

pub fn get_batch_by_code(conn: &Connection, code: &str) -> Result<Batch, AppError> {
    db::find_batch_by_code(conn, code)?
        .ok_or_else(|| AppError::NotFound("Batch not found".to_string()))
}
