use crate::db::{self, Store};
use crate::error::{is_unique_violation, AppError};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use log::info;
use rusqlite::{params, Connection};
use tracker_common::model::batch::Batch;
use tracker_common::requests::CreateBatchRequest;
use tracker_common::responses::ApiResponse;

/// Actix handler for `POST /api/batches`.
pub async fn process(
    store: web::Data<Store>,
    payload: web::Json<CreateBatchRequest>,
) -> Result<HttpResponse, AppError> {
    let req = payload.into_inner();
    let batch = store
        .run(move |conn| create_batch(conn, &req, Utc::now()))
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(batch)))
}

/// Stores a new batch and its schedule in one transaction.
///
/// The batch code and description are trimmed and must not be empty. A code
/// already in use is reported as [`AppError::Duplicate`]; the unique index on
/// the code makes that decision, so two concurrent creations cannot both win.
pub fn create_batch(
    conn: &Connection,
    req: &CreateBatchRequest,
    now: DateTime<Utc>,
) -> Result<Batch, AppError> {
    let code = req.batch_id.trim();
    let description = req.description.trim();
    if code.is_empty() {
        return Err(AppError::Validation("batchId is required".to_string()));
    }
    if description.is_empty() {
        return Err(AppError::Validation("description is required".to_string()));
    }

    let id = db::new_id();
    let tx = db::begin(conn)?;
    tx.execute(
        "INSERT INTO batches (id, batch_code, description, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![&id, code, description, db::format_timestamp(now)],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Duplicate("A batch with this ID already exists".to_string())
        } else {
            e.into()
        }
    })?;
    db::store_demo_dates(&tx, &id, &req.demo_dates)?;
    tx.commit()?;

    info!("Batch {} created with {} demo dates", code, req.demo_dates.len());

    db::find_batch(conn, &id)?
        .ok_or_else(|| AppError::Internal(format!("batch {} vanished after insert", id)))
}
