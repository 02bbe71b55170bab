use crate::db::Store;
use crate::error::AppError;
use crate::services::batches::get::get_batch;
use actix_web::{web, HttpResponse};
use log::info;
use rusqlite::{params, Connection};
use tracker_common::model::batch::Batch;
use tracker_common::responses::ApiResponse;

/// `DELETE /api/batches/{id}`
pub async fn process(
    store: web::Data<Store>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    let batch = store.run(move |conn| delete_batch(conn, &id)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(batch).with_message("Batch deleted successfully")))
}

/// Deletes a batch and returns it as it was.
///
/// Demo dates, enrollments and attendance of the batch go with it through
/// `ON DELETE CASCADE`; students are kept.
pub fn delete_batch(conn: &Connection, id: &str) -> Result<Batch, AppError> {
    let batch = get_batch(conn, id)?;
    conn.execute("DELETE FROM batches WHERE id = ?1", params![id])?;
    info!("Batch {} deleted", batch.batch_id);
    Ok(batch)
}
