use crate::db::{self, Store};
use crate::error::AppError;
use crate::services::reports::aggregate::{all_batches, batch_summary};
use crate::services::reports::enrolled_count;
use actix_web::{web, HttpResponse};
use rusqlite::{params, Connection};
use tracker_common::model::report::AllBatchesStats;
use tracker_common::responses::ApiResponse;

/// `GET /api/reports/batches`
pub async fn process(store: web::Data<Store>) -> Result<HttpResponse, AppError> {
    let stats = store.run(|conn| all_batches_stats(conn)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(stats)))
}

/// Attendance percentage of every batch, newest batch first.
pub fn all_batches_stats(conn: &Connection) -> Result<AllBatchesStats, AppError> {
    let mut summaries = Vec::new();
    for batch in db::list_batches(conn)? {
        let total_students = enrolled_count(conn, &batch.id)?;
        let total_attendance: i64 = conn.query_row(
            "SELECT COUNT(*) FROM attendance WHERE batch_id = ?1",
            params![&batch.id],
            |row| row.get(0),
        )?;
        summaries.push(batch_summary(&batch, total_students, total_attendance as usize));
    }
    Ok(all_batches(summaries))
}
