use crate::db::{self, Store};
use crate::error::AppError;
use crate::services::batches::get::get_batch;
use actix_web::{web, HttpResponse};
use log::info;
use rusqlite::{params, Connection};
use tracker_common::model::batch::Batch;
use tracker_common::requests::UpdateBatchRequest;
use tracker_common::responses::ApiResponse;

/// `PUT /api/batches/{id}`
pub async fn process(
    store: web::Data<Store>,
    id: web::Path<String>,
    payload: web::Json<UpdateBatchRequest>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    let req = payload.into_inner();
    let batch = store.run(move |conn| update_batch(conn, &id, &req)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(batch)))
}

/// Applies a partial update to a batch.
///
/// The batch code identifies the batch to enrolling students and cannot be
/// changed; sending it is allowed only when it matches the stored value. A new
/// schedule replaces the old one entirely.
pub fn update_batch(
    conn: &Connection,
    id: &str,
    req: &UpdateBatchRequest,
) -> Result<Batch, AppError> {
    let current = get_batch(conn, id)?;

    if let Some(code) = &req.batch_id {
        if code.trim() != current.batch_id {
            return Err(AppError::Validation(
                "batchId cannot be changed".to_string(),
            ));
        }
    }

    let tx = db::begin(conn)?;
    if let Some(description) = &req.description {
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::Validation("description is required".to_string()));
        }
        tx.execute(
            "UPDATE batches SET description = ?1 WHERE id = ?2",
            params![description, id],
        )?;
    }
    if let Some(dates) = &req.demo_dates {
        db::store_demo_dates(&tx, id, dates)?;
    }
    tx.commit()?;

    info!("Batch {} updated", current.batch_id);
    get_batch(conn, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::temp_store;
    use crate::services::batches::create_batch;
    use chrono::{NaiveDate, Utc};
    use tracker_common::requests::CreateBatchRequest;

    fn seed(conn: &Connection) -> Batch {
        create_batch(
            conn,
            &CreateBatchRequest {
                batch_id: "B1".to_string(),
                description: "Morning".to_string(),
                demo_dates: vec![NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()],
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn replaces_description_and_schedule() {
        let (_dir, store) = temp_store();
        let conn = store.open().unwrap();
        let batch = seed(&conn);
        let dates = vec![
            NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        ];
        let updated = update_batch(
            &conn,
            &batch.id,
            &UpdateBatchRequest {
                batch_id: Some("B1".to_string()),
                description: Some("Evening".to_string()),
                demo_dates: Some(dates.clone()),
            },
        )
        .unwrap();
        assert_eq!(updated.description, "Evening");
        assert_eq!(updated.demo_dates, dates);
        assert_eq!(updated.created_at, batch.created_at);
    }

    #[test]
    fn code_is_immutable() {
        let (_dir, store) = temp_store();
        let conn = store.open().unwrap();
        let batch = seed(&conn);
        let err = update_batch(
            &conn,
            &batch.id,
            &UpdateBatchRequest {
                batch_id: Some("B2".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn unknown_batch_is_not_found() {
        let (_dir, store) = temp_store();
        let conn = store.open().unwrap();
        let err = update_batch(&conn, "missing", &UpdateBatchRequest::default()).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
