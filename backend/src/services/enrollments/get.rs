use crate::db::{self, Store};
use crate::error::AppError;
use actix_web::{web, HttpResponse};
use rusqlite::Connection;
use tracker_common::model::enrollment::Enrollment;
use tracker_common::responses::ApiResponse;

/// How an enrollment is addressed.
#[derive(Debug, Clone, Copy)]
pub enum EnrollmentKey<'a> {
    Id(&'a str),
    Token(&'a str),
}

/// `GET /api/enrollments/{id}`
pub async fn process(
    store: web::Data<Store>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    let enrollment = store
        .run(move |conn| lookup(conn, EnrollmentKey::Id(&id)))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(enrollment)))
}

/// `GET /api/enrollments/qr/{token}`
pub async fn process_by_token(
    store: web::Data<Store>,
    token: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let token = token.into_inner();
    let enrollment = store
        .run(move |conn| lookup(conn, EnrollmentKey::Token(&token)))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(enrollment)))
}

pub fn lookup(conn: &Connection, key: EnrollmentKey<'_>) -> Result<Enrollment, AppError> {
    let found = match key {
        EnrollmentKey::Id(id) => db::find_enrollment(conn, id)?,
        EnrollmentKey::Token(token) => db::find_enrollment_by_token(conn, token)?,
    };
    found.ok_or_else(|| AppError::NotFound("Enrollment not found".to_string()))
}
