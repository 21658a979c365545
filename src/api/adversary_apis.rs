use std::io::Write;

use actix_multipart::Multipart;
use actix_web::error::ErrorInternalServerError;
use actix_web::{delete, get, post, put, web, Error, HttpResponse};
use futures::TryStreamExt;
use tempfile::NamedTempFile;
use tracing::{error, warn};

use crate::models::adversary::Adversary;
use crate::repository::adversary_repository;
use crate::repository::database::Database;

#[get("/adversaries")]
pub async fn get_adversaries(db: web::Data<Database>) -> HttpResponse {
    match adversary_repository::get_adversaries(&db) {
        Ok(adversaries) => HttpResponse::Ok().json(adversaries),
        Err(err) => {
            error!(error = %err, "failed to list adversaries");
            HttpResponse::InternalServerError().json("Internal server error")
        }
    }
}

#[post("/adversaries")]
pub async fn create_adversary(
    db: web::Data<Database>,
    new_adversary: web::Json<Adversary>,
) -> HttpResponse {
    match adversary_repository::create_adversary(&db, new_adversary.into_inner()) {
        Ok(adversary) => HttpResponse::Created().json(adversary),
        Err(err) => {
            error!(error = %err, "failed to create adversary");
            HttpResponse::InternalServerError().json("Internal server error")
        }
    }
}

#[get("/adversaries/{id}")]
pub async fn get_adversary_by_id(db: web::Data<Database>, id: web::Path<String>) -> HttpResponse {
    match adversary_repository::get_adversary_by_id(&db, &id) {
        Ok(Some(adversary)) => HttpResponse::Ok().json(adversary),
        Ok(None) => HttpResponse::NotFound().json("Adversary not found"),
        Err(err) => {
            error!(error = %err, "failed to load adversary");
            HttpResponse::InternalServerError().json("Internal server error")
        }
    }
}

#[put("/adversaries/{id}")]
pub async fn update_adversary_by_id(
    db: web::Data<Database>,
    id: web::Path<String>,
    updated_adversary: web::Json<Adversary>,
) -> HttpResponse {
    match adversary_repository::update_adversary_by_id(&db, &id, updated_adversary.into_inner()) {
        Ok(Some(adversary)) => HttpResponse::Ok().json(adversary),
        Ok(None) => HttpResponse::NotFound().json("Adversary not found"),
        Err(err) => {
            error!(error = %err, "failed to update adversary");
            HttpResponse::InternalServerError().json("Internal server error")
        }
    }
}

#[delete("/adversaries/{id}")]
pub async fn delete_adversary_by_id(db: web::Data<Database>, id: web::Path<String>) -> HttpResponse {
    match adversary_repository::delete_adversary_by_id(&db, &id) {
        Ok(0) => HttpResponse::NotFound().json("Adversary not found"),
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(err) => {
            error!(error = %err, "failed to delete adversary");
            HttpResponse::InternalServerError().json("Internal server error")
        }
    }
}

#[post("/adversaries/import_csv")]
pub async fn import_csv(db: web::Data<Database>, mut payload: Multipart) -> Result<HttpResponse, Error> {
    let mut temp_file: Option<NamedTempFile> = None;

    while let Some(mut field) = payload.try_next().await? {
        let content_disposition = field.content_disposition();

        if content_disposition.get_filename().is_none() {
            return Ok(HttpResponse::BadRequest().json("No file name provided"));
        }

        let mut file = NamedTempFile::new().map_err(ErrorInternalServerError)?;
        while let Some(chunk) = field.try_next().await? {
            file.write_all(&chunk).map_err(ErrorInternalServerError)?;
        }
        temp_file = Some(file);
    }

    let temp_file = match temp_file {
        Some(file) => file,
        None => return Ok(HttpResponse::BadRequest().json("No file uploaded")),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(temp_file.path())
        .map_err(ErrorInternalServerError)?;

    let mut new_adversaries: Vec<Adversary> = Vec::new();
    for result in reader.deserialize::<Adversary>() {
        match result {
            Ok(adversary) => new_adversaries.push(adversary),
            Err(err) => {
                warn!(error = %err, "rejecting csv import with malformed record");
                return Ok(HttpResponse::BadRequest().json("Incomplete data, check your file."));
            }
        }
    }

    if new_adversaries.is_empty() {
        return Ok(HttpResponse::BadRequest().json("No valid adversaries found in the CSV file"));
    }

    let mut imported = Vec::with_capacity(new_adversaries.len());
    for adversary in new_adversaries {
        match adversary_repository::create_adversary(&db, adversary) {
            Ok(adversary) => imported.push(adversary),
            Err(err) => {
                error!(error = %err, "failed to import adversary from csv");
                return Ok(HttpResponse::InternalServerError().json("Failed to import adversaries"));
            }
        }
    }

    Ok(HttpResponse::Ok().json(imported))
}
