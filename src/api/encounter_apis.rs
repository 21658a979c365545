use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::models::encounter::{AdversarySelection, Encounter};
use crate::repository::database::Database;
use crate::repository::{adversary_repository, encounter_repository};

#[derive(Serialize, Deserialize)]
pub struct CreateEncounterRequest {
    name: Option<String>,
    description: Option<String>,
    #[serde(default)]
    adversaries: Vec<AdversarySelection>,
}

#[derive(Serialize, Deserialize)]
pub struct AddAdversaryRequest {
    adversary_id: Option<String>,
    count: Option<i32>,
}

#[get("/encounters")]
pub async fn get_encounters(db: web::Data<Database>) -> HttpResponse {
    match encounter_repository::get_encounters(&db) {
        Ok(encounters) => HttpResponse::Ok().json(encounters),
        Err(err) => {
            error!(error = %err, "failed to list encounters");
            HttpResponse::InternalServerError().json("Internal server error")
        }
    }
}

#[get("/encounters/{id}")]
pub async fn get_encounter_by_id(db: web::Data<Database>, id: web::Path<String>) -> HttpResponse {
    match encounter_repository::get_encounter_by_id(&db, &id) {
        Ok(Some(encounter)) => HttpResponse::Ok().json(encounter),
        Ok(None) => HttpResponse::NotFound().json("Encounter not found"),
        Err(err) => {
            error!(error = %err, "failed to load encounter");
            HttpResponse::InternalServerError().json("Internal server error")
        }
    }
}

#[post("/encounters")]
pub async fn create_encounter(
    db: web::Data<Database>,
    request: web::Json<CreateEncounterRequest>,
) -> HttpResponse {
    let request = request.into_inner();
    let name = match request.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => return HttpResponse::BadRequest().json("Encounter name is required"),
    };

    for selection in &request.adversaries {
        match adversary_repository::get_adversary_by_id(&db, &selection.adversary_id) {
            Ok(Some(_)) => {}
            Ok(None) => return HttpResponse::BadRequest().json("Adversary id not found"),
            Err(err) => {
                error!(error = %err, "failed to look up adversary");
                return HttpResponse::InternalServerError().json("Internal server error");
            }
        }
    }

    let encounter = Encounter {
        id: String::new(),
        name,
        description: request.description.unwrap_or_default(),
        created_at: None,
        updated_at: None,
    };

    match encounter_repository::create_encounter(&db, encounter, &request.adversaries) {
        Ok(detail) => HttpResponse::Created().json(detail),
        Err(err) => {
            error!(error = %err, "failed to create encounter");
            HttpResponse::InternalServerError().json("Internal server error")
        }
    }
}

#[put("/encounters/{id}")]
pub async fn update_encounter_by_id(
    db: web::Data<Database>,
    id: web::Path<String>,
    updated_encounter: web::Json<Encounter>,
) -> HttpResponse {
    match encounter_repository::update_encounter_by_id(&db, &id, updated_encounter.into_inner()) {
        Ok(Some(encounter)) => HttpResponse::Ok().json(encounter),
        Ok(None) => HttpResponse::NotFound().json("Encounter not found"),
        Err(err) => {
            error!(error = %err, "failed to update encounter");
            HttpResponse::InternalServerError().json("Internal server error")
        }
    }
}

#[delete("/encounters/{id}")]
pub async fn delete_encounter_by_id(db: web::Data<Database>, id: web::Path<String>) -> HttpResponse {
    match encounter_repository::delete_encounter_by_id(&db, &id) {
        Ok(0) => HttpResponse::NotFound().json("Encounter not found"),
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(err) => {
            error!(error = %err, "failed to delete encounter");
            HttpResponse::InternalServerError().json("Internal server error")
        }
    }
}

#[post("/encounters/{id}/adversaries")]
pub async fn add_adversary_to_encounter(
    db: web::Data<Database>,
    id: web::Path<String>,
    request: web::Json<AddAdversaryRequest>,
) -> HttpResponse {
    let encounter_id = id.into_inner();
    let adversary_id = match &request.adversary_id {
        Some(adversary_id) => adversary_id.clone(),
        None => return HttpResponse::BadRequest().json("Adversary id is required"),
    };
    // Invalid or missing quantities fall back to a single adversary.
    let count = request.count.filter(|count| *count >= 1).unwrap_or(1);

    match encounter_repository::get_encounter_by_id(&db, &encounter_id) {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json("Encounter not found"),
        Err(err) => {
            error!(error = %err, "failed to load encounter");
            return HttpResponse::InternalServerError().json("Internal server error");
        }
    }
    match adversary_repository::get_adversary_by_id(&db, &adversary_id) {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::BadRequest().json("Adversary id not found"),
        Err(err) => {
            error!(error = %err, "failed to look up adversary");
            return HttpResponse::InternalServerError().json("Internal server error");
        }
    }

    match encounter_repository::add_adversary_to_encounter(&db, &encounter_id, &adversary_id, count)
    {
        Ok(link) => HttpResponse::Ok().json(link),
        Err(err) => {
            error!(error = %err, "failed to add adversary to encounter");
            HttpResponse::InternalServerError().json("Internal server error")
        }
    }
}

#[delete("/encounters/{id}/adversaries/{link_id}")]
pub async fn remove_adversary_from_encounter(
    db: web::Data<Database>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (_encounter_id, link_id) = path.into_inner();
    match encounter_repository::remove_adversary_from_encounter(&db, &link_id) {
        Ok(0) => HttpResponse::NotFound().json("Encounter adversary not found"),
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(err) => {
            error!(error = %err, "failed to remove adversary from encounter");
            HttpResponse::InternalServerError().json("Internal server error")
        }
    }
}
