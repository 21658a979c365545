use actix_web::{get, web, HttpResponse};

use super::adversary_apis::{
    create_adversary, delete_adversary_by_id, get_adversaries, get_adversary_by_id, import_csv,
    update_adversary_by_id,
};
use super::encounter_apis::{
    add_adversary_to_encounter, create_encounter, delete_encounter_by_id, get_encounter_by_id,
    get_encounters, remove_adversary_from_encounter, update_encounter_by_id,
};

#[get("/health")]
async fn healthcheck() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(healthcheck).service(
        web::scope("/api")
            .service(get_adversaries)
            .service(create_adversary)
            .service(import_csv)
            .service(get_adversary_by_id)
            .service(update_adversary_by_id)
            .service(delete_adversary_by_id)
            .service(get_encounters)
            .service(create_encounter)
            .service(get_encounter_by_id)
            .service(update_encounter_by_id)
            .service(delete_encounter_by_id)
            .service(add_adversary_to_encounter)
            .service(remove_adversary_from_encounter),
    );
}
