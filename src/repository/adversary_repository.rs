use chrono::prelude::*;
use diesel::prelude::*;
use uuid::Uuid;

use crate::models::adversary::Adversary;
use crate::repository::database::Database;
use crate::repository::error::RepositoryError;
use crate::repository::schema::adversaries::dsl::*;

pub fn get_adversaries(db: &Database) -> Result<Vec<Adversary>, RepositoryError> {
    let mut connection = db.get_connection()?;
    let rows = adversaries
        .order(name.asc())
        .load::<Adversary>(&mut connection)?;
    Ok(rows)
}

pub fn get_adversary_by_id(
    db: &Database,
    adversary_id: &str,
) -> Result<Option<Adversary>, RepositoryError> {
    let mut connection = db.get_connection()?;
    let row = adversaries
        .find(adversary_id)
        .get_result::<Adversary>(&mut connection)
        .optional()?;
    Ok(row)
}

pub fn create_adversary(db: &Database, adversary: Adversary) -> Result<Adversary, RepositoryError> {
    let mut connection = db.get_connection()?;
    let adversary = Adversary {
        id: Uuid::new_v4().to_string(),
        created_at: None,
        updated_at: None,
        ..adversary
    };
    let created = diesel::insert_into(adversaries)
        .values(&adversary)
        .get_result::<Adversary>(&mut connection)?;
    Ok(created)
}

pub fn update_adversary_by_id(
    db: &Database,
    adversary_id: &str,
    mut adversary: Adversary,
) -> Result<Option<Adversary>, RepositoryError> {
    let mut connection = db.get_connection()?;
    adversary.id = adversary_id.to_owned();
    adversary.created_at = None;
    adversary.updated_at = Some(Utc::now().naive_utc());
    let updated = diesel::update(adversaries.find(adversary_id))
        .set(&adversary)
        .get_result::<Adversary>(&mut connection)
        .optional()?;
    Ok(updated)
}

pub fn delete_adversary_by_id(
    db: &Database,
    adversary_id: &str,
) -> Result<usize, RepositoryError> {
    let mut connection = db.get_connection()?;
    let deleted = diesel::delete(adversaries.find(adversary_id)).execute(&mut connection)?;
    Ok(deleted)
}
