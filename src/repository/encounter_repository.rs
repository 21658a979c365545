use chrono::prelude::*;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel::PgConnection;
use uuid::Uuid;

use crate::models::adversary::Adversary;
use crate::models::encounter::{
    AdversarySelection, Encounter, EncounterAdversary, EncounterAdversaryDetail, EncounterDetail,
};
use crate::repository::database::Database;
use crate::repository::error::RepositoryError;
use crate::repository::schema::{adversaries, encounter_adversaries, encounters};

pub fn get_encounters(db: &Database) -> Result<Vec<EncounterDetail>, RepositoryError> {
    let mut connection = db.get_connection()?;
    let rows = encounters::table
        .order(encounters::name.asc())
        .load::<Encounter>(&mut connection)?;

    rows.into_iter()
        .map(|encounter| {
            let adversaries = load_encounter_adversaries(&mut connection, &encounter.id)?;
            Ok(EncounterDetail {
                encounter,
                adversaries,
            })
        })
        .collect()
}

pub fn get_encounter_by_id(
    db: &Database,
    encounter_id: &str,
) -> Result<Option<EncounterDetail>, RepositoryError> {
    let mut connection = db.get_connection()?;
    let encounter = match encounters::table
        .find(encounter_id)
        .get_result::<Encounter>(&mut connection)
        .optional()?
    {
        Some(encounter) => encounter,
        None => return Ok(None),
    };

    let adversaries = load_encounter_adversaries(&mut connection, &encounter.id)?;
    Ok(Some(EncounterDetail {
        encounter,
        adversaries,
    }))
}

pub fn get_encounter_adversaries(
    db: &Database,
    encounter_id: &str,
) -> Result<Vec<EncounterAdversaryDetail>, RepositoryError> {
    let mut connection = db.get_connection()?;
    Ok(load_encounter_adversaries(&mut connection, encounter_id)?)
}

// One join per encounter keeps hydration at a single round trip however
// many association rows the encounter has.
fn load_encounter_adversaries(
    connection: &mut PgConnection,
    encounter_id: &str,
) -> Result<Vec<EncounterAdversaryDetail>, diesel::result::Error> {
    let rows = encounter_adversaries::table
        .inner_join(adversaries::table)
        .filter(encounter_adversaries::encounter_id.eq(encounter_id))
        .order(adversaries::name.asc())
        .load::<(EncounterAdversary, Adversary)>(connection)?;

    Ok(rows
        .into_iter()
        .map(|(link, adversary)| EncounterAdversaryDetail { link, adversary })
        .collect())
}

/// Inserts the encounter and attaches every selection under one
/// transaction; if any attach fails, the encounter row is rolled back too.
pub fn create_encounter(
    db: &Database,
    encounter: Encounter,
    selections: &[AdversarySelection],
) -> Result<EncounterDetail, RepositoryError> {
    let mut connection = db.get_connection()?;
    let detail = connection.transaction::<EncounterDetail, diesel::result::Error, _>(
        |connection| {
            let encounter = Encounter {
                id: Uuid::new_v4().to_string(),
                created_at: None,
                updated_at: None,
                ..encounter
            };
            let created = diesel::insert_into(encounters::table)
                .values(&encounter)
                .get_result::<Encounter>(connection)?;

            for selection in selections {
                upsert_encounter_adversary(
                    connection,
                    &created.id,
                    &selection.adversary_id,
                    selection.count,
                )?;
            }

            let adversaries = load_encounter_adversaries(connection, &created.id)?;
            Ok(EncounterDetail {
                encounter: created,
                adversaries,
            })
        },
    )?;
    Ok(detail)
}

pub fn update_encounter_by_id(
    db: &Database,
    encounter_id: &str,
    mut encounter: Encounter,
) -> Result<Option<Encounter>, RepositoryError> {
    let mut connection = db.get_connection()?;
    encounter.id = encounter_id.to_owned();
    encounter.created_at = None;
    encounter.updated_at = Some(Utc::now().naive_utc());
    let updated = diesel::update(encounters::table.find(encounter_id))
        .set(&encounter)
        .get_result::<Encounter>(&mut connection)
        .optional()?;
    Ok(updated)
}

pub fn delete_encounter_by_id(db: &Database, encounter_id: &str) -> Result<usize, RepositoryError> {
    let mut connection = db.get_connection()?;
    let deleted = diesel::delete(encounters::table.find(encounter_id)).execute(&mut connection)?;
    Ok(deleted)
}

/// Places an adversary in an encounter with a quantity. Attaching an
/// already-present adversary replaces its count and keeps the row id.
pub fn add_adversary_to_encounter(
    db: &Database,
    encounter_id: &str,
    adversary_id: &str,
    count: i32,
) -> Result<EncounterAdversary, RepositoryError> {
    let mut connection = db.get_connection()?;
    let link = connection.transaction::<EncounterAdversary, diesel::result::Error, _>(
        |connection| upsert_encounter_adversary(connection, encounter_id, adversary_id, count),
    )?;
    Ok(link)
}

// The composite UNIQUE constraint plus ON CONFLICT DO UPDATE makes the
// attach atomic: concurrent attaches for a brand-new pair cannot both
// insert, and the losing insert becomes the count update. RETURNING hands
// back the stored row, so a pre-existing association keeps its id.
fn upsert_encounter_adversary(
    connection: &mut PgConnection,
    encounter_id: &str,
    adversary_id: &str,
    count: i32,
) -> Result<EncounterAdversary, diesel::result::Error> {
    let link = EncounterAdversary {
        id: Uuid::new_v4().to_string(),
        encounter_id: encounter_id.to_owned(),
        adversary_id: adversary_id.to_owned(),
        count: count.max(1),
    };
    diesel::insert_into(encounter_adversaries::table)
        .values(&link)
        .on_conflict((
            encounter_adversaries::encounter_id,
            encounter_adversaries::adversary_id,
        ))
        .do_update()
        .set(encounter_adversaries::count.eq(excluded(encounter_adversaries::count)))
        .get_result::<EncounterAdversary>(connection)
}

pub fn remove_adversary_from_encounter(
    db: &Database,
    encounter_adversary_id: &str,
) -> Result<usize, RepositoryError> {
    let mut connection = db.get_connection()?;
    let deleted = diesel::delete(encounter_adversaries::table.find(encounter_adversary_id))
        .execute(&mut connection)?;
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::adversary_repository;
    use crate::utils::test_utils::{sample_adversary, sample_encounter};

    #[test]
    fn test_should_keep_a_single_row_when_attaching_the_same_pair_twice() {
        let db = Database::new().expect("failed to build pool");
        let goblin = adversary_repository::create_adversary(
            &db,
            sample_adversary(&format!("Goblin {}", Uuid::new_v4())),
        )
        .unwrap();
        let ambush = create_encounter(&db, sample_encounter("Ambush"), &[]).unwrap();

        let first = add_adversary_to_encounter(&db, &ambush.encounter.id, &goblin.id, 3).unwrap();
        let second = add_adversary_to_encounter(&db, &ambush.encounter.id, &goblin.id, 3).unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.count, 3);

        let detail = get_encounter_by_id(&db, &ambush.encounter.id).unwrap().unwrap();
        assert_eq!(detail.adversaries.len(), 1);
        assert_eq!(detail.adversaries[0].link.count, 3);
    }

    #[test]
    fn test_should_replace_count_and_embed_adversary_when_reattaching() {
        let db = Database::new().expect("failed to build pool");
        let goblin = adversary_repository::create_adversary(
            &db,
            sample_adversary(&format!("Goblin {}", Uuid::new_v4())),
        )
        .unwrap();
        let ambush = create_encounter(&db, sample_encounter("Ambush"), &[]).unwrap();

        let first = add_adversary_to_encounter(&db, &ambush.encounter.id, &goblin.id, 4).unwrap();
        assert_eq!(first.count, 4);

        let second = add_adversary_to_encounter(&db, &ambush.encounter.id, &goblin.id, 2).unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.count, 2);

        let detail = get_encounter_by_id(&db, &ambush.encounter.id).unwrap().unwrap();
        assert_eq!(detail.adversaries.len(), 1);
        let entry = &detail.adversaries[0];
        assert_eq!(entry.link.count, 2);
        assert_eq!(entry.adversary.id, goblin.id);
        assert_eq!(entry.adversary.name, goblin.name);
        assert_eq!(entry.adversary.armor_class, goblin.armor_class);
        assert_eq!(entry.adversary.hit_points, goblin.hit_points);
    }

    #[test]
    fn test_should_end_with_one_row_when_attaches_race_for_a_new_pair() {
        let db = Database::new().expect("failed to build pool");
        let adversary = adversary_repository::create_adversary(
            &db,
            sample_adversary(&format!("Raider {}", Uuid::new_v4())),
        )
        .unwrap();
        let encounter = create_encounter(&db, sample_encounter("Raid"), &[]).unwrap();

        let mut handles = Vec::new();
        for count in [2, 5] {
            let db = db.clone();
            let encounter_id = encounter.encounter.id.clone();
            let adversary_id = adversary.id.clone();
            handles.push(std::thread::spawn(move || {
                add_adversary_to_encounter(&db, &encounter_id, &adversary_id, count)
            }));
        }

        for handle in handles {
            handle
                .join()
                .expect("attach thread panicked")
                .expect("concurrent attach should not surface a conflict");
        }

        let detail = get_encounter_by_id(&db, &encounter.encounter.id).unwrap().unwrap();
        assert_eq!(detail.adversaries.len(), 1);
        let stored = detail.adversaries[0].link.count;
        assert!(stored == 2 || stored == 5);
    }

    #[test]
    fn test_should_store_at_least_one_when_count_is_not_positive() {
        let db = Database::new().expect("failed to build pool");
        let adversary = adversary_repository::create_adversary(
            &db,
            sample_adversary(&format!("Swarm {}", Uuid::new_v4())),
        )
        .unwrap();
        let encounter = create_encounter(&db, sample_encounter("Infestation"), &[]).unwrap();

        let link = add_adversary_to_encounter(&db, &encounter.encounter.id, &adversary.id, 0).unwrap();
        assert_eq!(link.count, 1);

        let link = add_adversary_to_encounter(&db, &encounter.encounter.id, &adversary.id, -4).unwrap();
        assert_eq!(link.count, 1);
    }

    #[test]
    fn test_should_create_encounter_with_adversaries_in_one_call() {
        let db = Database::new().expect("failed to build pool");
        let tag = Uuid::new_v4();
        let zealot = adversary_repository::create_adversary(
            &db,
            sample_adversary(&format!("zealot {tag}")),
        )
        .unwrap();
        let archer = adversary_repository::create_adversary(
            &db,
            sample_adversary(&format!("archer {tag}")),
        )
        .unwrap();

        let selections = vec![
            AdversarySelection {
                adversary_id: zealot.id.clone(),
                count: 2,
            },
            AdversarySelection {
                adversary_id: archer.id.clone(),
                count: 3,
            },
        ];
        let detail = create_encounter(&db, sample_encounter("Temple Assault"), &selections).unwrap();

        assert_eq!(detail.adversaries.len(), 2);
        // Hydration orders by adversary name.
        assert_eq!(detail.adversaries[0].adversary.id, archer.id);
        assert_eq!(detail.adversaries[0].link.count, 3);
        assert_eq!(detail.adversaries[1].adversary.id, zealot.id);
        assert_eq!(detail.adversaries[1].link.count, 2);
        assert!(detail.encounter.created_at.is_some());
    }

    #[test]
    fn test_should_roll_back_encounter_creation_when_an_adversary_is_unknown() {
        let db = Database::new().expect("failed to build pool");
        let known = adversary_repository::create_adversary(
            &db,
            sample_adversary(&format!("Knight {}", Uuid::new_v4())),
        )
        .unwrap();

        let doomed_name = format!("Doomed {}", Uuid::new_v4());
        let selections = vec![
            AdversarySelection {
                adversary_id: known.id.clone(),
                count: 1,
            },
            AdversarySelection {
                adversary_id: Uuid::new_v4().to_string(),
                count: 1,
            },
        ];

        let result = create_encounter(&db, sample_encounter(&doomed_name), &selections);
        assert!(result.is_err());

        let listed = get_encounters(&db).unwrap();
        assert!(!listed
            .iter()
            .any(|detail| detail.encounter.name == doomed_name));
    }

    #[test]
    fn test_should_detach_by_association_id_idempotently() {
        let db = Database::new().expect("failed to build pool");
        let adversary = adversary_repository::create_adversary(
            &db,
            sample_adversary(&format!("Cultist {}", Uuid::new_v4())),
        )
        .unwrap();
        let encounter = create_encounter(&db, sample_encounter("Ritual"), &[]).unwrap();
        let link =
            add_adversary_to_encounter(&db, &encounter.encounter.id, &adversary.id, 2).unwrap();

        assert_eq!(remove_adversary_from_encounter(&db, &link.id).unwrap(), 1);
        assert_eq!(remove_adversary_from_encounter(&db, &link.id).unwrap(), 0);

        let remaining = get_encounter_adversaries(&db, &encounter.encounter.id).unwrap();
        assert!(remaining.is_empty());
    }

    #[test]
    fn test_should_return_none_for_unknown_encounter() {
        let db = Database::new().expect("failed to build pool");
        assert!(get_encounter_by_id(&db, &Uuid::new_v4().to_string())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_should_update_encounter_fields_and_advance_updated_at() {
        let db = Database::new().expect("failed to build pool");
        let created = create_encounter(&db, sample_encounter("Bridge Duel"), &[]).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(20));

        let mut changed = created.encounter.clone();
        changed.name = format!("Bridge Duel, Revised {}", Uuid::new_v4());
        changed.description = "The bridge is now on fire".to_string();

        let updated = update_encounter_by_id(&db, &created.encounter.id, changed.clone())
            .unwrap()
            .expect("updated encounter should be found");

        assert_eq!(updated.id, created.encounter.id);
        assert_eq!(updated.name, changed.name);
        assert_eq!(updated.description, "The bridge is now on fire");
        assert!(updated.updated_at.unwrap() > created.encounter.updated_at.unwrap());
    }

    #[test]
    fn test_should_cascade_association_rows_when_encounter_is_deleted() {
        let db = Database::new().expect("failed to build pool");
        let adversary = adversary_repository::create_adversary(
            &db,
            sample_adversary(&format!("Warden {}", Uuid::new_v4())),
        )
        .unwrap();
        let encounter = create_encounter(&db, sample_encounter("Prison Break"), &[]).unwrap();
        let link =
            add_adversary_to_encounter(&db, &encounter.encounter.id, &adversary.id, 2).unwrap();

        assert_eq!(delete_encounter_by_id(&db, &encounter.encounter.id).unwrap(), 1);
        assert!(get_encounter_by_id(&db, &encounter.encounter.id)
            .unwrap()
            .is_none());
        assert_eq!(remove_adversary_from_encounter(&db, &link.id).unwrap(), 0);
    }
}
