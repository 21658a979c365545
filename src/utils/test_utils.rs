use uuid::Uuid;

use crate::models::adversary::Adversary;
use crate::models::encounter::{AdversarySelection, Encounter, EncounterDetail};
use crate::repository::database::Database;
use crate::repository::{adversary_repository, encounter_repository};

pub fn sample_adversary(name: &str) -> Adversary {
    Adversary {
        id: String::new(),
        name: name.to_string(),
        type_: "Humanoid".to_string(),
        challenge_rating: "2".to_string(),
        size: "Medium".to_string(),
        armor_class: 12,
        hit_points: 7,
        speed: "30 ft.".to_string(),
        strength: 8,
        dexterity: 14,
        constitution: 10,
        intelligence: 10,
        wisdom: 8,
        charisma: 8,
        abilities: "Nimble Escape: may disengage as a minor action".to_string(),
        actions: "Scimitar: +4 to hit, 1d6+2 slashing".to_string(),
        reactions: String::new(),
        description: "A wiry raider, quick to strike and quicker to flee.".to_string(),
        created_at: None,
        updated_at: None,
    }
}

// Names get a UUID suffix so parallel tests sharing one database never
// collide.
pub fn sample_encounter(name: &str) -> Encounter {
    Encounter {
        id: String::new(),
        name: format!("{name} {}", Uuid::new_v4()),
        description: "Seeded by the test harness".to_string(),
        created_at: None,
        updated_at: None,
    }
}

pub async fn init_test_adversaries(db: &Database) -> Vec<Adversary> {
    let tag = Uuid::new_v4();
    ["Goblin", "Orc", "Wyvern"]
        .iter()
        .map(|name| {
            adversary_repository::create_adversary(db, sample_adversary(&format!("{name} {tag}")))
                .expect("failed to seed test adversary")
        })
        .collect()
}

pub async fn init_test_encounter(db: &Database) -> EncounterDetail {
    let adversaries = init_test_adversaries(db).await;
    let selections = vec![AdversarySelection {
        adversary_id: adversaries[0].id.clone(),
        count: 2,
    }];
    encounter_repository::create_encounter(db, sample_encounter("Ambush"), &selections)
        .expect("failed to seed test encounter")
}
