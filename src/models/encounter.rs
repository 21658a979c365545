use diesel::{AsChangeset, Associations, Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};

use crate::models::adversary::Adversary;

/// A named grouping of adversaries representing one combat setup.
#[derive(Serialize, Deserialize, Debug, Clone, Queryable, Insertable, AsChangeset, Identifiable)]
#[diesel(table_name = crate::repository::schema::encounters)]
pub struct Encounter {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "createdAt")]
    pub created_at: Option<chrono::NaiveDateTime>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<chrono::NaiveDateTime>,
}

/// Join row linking one encounter to one adversary with a quantity.
/// The (encounter_id, adversary_id) pair is unique in the table.
#[derive(
    Serialize, Deserialize, Debug, Clone, Queryable, Insertable, Identifiable, Associations,
)]
#[diesel(belongs_to(Encounter, foreign_key = encounter_id))]
#[diesel(belongs_to(Adversary, foreign_key = adversary_id))]
#[diesel(table_name = crate::repository::schema::encounter_adversaries)]
pub struct EncounterAdversary {
    #[serde(default)]
    pub id: String,
    pub encounter_id: String,
    pub adversary_id: String,
    pub count: i32,
}

/// An association row together with a read-only snapshot of its adversary,
/// as produced by the hydrating join.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EncounterAdversaryDetail {
    #[serde(flatten)]
    pub link: EncounterAdversary,
    pub adversary: Adversary,
}

/// An encounter with its association collection loaded, ordered by
/// adversary name.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EncounterDetail {
    #[serde(flatten)]
    pub encounter: Encounter,
    pub adversaries: Vec<EncounterAdversaryDetail>,
}

fn default_count() -> i32 {
    1
}

/// Caller-supplied reference to an adversary to place in an encounter.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AdversarySelection {
    pub adversary_id: String,
    #[serde(default = "default_count")]
    pub count: i32,
}
