use diesel::{AsChangeset, Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};

/// A Daggerheart adversary statblock. Field order matches the
/// `adversaries` column order in the schema.
#[derive(Serialize, Deserialize, Debug, Clone, Queryable, Insertable, AsChangeset, Identifiable)]
#[diesel(table_name = crate::repository::schema::adversaries)]
pub struct Adversary {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub challenge_rating: String,
    pub size: String,
    pub armor_class: i32,
    pub hit_points: i32,
    pub speed: String,
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
    pub abilities: String,
    pub actions: String,
    pub reactions: String,
    pub description: String,
    #[serde(rename = "createdAt")]
    pub created_at: Option<chrono::NaiveDateTime>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<chrono::NaiveDateTime>,
}
