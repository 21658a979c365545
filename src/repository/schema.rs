// Column order here is the contract the Queryable derives rely on; keep it
// in sync with the structs in src/models and the migration DDL.

diesel::table! {
    adversaries (id) {
        id -> Varchar,
        name -> Varchar,
        #[sql_name = "type"]
        type_ -> Varchar,
        challenge_rating -> Varchar,
        size -> Varchar,
        armor_class -> Int4,
        hit_points -> Int4,
        speed -> Varchar,
        strength -> Int4,
        dexterity -> Int4,
        constitution -> Int4,
        intelligence -> Int4,
        wisdom -> Int4,
        charisma -> Int4,
        abilities -> Text,
        actions -> Text,
        reactions -> Text,
        description -> Text,
        created_at -> Nullable<Timestamp>,
        updated_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    encounters (id) {
        id -> Varchar,
        name -> Varchar,
        description -> Text,
        created_at -> Nullable<Timestamp>,
        updated_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    encounter_adversaries (id) {
        id -> Varchar,
        encounter_id -> Varchar,
        adversary_id -> Varchar,
        count -> Int4,
    }
}

diesel::joinable!(encounter_adversaries -> adversaries (adversary_id));
diesel::joinable!(encounter_adversaries -> encounters (encounter_id));

diesel::allow_tables_to_appear_in_same_query!(adversaries, encounter_adversaries, encounters,);
