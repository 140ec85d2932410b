use diesel::prelude::*;
use serde::Serialize;

use crate::schema::{cards, decks};

/// A card with its embedded rating aggregate. The card row itself is owned
/// by deck-management code; this crate only rewrites the aggregate columns.
#[derive(Queryable, Selectable, Serialize, Debug, Clone)]
#[diesel(table_name = cards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Card {
    pub card_id: i32,
    pub front_text: String,
    pub back_text: String,
    pub notes: String,       // free-text additional info, may be blank
    pub source_refs: String, // bibliography / source references, may be blank
    pub is_public: bool,
    pub average_rating: f64,
    pub rating_count: i32,
}

/// Basic deck information; the scheduler only ever reads the policy id.
#[derive(Queryable, Selectable, Serialize, Debug, Clone)]
#[diesel(table_name = decks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Deck {
    pub deck_id: i32,
    pub user_id: i32,
    pub deck_name: String,
    pub heaping_policy_id: i32,
}
