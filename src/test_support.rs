// Shared fixtures for the in-memory sqlite tests.
use chrono::{DateTime, Duration, TimeZone, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;

use crate::data::models::{CardDeckState, EXPIRY_SENTINEL};
use crate::data::repositories::CardDeckStateRepository;
use crate::schema::{card_deck_states, cards, decks, users};

const SCHEMA: &str = "
CREATE TABLE users (
    user_id INTEGER PRIMARY KEY,
    email TEXT NOT NULL,
    username TEXT NOT NULL
);
CREATE TABLE decks (
    deck_id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL,
    deck_name TEXT NOT NULL,
    heaping_policy_id INTEGER NOT NULL
);
CREATE TABLE cards (
    card_id INTEGER PRIMARY KEY,
    front_text TEXT NOT NULL,
    back_text TEXT NOT NULL,
    notes TEXT NOT NULL DEFAULT '',
    source_refs TEXT NOT NULL DEFAULT '',
    is_public BOOLEAN NOT NULL DEFAULT 1,
    average_rating DOUBLE NOT NULL DEFAULT 0,
    rating_count INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE card_deck_states (
    deck_id INTEGER NOT NULL,
    card_id INTEGER NOT NULL,
    current_heap INTEGER NOT NULL,
    biggest_heap_reached INTEGER NOT NULL,
    last_learn_date TIMESTAMP NOT NULL,
    expiry_date TIMESTAMP NOT NULL,
    times_in_unknown_heap INTEGER NOT NULL,
    PRIMARY KEY (deck_id, card_id)
);
CREATE TABLE card_ratings (
    user_id INTEGER NOT NULL,
    card_id INTEGER NOT NULL,
    rating INTEGER NOT NULL,
    PRIMARY KEY (user_id, card_id)
);
";

pub fn test_conn() -> SqliteConnection {
    let mut conn = SqliteConnection::establish(":memory:").expect("in-memory sqlite");
    conn.batch_execute(SCHEMA).expect("schema");
    conn
}

pub fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap()
}

pub fn seed_user(conn: &mut SqliteConnection, user_id: i32) {
    diesel::insert_into(users::table)
        .values((
            users::user_id.eq(user_id),
            users::email.eq(format!("user{}@example.com", user_id)),
            users::username.eq(format!("user{}", user_id)),
        ))
        .execute(conn)
        .unwrap();
}

pub fn seed_deck(conn: &mut SqliteConnection, deck_id: i32, user_id: i32, policy_id: i32) {
    diesel::insert_into(decks::table)
        .values((
            decks::deck_id.eq(deck_id),
            decks::user_id.eq(user_id),
            decks::deck_name.eq(format!("deck {}", deck_id)),
            decks::heaping_policy_id.eq(policy_id),
        ))
        .execute(conn)
        .unwrap();
}

pub fn seed_card(
    conn: &mut SqliteConnection,
    card_id: i32,
    notes: &str,
    source_refs: &str,
    is_public: bool,
) {
    diesel::insert_into(cards::table)
        .values((
            cards::card_id.eq(card_id),
            cards::front_text.eq("front"),
            cards::back_text.eq("back"),
            cards::notes.eq(notes),
            cards::source_refs.eq(source_refs),
            cards::is_public.eq(is_public),
            cards::average_rating.eq(0.0),
            cards::rating_count.eq(0),
        ))
        .execute(conn)
        .unwrap();
}

/// Inserts a state row: cards at heap 0 get the sentinel expiry, the rest
/// an expiry two days after the fixed last-learn date.
pub fn seed_state(conn: &mut SqliteConnection, deck_id: i32, card_id: i32, heap: i32, biggest: i32) {
    let last_learn = utc(2026, 1, 1);
    let state = CardDeckState {
        deck_id,
        card_id,
        current_heap: heap,
        biggest_heap_reached: biggest,
        last_learn_date: last_learn.naive_utc(),
        expiry_date: if heap == 0 {
            EXPIRY_SENTINEL
        } else {
            (last_learn + Duration::days(2)).naive_utc()
        },
        times_in_unknown_heap: 0,
    };
    diesel::insert_into(card_deck_states::table)
        .values(&state)
        .execute(conn)
        .unwrap();
}

pub fn state(conn: &mut SqliteConnection, deck_id: i32, card_id: i32) -> CardDeckState {
    CardDeckStateRepository::find(conn, deck_id, card_id)
        .unwrap()
        .expect("state row")
}

pub fn card_aggregate(conn: &mut SqliteConnection, card_id: i32) -> (f64, i32) {
    cards::table
        .find(card_id)
        .select((cards::average_rating, cards::rating_count))
        .first(conn)
        .unwrap()
}
