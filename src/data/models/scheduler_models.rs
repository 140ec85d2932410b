use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use serde::Serialize;
use thiserror::Error;

use crate::schema::card_deck_states;

/// Stored in `expiry_date` while a card sits in the unknown heap; never
/// read as a meaningful date.
pub const EXPIRY_SENTINEL: NaiveDateTime = NaiveDateTime::MIN;

/// One card's learning progress within one deck.
///
/// Timestamps are naive in storage but carry UTC semantics everywhere in
/// this crate; the public API converts at the boundary.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = card_deck_states)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CardDeckState {
    pub deck_id: i32,
    pub card_id: i32,
    pub current_heap: i32,            // 0 = unknown / not yet learned
    pub biggest_heap_reached: i32,    // historical high-water mark
    pub last_learn_date: NaiveDateTime,
    pub expiry_date: NaiveDateTime,   // EXPIRY_SENTINEL at heap 0
    pub times_in_unknown_heap: i32,
}

/// Result of a single live-learning move.
///
/// "Already in heap" is success, not failure: duplicate calls arrive from
/// client retries and concurrent sessions and must stay side-effect-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoveOutcome {
    Moved,
    AlreadyInTargetHeap,
}

/// Counts for a bulk manual reassignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BulkMoveReport {
    pub requested: usize, // cards named in the request
    pub moved: usize,     // rows actually rewritten
    pub unchanged: usize, // already at the target heap
}

// Scheduling and heap-transition errors
#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Unknown scheduling policy id {0}")]
    UnknownPolicy(i32),
    #[error("Heap {0} is outside the valid range")]
    InvalidHeap(i32),
    #[error("Reserved or empty identifier")]
    ReservedId,
    #[error("No state for card {card_id} in deck {deck_id}")]
    NotFound { deck_id: i32, card_id: i32 },
    #[error("Cannot move from heap {from} to heap {to} during live learning")]
    InvalidTransition { from: i32, to: i32 },
    #[error("Cards not present in deck: {missing:?}")]
    InconsistentRequest { missing: Vec<i32> },
    #[error("Database error")]
    DatabaseError(#[from] DieselError),
}
