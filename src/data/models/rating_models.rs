use diesel::prelude::*;
use diesel::result::Error as DieselError;
use serde::Serialize;
use thiserror::Error;

use crate::schema::card_ratings;

/// Sentinel returned as "previous rating" when the user had never rated
/// the card before.
pub const NEVER_RATED: i32 = 0;
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// One user's star rating of one card, unique per (user, card).
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = card_ratings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CardRating {
    pub user_id: i32,
    pub card_id: i32,
    pub rating: i32, // 1..=5
}

/// What `set_rating` observed, so callers can tell whether anything changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingOutcome {
    pub previous_rating: i32, // NEVER_RATED when no prior row existed
    pub existed: bool,
    pub changed: bool,
}

/// Scan summary for the maintenance passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct RecomputeReport {
    pub scanned: usize,
    pub changed: usize,
}

#[derive(Error, Debug)]
pub enum RatingError {
    #[error("Rating {0} is outside the 1-5 range")]
    InvalidRating(i32),
    #[error("Gave up after {attempts} conflicting insert attempts")]
    ConflictRetriesExhausted {
        attempts: u32,
        #[source]
        source: DieselError,
    },
    #[error("Database error")]
    DatabaseError(#[from] DieselError),
}
