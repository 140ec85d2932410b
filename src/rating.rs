// rating.rs
use std::thread;
use std::time::Duration as StdDuration;

use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rand::Rng;

use crate::data::models::{MAX_RATING, MIN_RATING, NEVER_RATED, RatingError, RatingOutcome};
use crate::data::repositories::{CardRepository, RatingRepository};
use crate::metrics::{LOG_SINK, MetricsSink};

const MAX_INSERT_ATTEMPTS: u32 = 5;
const BACKOFF_MIN_MS: u64 = 20;
const BACKOFF_MAX_MS: u64 = 200;

/// Records user ratings and keeps each card's embedded aggregate in step
/// with its rating rows.
///
/// Two users rating the same card concurrently can interleave so that the
/// aggregate briefly reflects only one of them; the next recomputation
/// repairs it because aggregates are always derived from the full rating
/// set. Accepted trade-off.
pub struct RatingEngine<'a> {
    conn: &'a mut SqliteConnection,
    sink: &'a dyn MetricsSink,
}

impl<'a> RatingEngine<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        RatingEngine {
            conn,
            sink: &LOG_SINK,
        }
    }

    pub fn with_sink(conn: &'a mut SqliteConnection, sink: &'a dyn MetricsSink) -> Self {
        RatingEngine { conn, sink }
    }

    /// Upserts one user's rating of one card, then recomputes the card
    /// aggregate if the value actually changed.
    ///
    /// First-time raters can race on the (user, card) uniqueness
    /// constraint; a losing insert re-runs the read-or-insert sequence
    /// after a short randomized pause, a bounded number of times. The
    /// conflict only surfaces once retries are exhausted.
    pub fn set_rating(
        &mut self,
        user_id: i32,
        card_id: i32,
        rating: i32,
    ) -> Result<RatingOutcome, RatingError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(RatingError::InvalidRating(rating));
        }

        let mut attempt = 1;
        let outcome = loop {
            match RatingRepository::find(self.conn, user_id, card_id)? {
                Some(previous) if previous == rating => {
                    break RatingOutcome {
                        previous_rating: previous,
                        existed: true,
                        changed: false,
                    };
                }
                Some(previous) => {
                    RatingRepository::update(self.conn, user_id, card_id, rating)?;
                    break RatingOutcome {
                        previous_rating: previous,
                        existed: true,
                        changed: true,
                    };
                }
                None => match RatingRepository::insert(self.conn, user_id, card_id, rating) {
                    Ok(()) => {
                        break RatingOutcome {
                            previous_rating: NEVER_RATED,
                            existed: false,
                            changed: true,
                        };
                    }
                    Err(err @ DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                        if attempt >= MAX_INSERT_ATTEMPTS {
                            return Err(RatingError::ConflictRetriesExhausted {
                                attempts: attempt,
                                source: err,
                            });
                        }
                        let delay =
                            rand::thread_rng().gen_range(BACKOFF_MIN_MS..=BACKOFF_MAX_MS);
                        log::warn!(
                            "Concurrent first rating for card {} by user {}, retrying in {}ms",
                            card_id,
                            user_id,
                            delay
                        );
                        thread::sleep(StdDuration::from_millis(delay));
                        attempt += 1;
                    }
                    Err(err) => return Err(err.into()),
                },
            }
        };

        if outcome.changed {
            recompute_card_aggregate(self.conn, card_id)?;
        }

        self.sink.emit(
            "rating.set_rating",
            &[
                ("card_id", card_id.to_string()),
                ("rating", rating.to_string()),
                ("previous_rating", outcome.previous_rating.to_string()),
                ("changed", outcome.changed.to_string()),
            ],
        );
        Ok(outcome)
    }
}

/// Rewrites the card's embedded aggregate from the full rating set:
/// arithmetic mean and row count, 0/0 when no ratings exist.
pub fn recompute_card_aggregate(
    conn: &mut SqliteConnection,
    card_id: i32,
) -> Result<(f64, i32), DieselError> {
    let ratings = RatingRepository::ratings_for_card(conn, card_id)?;
    let count = ratings.len() as i32;
    let average = if ratings.is_empty() {
        0.0
    } else {
        ratings.iter().sum::<i32>() as f64 / count as f64
    };
    CardRepository::write_aggregate(conn, card_id, average, count)?;
    Ok((average, count))
}
