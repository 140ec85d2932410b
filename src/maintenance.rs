// maintenance.rs
//
// Full-scan repair jobs for the rating corpus. Both are idempotent and
// only write rows whose stored value differs from the recomputed one, so
// they are safe to run after bulk imports or on detected drift.
use diesel::prelude::*;

use crate::data::models::{Card, RatingError, RecomputeReport};
use crate::data::repositories::{CardRepository, RatingRepository};
use crate::rating::recompute_card_aggregate;

/// Recomputes every card's average/count from its rating rows, rewriting
/// only the aggregates that drifted.
pub fn refresh_average_ratings(
    conn: &mut SqliteConnection,
) -> Result<RecomputeReport, RatingError> {
    let aggregates = CardRepository::all_aggregates(conn)?;
    let mut report = RecomputeReport {
        scanned: aggregates.len(),
        changed: 0,
    };

    for (card_id, stored_average, stored_count) in aggregates {
        let ratings = RatingRepository::ratings_for_card(conn, card_id)?;
        let count = ratings.len() as i32;
        let average = if ratings.is_empty() {
            0.0
        } else {
            ratings.iter().sum::<i32>() as f64 / count as f64
        };

        if count != stored_count || average != stored_average {
            CardRepository::write_aggregate(conn, card_id, average, count)?;
            report.changed += 1;
        }
    }

    log::info!(
        "refresh_average_ratings: scanned {} cards, rewrote {}",
        report.scanned,
        report.changed
    );
    Ok(report)
}

/// Auto-rates every public card on behalf of `bot_user_id` using the
/// content heuristic, touching only rows whose rating would change.
pub fn rate_all_public_cards(
    conn: &mut SqliteConnection,
    bot_user_id: i32,
) -> Result<RecomputeReport, RatingError> {
    let cards = CardRepository::public_cards(conn)?;
    let mut report = RecomputeReport {
        scanned: cards.len(),
        changed: 0,
    };

    for card in cards {
        let target = heuristic_rating(&card);
        match RatingRepository::find(conn, bot_user_id, card.card_id)? {
            Some(existing) if existing == target => continue,
            Some(_) => RatingRepository::update(conn, bot_user_id, card.card_id, target)?,
            None => RatingRepository::insert(conn, bot_user_id, card.card_id, target)?,
        }
        recompute_card_aggregate(conn, card.card_id)?;
        report.changed += 1;
    }

    log::info!(
        "rate_all_public_cards: scanned {} cards, rated {}",
        report.scanned,
        report.changed
    );
    Ok(report)
}

/// Cards carrying extra material earn more stars: base 2, +1 for
/// free-text notes, +1 for source references.
fn heuristic_rating(card: &Card) -> i32 {
    let mut rating = 2;
    if !card.notes.trim().is_empty() {
        rating += 1;
    }
    if !card.source_refs.trim().is_empty() {
        rating += 1;
    }
    rating
}
