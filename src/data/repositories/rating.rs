use diesel::prelude::*;

use crate::data::models::CardRating;
use crate::schema::card_ratings;

pub struct RatingRepository;

impl RatingRepository {
    pub fn find(
        conn: &mut SqliteConnection,
        user_id: i32,
        card_id: i32,
    ) -> Result<Option<i32>, diesel::result::Error> {
        card_ratings::table
            .find((user_id, card_id))
            .select(card_ratings::rating)
            .first(conn)
            .optional()
    }

    /// Plain insert, no conflict clause: a concurrent first-time rater must
    /// surface as a unique-violation error so the caller's retry loop sees it.
    pub fn insert(
        conn: &mut SqliteConnection,
        user_id: i32,
        card_id: i32,
        rating: i32,
    ) -> Result<(), diesel::result::Error> {
        diesel::insert_into(card_ratings::table)
            .values(&CardRating {
                user_id,
                card_id,
                rating,
            })
            .execute(conn)?;
        Ok(())
    }

    pub fn update(
        conn: &mut SqliteConnection,
        user_id: i32,
        card_id: i32,
        rating: i32,
    ) -> Result<(), diesel::result::Error> {
        diesel::update(card_ratings::table.find((user_id, card_id)))
            .set(card_ratings::rating.eq(rating))
            .execute(conn)?;
        Ok(())
    }

    /// The authoritative rating set for one card. Aggregates are always
    /// derived from this, never updated incrementally.
    pub fn ratings_for_card(
        conn: &mut SqliteConnection,
        card_id: i32,
    ) -> Result<Vec<i32>, diesel::result::Error> {
        card_ratings::table
            .filter(card_ratings::card_id.eq(card_id))
            .select(card_ratings::rating)
            .load(conn)
    }
}
