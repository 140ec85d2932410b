use diesel::prelude::*;

use crate::data::models::Card;
use crate::schema::cards;

pub struct CardRepository;

impl CardRepository {
    /// (card_id, average_rating, rating_count) for the whole corpus.
    pub fn all_aggregates(
        conn: &mut SqliteConnection,
    ) -> Result<Vec<(i32, f64, i32)>, diesel::result::Error> {
        cards::table
            .select((cards::card_id, cards::average_rating, cards::rating_count))
            .load(conn)
    }

    pub fn public_cards(conn: &mut SqliteConnection) -> Result<Vec<Card>, diesel::result::Error> {
        cards::table
            .filter(cards::is_public.eq(true))
            .select(Card::as_select())
            .load(conn)
    }

    pub fn write_aggregate(
        conn: &mut SqliteConnection,
        card_id: i32,
        average_rating: f64,
        rating_count: i32,
    ) -> Result<(), diesel::result::Error> {
        diesel::update(cards::table.find(card_id))
            .set((
                cards::average_rating.eq(average_rating),
                cards::rating_count.eq(rating_count),
            ))
            .execute(conn)?;
        Ok(())
    }
}
