use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::data::models::{CardDeckState, Deck};
use crate::schema::{card_deck_states, decks};

pub struct CardDeckStateRepository;

impl CardDeckStateRepository {
    pub fn find(
        conn: &mut SqliteConnection,
        deck_id: i32,
        card_id: i32,
    ) -> Result<Option<CardDeckState>, diesel::result::Error> {
        card_deck_states::table
            .find((deck_id, card_id))
            .select(CardDeckState::as_select())
            .first(conn)
            .optional()
    }

    /// Loads every state row in one query; BulkTransition compares the
    /// result against the requested id set before touching anything.
    pub fn load_for_cards(
        conn: &mut SqliteConnection,
        deck_id: i32,
        card_ids: &[i32],
    ) -> Result<Vec<CardDeckState>, diesel::result::Error> {
        card_deck_states::table
            .filter(card_deck_states::deck_id.eq(deck_id))
            .filter(card_deck_states::card_id.eq_any(card_ids))
            .select(CardDeckState::as_select())
            .load(conn)
    }

    pub fn save(
        conn: &mut SqliteConnection,
        state: &CardDeckState,
    ) -> Result<(), diesel::result::Error> {
        diesel::update(card_deck_states::table.find((state.deck_id, state.card_id)))
            .set(state)
            .execute(conn)?;
        Ok(())
    }

    /// Cards in the deck that are learned (heap >= 1) and past their expiry.
    pub fn due_in_deck(
        conn: &mut SqliteConnection,
        deck_id: i32,
        now: NaiveDateTime,
    ) -> Result<Vec<CardDeckState>, diesel::result::Error> {
        card_deck_states::table
            .filter(card_deck_states::deck_id.eq(deck_id))
            .filter(card_deck_states::current_heap.ge(1))
            .filter(card_deck_states::expiry_date.le(now))
            .order_by(card_deck_states::expiry_date.asc())
            .select(CardDeckState::as_select())
            .load(conn)
    }

    /// Per-heap card counts for a deck, ordered by heap.
    pub fn heap_distribution(
        conn: &mut SqliteConnection,
        deck_id: i32,
    ) -> Result<Vec<(i32, i64)>, diesel::result::Error> {
        card_deck_states::table
            .filter(card_deck_states::deck_id.eq(deck_id))
            .group_by(card_deck_states::current_heap)
            .select((card_deck_states::current_heap, diesel::dsl::count_star()))
            .order_by(card_deck_states::current_heap.asc())
            .load(conn)
    }

    pub fn find_deck(
        conn: &mut SqliteConnection,
        deck_id: i32,
    ) -> Result<Option<Deck>, diesel::result::Error> {
        decks::table
            .find(deck_id)
            .select(Deck::as_select())
            .first(conn)
            .optional()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::DEFAULT_POLICY_ID;
    use crate::test_support::{seed_deck, seed_state, seed_user, test_conn};

    #[test]
    fn save_round_trips_a_mutated_row() {
        let mut conn = test_conn();
        seed_user(&mut conn, 1);
        seed_deck(&mut conn, 1, 1, DEFAULT_POLICY_ID);
        seed_state(&mut conn, 1, 10, 2, 2);

        let mut state = CardDeckStateRepository::find(&mut conn, 1, 10)
            .unwrap()
            .unwrap();
        state.current_heap = 3;
        state.times_in_unknown_heap = 4;
        CardDeckStateRepository::save(&mut conn, &state).unwrap();

        let reread = CardDeckStateRepository::find(&mut conn, 1, 10)
            .unwrap()
            .unwrap();
        assert_eq!(reread, state);
    }

    #[test]
    fn heap_distribution_counts_per_heap() {
        let mut conn = test_conn();
        seed_user(&mut conn, 1);
        seed_deck(&mut conn, 1, 1, DEFAULT_POLICY_ID);
        for (card, heap) in [(10, 0), (11, 0), (12, 2), (13, 2), (14, 5)] {
            seed_state(&mut conn, 1, card, heap, heap);
        }

        let distribution = CardDeckStateRepository::heap_distribution(&mut conn, 1).unwrap();
        assert_eq!(distribution, vec![(0, 2), (2, 2), (5, 1)]);
    }

    #[test]
    fn find_deck_reads_the_policy_binding() {
        let mut conn = test_conn();
        seed_user(&mut conn, 1);
        seed_deck(&mut conn, 1, 1, 3);

        let deck = CardDeckStateRepository::find_deck(&mut conn, 1)
            .unwrap()
            .unwrap();
        assert_eq!(deck.heaping_policy_id, 3);
        assert!(
            CardDeckStateRepository::find_deck(&mut conn, 2)
                .unwrap()
                .is_none()
        );
    }
}
