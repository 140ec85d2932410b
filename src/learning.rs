// learning.rs
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::data::models::{
    BulkMoveReport, CardDeckState, EXPIRY_SENTINEL, MoveOutcome, SchedulerError,
};
use crate::data::repositories::CardDeckStateRepository;
use crate::metrics::{LOG_SINK, MetricsSink};
use crate::scheduling::PolicyRegistry;
use crate::{MAX_HEAP, UNKNOWN_HEAP};

/// Heap transitions for cards in decks: the live single-step path and the
/// manual bulk path.
///
/// Concurrent writes to the same (deck, card) row from one client are not
/// coordinated here; callers are expected to sequence them. Writes to
/// different rows are independent.
pub struct LearningEngine<'a> {
    conn: &'a mut SqliteConnection,
    registry: &'a PolicyRegistry,
    sink: &'a dyn MetricsSink,
}

impl<'a> LearningEngine<'a> {
    pub fn new(conn: &'a mut SqliteConnection, registry: &'a PolicyRegistry) -> Self {
        LearningEngine {
            conn,
            registry,
            sink: &LOG_SINK,
        }
    }

    pub fn with_sink(
        conn: &'a mut SqliteConnection,
        registry: &'a PolicyRegistry,
        sink: &'a dyn MetricsSink,
    ) -> Self {
        LearningEngine {
            conn,
            registry,
            sink,
        }
    }

    /// Moves one card during a live review: up by exactly one heap, or
    /// back to the unknown heap. Ownership of the deck has already been
    /// checked by the caller.
    ///
    /// `now` is overridable for tests; operational callers pass `None`.
    pub fn move_card(
        &mut self,
        deck_id: i32,
        card_id: i32,
        target_heap: i32,
        now: Option<DateTime<Utc>>,
    ) -> Result<MoveOutcome, SchedulerError> {
        if deck_id <= 0 || card_id <= 0 {
            return Err(SchedulerError::ReservedId);
        }
        if !(UNKNOWN_HEAP..=MAX_HEAP).contains(&target_heap) {
            return Err(SchedulerError::InvalidHeap(target_heap));
        }
        let now = now.unwrap_or_else(Utc::now);

        let registry = self.registry;
        let outcome = self.conn.transaction::<_, SchedulerError, _>(|conn| {
            let mut state = CardDeckStateRepository::find(conn, deck_id, card_id)?
                .ok_or(SchedulerError::NotFound { deck_id, card_id })?;

            // Duplicate calls arrive from client retries; success, no write.
            if state.current_heap == target_heap {
                return Ok(MoveOutcome::AlreadyInTargetHeap);
            }
            if target_heap != UNKNOWN_HEAP && target_heap != state.current_heap + 1 {
                return Err(SchedulerError::InvalidTransition {
                    from: state.current_heap,
                    to: target_heap,
                });
            }

            if target_heap == UNKNOWN_HEAP {
                // Genuine reset: the no-op check above already filtered
                // the "was already unknown" case.
                state.expiry_date = EXPIRY_SENTINEL;
                state.times_in_unknown_heap += 1;
            } else {
                let deck = CardDeckStateRepository::find_deck(conn, deck_id)?
                    .ok_or(SchedulerError::NotFound { deck_id, card_id })?;
                let policy = registry.get(deck.heaping_policy_id)?;
                state.expiry_date = policy.expiry_date(target_heap, now)?.naive_utc();
                if target_heap > state.biggest_heap_reached {
                    state.biggest_heap_reached = target_heap;
                }
            }

            state.last_learn_date = now.naive_utc();
            state.current_heap = target_heap;
            CardDeckStateRepository::save(conn, &state)?;
            Ok(MoveOutcome::Moved)
        })?;

        self.sink.emit(
            "learning.move_card",
            &[
                ("deck_id", deck_id.to_string()),
                ("card_id", card_id.to_string()),
                ("target_heap", target_heap.to_string()),
                (
                    "no_op",
                    (outcome == MoveOutcome::AlreadyInTargetHeap).to_string(),
                ),
            ],
        );
        Ok(outcome)
    }

    /// Manual reassignment of many cards to one heap, outside live review.
    ///
    /// No adjacency constraint, and all-or-nothing: if any requested card
    /// has no state row in the deck, nothing is applied. Moving to a
    /// positive heap deliberately leaves `expiry_date` as it was; only the
    /// live path consults the scheduling policy.
    pub fn move_cards(
        &mut self,
        deck_id: i32,
        card_ids: &[i32],
        target_heap: i32,
    ) -> Result<BulkMoveReport, SchedulerError> {
        if deck_id <= 0 {
            return Err(SchedulerError::ReservedId);
        }
        if !(UNKNOWN_HEAP..=MAX_HEAP).contains(&target_heap) {
            return Err(SchedulerError::InvalidHeap(target_heap));
        }

        let mut requested: Vec<i32> = card_ids.to_vec();
        requested.sort_unstable();
        requested.dedup();

        let report = self.conn.transaction::<_, SchedulerError, _>(|conn| {
            let states = CardDeckStateRepository::load_for_cards(conn, deck_id, &requested)?;
            if states.len() != requested.len() {
                let missing = requested
                    .iter()
                    .filter(|id| !states.iter().any(|s| s.card_id == **id))
                    .copied()
                    .collect();
                return Err(SchedulerError::InconsistentRequest { missing });
            }

            let mut report = BulkMoveReport {
                requested: requested.len(),
                moved: 0,
                unchanged: 0,
            };
            for mut state in states {
                if state.current_heap == target_heap {
                    report.unchanged += 1;
                    continue;
                }
                apply_bulk_move(&mut state, target_heap);
                CardDeckStateRepository::save(conn, &state)?;
                report.moved += 1;
            }
            Ok(report)
        })?;

        self.sink.emit(
            "learning.move_cards",
            &[
                ("deck_id", deck_id.to_string()),
                ("target_heap", target_heap.to_string()),
                ("requested", report.requested.to_string()),
                ("moved", report.moved.to_string()),
            ],
        );
        Ok(report)
    }

    /// Cards in the deck whose stored expiry has passed, oldest first.
    pub fn due_cards(
        &mut self,
        deck_id: i32,
        now: Option<DateTime<Utc>>,
    ) -> Result<Vec<CardDeckState>, SchedulerError> {
        if deck_id <= 0 {
            return Err(SchedulerError::ReservedId);
        }
        let now = now.unwrap_or_else(Utc::now);
        Ok(CardDeckStateRepository::due_in_deck(
            self.conn,
            deck_id,
            now.naive_utc(),
        )?)
    }
}

fn apply_bulk_move(state: &mut CardDeckState, target_heap: i32) {
    if target_heap > state.biggest_heap_reached {
        state.biggest_heap_reached = target_heap;
    }
    if target_heap == UNKNOWN_HEAP {
        state.expiry_date = EXPIRY_SENTINEL;
        state.times_in_unknown_heap += 1;
    }
    state.current_heap = target_heap;
}
