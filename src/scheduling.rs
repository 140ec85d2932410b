// scheduling.rs
use chrono::{DateTime, Duration, Utc};

use crate::data::models::SchedulerError;

/// Policy id stored on a deck when nothing else was chosen.
pub const DEFAULT_POLICY_ID: i32 = 1;

/// An expiry-calculation strategy. Pure and stateless: heap level and last
/// review time in, next due time out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingPolicy {
    /// interval = 2^heap days. The production policy.
    DoublingInterval,
    /// interval = heap days. Predictable steps for acceptance testing.
    DaysPerHeap,
    /// Fixed ten minutes regardless of heap, for fast manual iteration.
    ShortInterval,
}

impl SchedulingPolicy {
    /// When the card becomes due again after a review at `last_learn`.
    ///
    /// Heap 0 has no expiry concept; callers never ask for one.
    pub fn expiry_date(
        self,
        heap: i32,
        last_learn: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, SchedulerError> {
        if heap < 1 {
            return Err(SchedulerError::InvalidHeap(heap));
        }

        let interval = match self {
            SchedulingPolicy::DoublingInterval => Duration::days(1i64 << heap),
            SchedulingPolicy::DaysPerHeap => Duration::days(heap as i64),
            SchedulingPolicy::ShortInterval => Duration::minutes(10),
        };

        Ok(last_learn + interval)
    }

    pub fn has_expired(
        self,
        heap: i32,
        last_learn: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<bool, SchedulerError> {
        Ok(self.expiry_date(heap, last_learn)? <= now)
    }
}

/// The fixed set of policies a deck can be bound to, looked up by the
/// integer id the deck row stores. Built once at startup and passed by
/// reference into whatever needs it; never mutated afterwards.
pub struct PolicyRegistry {
    entries: Vec<(i32, SchedulingPolicy)>,
}

impl PolicyRegistry {
    pub fn standard() -> Self {
        PolicyRegistry {
            entries: vec![
                (DEFAULT_POLICY_ID, SchedulingPolicy::DoublingInterval),
                (2, SchedulingPolicy::DaysPerHeap),
                (3, SchedulingPolicy::ShortInterval),
            ],
        }
    }

    pub fn get(&self, id: i32) -> Result<SchedulingPolicy, SchedulerError> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, policy)| *policy)
            .ok_or(SchedulerError::UnknownPolicy(id))
    }

    /// Valid ids in registration order, for deck-configuration UIs.
    pub fn valid_ids(&self) -> Vec<i32> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }
}
