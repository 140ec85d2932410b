use diesel::{
    SqliteConnection,
    r2d2::{ConnectionManager, Pool},
};

pub mod data;
pub mod learning;
pub mod maintenance;
pub mod metrics;
pub mod rating;
pub mod scheduling;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::data::models::{
    BulkMoveReport, CardDeckState, MoveOutcome, RatingOutcome, RecomputeReport, RatingError,
    SchedulerError,
};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Highest heap a card can reach within a deck.
pub const MAX_HEAP: i32 = 15;
/// The distinguished "not yet learned" heap.
pub const UNKNOWN_HEAP: i32 = 0;

/// Builds the connection pool from `DATABASE_URL` (falls back to a local file).
pub fn init_pool() -> Result<DbPool, r2d2::Error> {
    dotenv::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://learning.db".into());

    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder().build(manager)
}
