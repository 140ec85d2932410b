pub mod card_models;
pub mod rating_models;
pub mod scheduler_models;

pub use card_models::{Card, Deck};
pub use rating_models::{
    CardRating, MAX_RATING, MIN_RATING, NEVER_RATED, RatingError, RatingOutcome, RecomputeReport,
};
pub use scheduler_models::{
    BulkMoveReport, CardDeckState, EXPIRY_SENTINEL, MoveOutcome, SchedulerError,
};
