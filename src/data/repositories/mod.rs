pub mod card;
pub mod card_deck_state;
pub mod rating;

pub use card::CardRepository;
pub use card_deck_state::CardDeckStateRepository;
pub use rating::RatingRepository;
