//! Word of Wisdom
//!
//! The resource guarded by the PoW gate: hands every admitted client one random
//! quote and closes the connection.
//!
//! - `domain/` - Quote entity and store trait
//! - `application/` - Quote selection
//! - `infra/` - Bundled quote source
//! - `presentation/` - Connection handler

pub mod application;
pub mod domain;
pub mod infra;
pub mod presentation;

pub use application::service::WordOfWisdomService;
pub use domain::entity::Quote;
pub use domain::repository::QuoteStore;
pub use infra::embedded::EmbeddedQuotes;
pub use presentation::handler::WordOfWisdomHandler;
