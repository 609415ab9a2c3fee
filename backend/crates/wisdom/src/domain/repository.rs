//! Repository Traits
//!
//! Interfaces for quote lookup. Implementations live in the infra layer.

use kernel::error::app_error::AppResult;

use crate::domain::entity::Quote;

/// Quote store trait
#[trait_variant::make(QuoteStore: Send)]
pub trait LocalQuoteStore {
    /// Get a quote by id
    async fn get(&self, id: &str) -> AppResult<Option<Quote>>;

    /// All stored quote ids
    async fn ids(&self) -> AppResult<Vec<String>>;
}
