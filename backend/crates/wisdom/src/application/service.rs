//! Quote selection

use std::sync::Arc;

use kernel::error::app_error::{AppError, AppResult, OptionExt};
use rand::Rng;

use crate::domain::repository::QuoteStore;

/// Picks a uniformly random quote from a store
///
/// Ids are read once at construction; the store is expected not to change.
pub struct WordOfWisdomService<S> {
    store: Arc<S>,
    ids: Vec<String>,
}

impl<S> WordOfWisdomService<S>
where
    S: QuoteStore + Sync,
{
    pub async fn new(store: Arc<S>) -> AppResult<Self> {
        let ids = store.ids().await?;
        Ok(Self { store, ids })
    }

    /// A random quote, rendered for the wire
    pub async fn quote(&self) -> AppResult<String> {
        if self.ids.is_empty() {
            return Err(AppError::not_found("No quotes available"));
        }

        let index = rand::rng().random_range(0..self.ids.len());
        let id = &self.ids[index];
        let quote = self
            .store
            .get(id)
            .await?
            .ok_or_not_found(format!("Quote {id} not found"))?;
        Ok(quote.to_string())
    }
}
