//! Bundled quote source
//!
//! Quotes ship inside the binary as `{"quotes": [{"id", "text", "author"}, ...]}`.

use std::collections::HashMap;

use kernel::error::app_error::{AppError, AppResult};
use serde::Deserialize;

use crate::domain::entity::Quote;
use crate::domain::repository::QuoteStore;

const BUNDLED_QUOTES: &str = include_str!("../../resources/quotes.json");

#[derive(Debug, Deserialize)]
struct QuoteFile {
    quotes: Vec<Quote>,
}

/// Read-only in-memory quote store
#[derive(Debug, Clone, Default)]
pub struct EmbeddedQuotes {
    quotes: HashMap<String, Quote>,
}

impl EmbeddedQuotes {
    /// Load the quotes compiled into the binary
    pub fn bundled() -> AppResult<Self> {
        Self::from_json(BUNDLED_QUOTES)
    }

    /// Parse a quote file; ids must be unique
    pub fn from_json(json: &str) -> AppResult<Self> {
        let file: QuoteFile = serde_json::from_str(json)?;
        let store = Self::from_quotes(file.quotes)?;
        tracing::debug!(count = store.len(), "loaded quotes");
        Ok(store)
    }

    pub fn from_quotes(quotes: impl IntoIterator<Item = Quote>) -> AppResult<Self> {
        let mut by_id = HashMap::new();
        for quote in quotes {
            if by_id.contains_key(&quote.id) {
                return Err(AppError::internal(format!("duplicate quote id {}", quote.id)));
            }
            by_id.insert(quote.id.clone(), quote);
        }
        Ok(Self { quotes: by_id })
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl QuoteStore for EmbeddedQuotes {
    async fn get(&self, id: &str) -> AppResult<Option<Quote>> {
        Ok(self.quotes.get(id).cloned())
    }

    async fn ids(&self) -> AppResult<Vec<String>> {
        Ok(self.quotes.keys().cloned().collect())
    }
}
