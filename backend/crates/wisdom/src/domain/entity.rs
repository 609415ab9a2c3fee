//! Quote entity

use std::fmt;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Quote {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub author: Option<String>,
}

/// Rendered as the text sent to the peer
impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.author {
            Some(author) => write!(f, "{} ({})", self.text, author),
            None => write!(f, "{}", self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_author() {
        let quote = Quote {
            id: "q".to_string(),
            text: "Well done is better than well said.".to_string(),
            author: Some("Benjamin Franklin".to_string()),
        };
        assert_eq!(
            quote.to_string(),
            "Well done is better than well said. (Benjamin Franklin)"
        );
    }

    #[test]
    fn test_author_is_optional() {
        let quote: Quote = serde_json::from_str(r#"{"id": "q", "text": "quote_1"}"#).unwrap();
        assert_eq!(quote.author, None);
        assert_eq!(quote.to_string(), "quote_1");
    }
}
