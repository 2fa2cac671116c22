//! Quote of the day from ZenQuotes.

use crate::config::QuoteConfig;
use crate::fetch::FetchError;
use log::info;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ZenQuote {
    /// Quote text
    pub q: String,
    /// Author
    pub a: String,
}

/// `"<quote>" - <author>`
pub fn format_quote(quote: &ZenQuote) -> String {
    format!("\"{}\" - {}", quote.q, quote.a)
}

/// Fetch a random quote, formatted for the footer but not yet wrapped.
pub async fn fetch(client: &reqwest::Client, config: &QuoteConfig) -> Result<String, FetchError> {
    let quotes: Vec<ZenQuote> = client
        .get(&config.url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let quote = quotes.first().ok_or(FetchError::MissingData("quote"))?;
    info!("💬 Quote by {}", quote.a);
    Ok(format_quote(quote))
}
