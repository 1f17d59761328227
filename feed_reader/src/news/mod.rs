//! News-table reading.
//!
//! A [`NewsSource`] retrieves the raw markup for a ticker; [`finviz::parse_news_table`]
//! turns it into [`NewsItem`]s. Rows that are not headlines (ads, separators)
//! are skipped, never reported as errors.

pub mod finviz;
pub mod html;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

use crate::{errors::NewsError, models::news::NewsItem};

pub use finviz::{FinvizNewsSource, parse_news_table};

/// Something that can hand back a news page for a ticker.
#[async_trait]
pub trait NewsSource {
    async fn fetch_document(&self, symbol: &str) -> Result<String, NewsError>;
}

/// Fetches and parses the news table for `symbol`.
///
/// `today` resolves rows stamped `Today`.
pub async fn fetch_news<S>(
    source: &S,
    symbol: &str,
    today: NaiveDate,
) -> Result<Vec<NewsItem>, NewsError>
where
    S: NewsSource + Sync + ?Sized,
{
    let document = source.fetch_document(symbol).await?;
    let items = parse_news_table(&document, today);
    info!(symbol, items = items.len(), "parsed news table");
    Ok(items)
}
