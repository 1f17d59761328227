use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use reqwest::Client;
use tracing::{debug, warn};

use crate::{
    errors::NewsError,
    models::news::NewsItem,
    news::{
        NewsSource,
        html::{element_by_id, elements, first_element},
    },
};

pub const QUOTE_URL: &str = "https://finviz.com/quote.ashx";
pub const NEWS_TABLE_ID: &str = "news-table";

/// Reads the quote page from finviz.
pub struct FinvizNewsSource {
    client: Client,
    base_url: String,
}

impl FinvizNewsSource {
    pub fn new() -> Result<Self, NewsError> {
        Self::with_base_url(QUOTE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, NewsError> {
        // finviz refuses requests without a user agent
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

fn validate_symbol(symbol: &str) -> Result<(), NewsError> {
    let valid = !symbol.is_empty()
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(NewsError::InvalidSymbol(symbol.to_string()))
    }
}

#[async_trait]
impl NewsSource for FinvizNewsSource {
    async fn fetch_document(&self, symbol: &str) -> Result<String, NewsError> {
        let symbol = symbol.trim();
        validate_symbol(symbol)?;

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("t", symbol.to_uppercase())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NewsError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Extracts headline rows from the `news-table` element.
///
/// The headline is the text of a row's first link and the timestamp the text
/// of its first cell. Rows without both are skipped with a warning.
pub fn parse_news_table(html: &str, today: NaiveDate) -> Vec<NewsItem> {
    let Some(table) = element_by_id(html, NEWS_TABLE_ID) else {
        warn!("no #{NEWS_TABLE_ID} element in document");
        return Vec::new();
    };

    let mut current_date = None;
    let mut items = Vec::new();
    for (row, tr) in elements(table.inner, "tr").into_iter().enumerate() {
        let link = first_element(tr.inner, "a");
        let headline = link.map(|a| a.text()).filter(|t| !t.is_empty());
        let timestamp_text = first_element(tr.inner, "td")
            .map(|td| td.text())
            .filter(|t| !t.is_empty());

        // a skipped row can still open a new day for the rows below it
        let published = timestamp_text
            .as_deref()
            .and_then(|t| resolve_timestamp(t, &mut current_date, today));

        let (Some(headline), Some(timestamp_text)) = (headline, timestamp_text) else {
            warn!(row, "skipping news row without headline or timestamp");
            continue;
        };
        if published.is_none() {
            debug!(row, %timestamp_text, "could not resolve news timestamp");
        }

        items.push(NewsItem {
            headline,
            timestamp_text,
            url: link.and_then(|a| a.attr("href")),
            published,
        });
    }
    items
}

/// Resolves a finviz stamp against the most recent date seen in the table.
///
/// A stamp is `"<date> <time>"` on the first row of a day and `"<time>"` on
/// the rest; the date is `Mon-DD-YY` or `Today`. A stamp with an unreadable
/// date clears `current_date`, so later time-only rows stay unresolved
/// rather than being attached to the wrong day.
pub fn resolve_timestamp(
    text: &str,
    current_date: &mut Option<NaiveDate>,
    today: NaiveDate,
) -> Option<NaiveDateTime> {
    let mut parts = text.split_whitespace();
    let first = parts.next()?;
    let time_part = match parts.next() {
        Some(time) => {
            *current_date = if first.eq_ignore_ascii_case("today") {
                Some(today)
            } else {
                NaiveDate::parse_from_str(first, "%b-%d-%y").ok()
            };
            time
        }
        None => first,
    };
    let time = NaiveTime::parse_from_str(time_part, "%I:%M%p").ok()?;
    Some((*current_date)?.and_time(time))
}
