//! Market data and news ingestion.
//!
//! * [`providers`] fetches OHLCV bars and hands them back as ordered
//!   [`BarTable`](models::bar_table::BarTable)s.
//! * [`news`] reads a ticker's news table into [`NewsItem`](models::news::NewsItem)s.
//! * [`io`] writes bar tables out (Feather, behind the `ipc` feature).

#[cfg(feature = "cli")]
pub mod cli;
pub mod errors;
pub mod io;
pub mod models;
pub mod news;
pub mod providers;

pub use errors::Error;
