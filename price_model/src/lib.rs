//! Turns a [`BarTable`](feed_reader::models::bar_table::BarTable) into
//! supervised-learning samples and labels price moves.
//!
//! The stages are plain functions that take exactly what they need:
//!
//! ```text
//! BarTable ─► NormalizedSeries ─► Samples ─► Learner ─► scaled closes ─► prices
//!             series             samples    learner                      series
//! ```
//!
//! [`session`] strings them together; [`classify`] is independent of all of it.

pub mod classify;
pub mod config;
pub mod errors;
pub mod learner;
pub mod metrics;
pub mod samples;
pub mod scaling;
pub mod series;
pub mod session;
pub mod timer;

pub use errors::Error;
