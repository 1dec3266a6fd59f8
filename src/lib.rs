//! Funding-rate history lookups for perpetual futures, cached per hour and
//! fetched in bounded-concurrency batches, plus the HTTP surface that serves
//! them.

pub mod api;
pub mod collateral;
pub mod config;
pub mod errors;
pub mod exchanges;
pub mod funding;
pub mod models;
