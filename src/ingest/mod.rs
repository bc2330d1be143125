//! Periodic ingestion of oncology registries.
//!
//! Data flows one way: adapter, extractor, classifier, upsert, store. Each
//! adapter pulls its terms sequentially through the retry policy and the
//! delay gate; [`service::ScraperService`] runs adapters side by side and
//! writes one run-log row per invocation.

pub mod classify;
pub mod extract;
pub mod pacing;
pub mod registry;
pub mod retry;
pub mod service;
pub mod source;
pub mod upsert;

pub use service::ScraperService;
