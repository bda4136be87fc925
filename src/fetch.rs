//! Fetch orchestration
//!
//! Every listing request gets a token. Only the request holding the newest
//! token may render its result or write it to the cache; older requests are
//! cancelled and their results dropped.

pub mod orchestrator;
pub mod tokens;

pub use orchestrator::{FetchOrchestrator, ListingView, RefreshOutcome};
pub use tokens::{FetchTicket, FetchTokens};
