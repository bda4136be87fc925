//! Cloudshelf: project folders over object storage
//!
//! A file-manager core over a blob store. Folders are top-level prefixes,
//! optionally described by a JSON marker object. Listings are fetched through
//! a TTL cache with optimistic rendering, and a monotonic fetch token keeps a
//! slow response for an old context from overwriting a newer one. Mutations
//! pass through an admin gate and invalidate exactly the cached listings
//! they change.

pub mod auth;
pub mod cache;
pub mod clock;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod fetch;
pub mod listing;
pub mod logging;
pub mod marker;
pub mod navigation;
pub mod session;
pub mod storage;
pub mod tooling;
pub mod types;
pub mod upload;
pub mod view;
