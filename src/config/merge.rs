//! Source composition for [`ShelfConfig`](super::ShelfConfig).

pub mod policy;
pub mod service;
