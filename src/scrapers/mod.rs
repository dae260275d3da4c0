//! HTML parsers for the two kinds of WCRJ pages.
//!
//! | Page | Module | Produces |
//! |------|--------|----------|
//! | Topic listing | [`listing`] | [`ArticleRecord`](crate::models::ArticleRecord) per article |
//! | Article detail | [`detail`] | [`AbstractRecord`](crate::models::AbstractRecord) per article |
//!
//! Parsers only read already-fetched documents; fetching lives in
//! [`crate::fetch`] and orchestration in [`crate::pipeline`].

pub mod detail;
pub mod listing;
