//! Output generation.
//!
//! - [`json`]: writes `articles.json` and `abstracts.json`

pub mod json;
