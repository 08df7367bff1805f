//! Database query modules.

pub mod reviews;
