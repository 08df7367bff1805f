//! bl-core: shared review model, validation, errors, and configuration.
//!
//! This crate is the foundational dependency for all other bl-* crates,
//! providing the bounded rating type, the review create/patch contract,
//! a unified error type, and application configuration.

pub mod config;
pub mod error;
pub mod ids;
pub mod rating;
pub mod review;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, FieldError, Result, ValidationErrors};
pub use ids::ReviewId;
pub use rating::{Rating, RatingAxis};
pub use review::{NewReview, Review, ReviewChanges, ReviewCreate, ReviewUpdate};
