//! The review service: validated CRUD plus bulk import/export.

use bl_core::{Error, Result, Review, ReviewCreate, ReviewId, ReviewUpdate, ValidationErrors};

use crate::pool::{begin_write, get_conn, DbPool};
use crate::queries::reviews;

/// Review lifecycle operations over a connection pool.
///
/// Each call acquires its own pooled connection; multi-statement operations
/// run inside a single transaction.
#[derive(Clone)]
pub struct ReviewCatalog {
    pool: DbPool,
}

impl ReviewCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Validate `input` and persist it under a fresh id.
    pub fn create(&self, input: ReviewCreate) -> Result<Review> {
        let review = input.validate()?;
        let conn = get_conn(&self.pool)?;
        let created = reviews::insert_review(&conn, &review)?;
        tracing::info!(id = %created.id, shop = %created.fields.shop_name, "Created review");
        Ok(created)
    }

    /// A page of reviews ordered by id.
    pub fn list(&self, offset: u64, limit: u64) -> Result<Vec<Review>> {
        let conn = get_conn(&self.pool)?;
        reviews::list_reviews(&conn, offset, limit)
    }

    pub fn get(&self, id: ReviewId) -> Result<Review> {
        let conn = get_conn(&self.pool)?;
        reviews::get_review(&conn, id)?.ok_or_else(|| Error::not_found("review", id))
    }

    /// Apply the fields present in `patch` and return the updated record.
    pub fn update(&self, id: ReviewId, patch: ReviewUpdate) -> Result<Review> {
        let changes = patch.validate()?;

        let mut conn = get_conn(&self.pool)?;
        let tx = begin_write(&mut conn)?;

        let mut review =
            reviews::get_review(&tx, id)?.ok_or_else(|| Error::not_found("review", id))?;
        if changes.is_empty() {
            return Ok(review);
        }

        changes.apply(&mut review.fields);
        reviews::update_review(&tx, &review)?;
        tx.commit().map_err(|e| Error::database(e.to_string()))?;

        tracing::info!(%id, "Updated review");
        Ok(review)
    }

    pub fn delete(&self, id: ReviewId) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        if !reviews::delete_review(&conn, id)? {
            return Err(Error::not_found("review", id));
        }
        tracing::info!(%id, "Deleted review");
        Ok(())
    }

    /// Every review, ordered by id.
    pub fn export(&self) -> Result<Vec<Review>> {
        let conn = get_conn(&self.pool)?;
        reviews::list_all_reviews(&conn)
    }

    /// Create one review per record, all or nothing.
    ///
    /// Any `id` carried by a record is ignored. Every record is validated
    /// before anything is written; failures are reported with the record
    /// index as a path prefix, e.g. `[2].rating`.
    pub fn import(&self, records: Vec<serde_json::Value>) -> Result<usize> {
        let mut errors = ValidationErrors::new();
        let mut valid = Vec::with_capacity(records.len());

        for (i, record) in records.into_iter().enumerate() {
            match ReviewCreate::from_record(record).and_then(ReviewCreate::validate) {
                Ok(review) => valid.push(review),
                Err(Error::Validation(e)) => errors.extend_prefixed(&format!("[{i}]"), e),
                Err(e) => return Err(e),
            }
        }
        errors.into_result()?;

        let mut conn = get_conn(&self.pool)?;
        let tx = begin_write(&mut conn)?;
        for review in &valid {
            reviews::insert_review(&tx, review)?;
        }
        tx.commit().map_err(|e| Error::database(e.to_string()))?;

        tracing::info!(imported = valid.len(), "Imported reviews");
        Ok(valid.len())
    }

    pub fn count(&self) -> Result<u64> {
        let conn = get_conn(&self.pool)?;
        reviews::count_reviews(&conn)
    }
}
