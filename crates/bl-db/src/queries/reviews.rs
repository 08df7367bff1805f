//! Review CRUD operations.
//!
//! These functions take a plain `&Connection` so they compose inside a
//! caller-owned transaction. Validation happens before they are called;
//! the table's CHECK constraints are the last line of defence.

use bl_core::review::format_visit_date;
use bl_core::{Error, NewReview, Result, Review, ReviewId};
use rusqlite::Connection;

use crate::migrations::write_error;
use crate::models::{review_from_row, REVIEW_COLUMNS};

fn to_sql_limit(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Insert a review and return it with its storage-assigned id.
pub fn insert_review(conn: &Connection, review: &NewReview) -> Result<Review> {
    conn.execute(
        "INSERT INTO reviews (shop_name, burger_name, rating, rating_style, rating_volume,
            rating_patty, rating_buns, rating_sauce, price, visit_date, image_url, tags, comment)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        rusqlite::params![
            review.shop_name,
            review.burger_name,
            review.rating.get(),
            review.rating_style.get(),
            review.rating_volume.get(),
            review.rating_patty.get(),
            review.rating_buns.get(),
            review.rating_sauce.get(),
            review.price,
            format_visit_date(&review.visit_date),
            review.image_url,
            review.tags,
            review.comment,
        ],
    )
    .map_err(write_error)?;

    Ok(Review {
        id: ReviewId::from_raw(conn.last_insert_rowid()),
        fields: review.clone(),
    })
}

/// Get a review by id.
pub fn get_review(conn: &Connection, id: ReviewId) -> Result<Option<Review>> {
    let result = conn.query_row(
        &format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = ?1"),
        [id.get()],
        review_from_row,
    );
    match result {
        Ok(r) => Ok(Some(r)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List a page of reviews ordered by id.
pub fn list_reviews(conn: &Connection, offset: u64, limit: u64) -> Result<Vec<Review>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews ORDER BY id LIMIT ?1 OFFSET ?2"
        ))
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map(
            rusqlite::params![to_sql_limit(limit), to_sql_limit(offset)],
            review_from_row,
        )
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// List every review ordered by id.
pub fn list_all_reviews(conn: &Connection) -> Result<Vec<Review>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {REVIEW_COLUMNS} FROM reviews ORDER BY id"))
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], review_from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Overwrite every column of an existing review.
pub fn update_review(conn: &Connection, review: &Review) -> Result<bool> {
    let f = &review.fields;
    let n = conn
        .execute(
            "UPDATE reviews SET shop_name = ?1, burger_name = ?2, rating = ?3, rating_style = ?4,
                rating_volume = ?5, rating_patty = ?6, rating_buns = ?7, rating_sauce = ?8,
                price = ?9, visit_date = ?10, image_url = ?11, tags = ?12, comment = ?13
             WHERE id = ?14",
            rusqlite::params![
                f.shop_name,
                f.burger_name,
                f.rating.get(),
                f.rating_style.get(),
                f.rating_volume.get(),
                f.rating_patty.get(),
                f.rating_buns.get(),
                f.rating_sauce.get(),
                f.price,
                format_visit_date(&f.visit_date),
                f.image_url,
                f.tags,
                f.comment,
                review.id.get(),
            ],
        )
        .map_err(write_error)?;
    Ok(n > 0)
}

/// Delete a review.
pub fn delete_review(conn: &Connection, id: ReviewId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM reviews WHERE id = ?1", [id.get()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// Count stored reviews.
pub fn count_reviews(conn: &Connection) -> Result<u64> {
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM reviews", [], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n as u64)
}
