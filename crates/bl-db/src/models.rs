//! Row mapping between the `reviews` table and [`bl_core::Review`].

use bl_core::review::parse_visit_date;
use bl_core::{NewReview, Rating, Review, ReviewId};
use rusqlite::types::Type;

/// Column list matching [`review_from_row`].
pub const REVIEW_COLUMNS: &str = "id, shop_name, burger_name, rating, rating_style, rating_volume, \
     rating_patty, rating_buns, rating_sauce, price, visit_date, image_url, tags, comment";

fn conversion_error(idx: usize, ty: Type, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, msg.into())
}

fn rating_at(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Rating> {
    let raw: i64 = row.get(idx)?;
    Rating::new(raw)
        .ok_or_else(|| conversion_error(idx, Type::Integer, format!("rating {raw} out of range")))
}

/// Build a [`Review`] from a row selected with [`REVIEW_COLUMNS`].
pub fn review_from_row(row: &rusqlite::Row) -> rusqlite::Result<Review> {
    let raw_date: String = row.get(10)?;
    let visit_date = parse_visit_date(&raw_date).ok_or_else(|| {
        conversion_error(10, Type::Text, format!("invalid visit_date {raw_date:?}"))
    })?;

    Ok(Review {
        id: ReviewId::from_raw(row.get(0)?),
        fields: NewReview {
            shop_name: row.get(1)?,
            burger_name: row.get(2)?,
            rating: rating_at(row, 3)?,
            rating_style: rating_at(row, 4)?,
            rating_volume: rating_at(row, 5)?,
            rating_patty: rating_at(row, 6)?,
            rating_buns: rating_at(row, 7)?,
            rating_sauce: rating_at(row, 8)?,
            price: row.get(9)?,
            visit_date,
            image_url: row.get(11)?,
            tags: row.get(12)?,
            comment: row.get(13)?,
        },
    })
}
