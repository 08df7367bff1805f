//! The review model and its input contract.
//!
//! Incoming payloads ([`ReviewCreate`], [`ReviewUpdate`]) are deserialized
//! loosely and then validated into strongly typed values ([`NewReview`],
//! [`ReviewChanges`]) so every rejected field can be reported at once.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result, ValidationErrors};
use crate::ids::ReviewId;
use crate::rating::{Rating, RatingAxis};

/// Canonical textual form of `visit_date`. Fractional seconds are only
/// emitted when non-zero.
pub const VISIT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a visit date-time.
///
/// Accepts ISO 8601 local date-times with minute, second, or sub-second
/// precision, RFC 3339 timestamps with an offset (converted to UTC), and a
/// bare `YYYY-MM-DD` date, which means midnight.
pub fn parse_visit_date(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_utc());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Render a visit date-time in [`VISIT_DATE_FORMAT`].
pub fn format_visit_date(dt: &NaiveDateTime) -> String {
    dt.format(VISIT_DATE_FORMAT).to_string()
}

mod visit_date_serde {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_visit_date(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_visit_date(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid visit_date: {raw}")))
    }
}

// ---------------------------------------------------------------------------
// Stored shapes
// ---------------------------------------------------------------------------

/// A fully validated review that has not been assigned an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NewReview {
    pub shop_name: String,
    pub burger_name: String,
    /// Overall satisfaction 1-5.
    pub rating: Rating,
    /// 1=junk/classic, 5=rich/gourmet.
    pub rating_style: Rating,
    /// 1=light/snack, 5=heavy/massive.
    pub rating_volume: Rating,
    /// 1=balanced/sauce-focused, 5=meaty/steak-like.
    pub rating_patty: Rating,
    /// 1=soft/fluffy, 5=hard/crispy.
    pub rating_buns: Rating,
    /// 1=mild/simple, 5=strong/rich.
    pub rating_sauce: Rating,
    pub price: i64,
    #[serde(with = "visit_date_serde")]
    #[schema(value_type = String, example = "2024-01-15T12:00:00")]
    pub visit_date: NaiveDateTime,
    pub image_url: Option<String>,
    /// Comma-separated labels.
    pub tags: Option<String>,
    pub comment: Option<String>,
}

impl NewReview {
    fn score_mut(&mut self, axis: RatingAxis) -> &mut Rating {
        match axis {
            RatingAxis::Overall => &mut self.rating,
            RatingAxis::Style => &mut self.rating_style,
            RatingAxis::Volume => &mut self.rating_volume,
            RatingAxis::Patty => &mut self.rating_patty,
            RatingAxis::Buns => &mut self.rating_buns,
            RatingAxis::Sauce => &mut self.rating_sauce,
        }
    }
}

/// A persisted review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Review {
    pub id: ReviewId,
    #[serde(flatten)]
    pub fields: NewReview,
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Body of a create request (and of each import record) before validation.
///
/// Every field is optional at this stage so that missing fields are
/// reported alongside out-of-range ones.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct ReviewCreate {
    pub shop_name: Option<String>,
    pub burger_name: Option<String>,
    pub rating: Option<i64>,
    pub rating_style: Option<i64>,
    pub rating_volume: Option<i64>,
    pub rating_patty: Option<i64>,
    pub rating_buns: Option<i64>,
    pub rating_sauce: Option<i64>,
    pub price: Option<i64>,
    #[schema(example = "2024-01-15T12:00:00")]
    pub visit_date: Option<String>,
    pub image_url: Option<String>,
    pub tags: Option<String>,
    pub comment: Option<String>,
}

impl ReviewCreate {
    /// Decode a JSON body. Type mismatches are reported as a validation
    /// error on `body`.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::validation("body", e.to_string()))
    }

    /// Decode one import record, discarding any `id` it carries.
    pub fn from_record(mut value: serde_json::Value) -> Result<Self> {
        match value.as_object_mut() {
            Some(map) => {
                map.remove("id");
            }
            None => return Err(Error::validation("body", "expected a JSON object")),
        }
        Self::from_json(value)
    }

    fn raw_score(&self, axis: RatingAxis) -> Option<i64> {
        match axis {
            RatingAxis::Overall => self.rating,
            RatingAxis::Style => self.rating_style,
            RatingAxis::Volume => self.rating_volume,
            RatingAxis::Patty => self.rating_patty,
            RatingAxis::Buns => self.rating_buns,
            RatingAxis::Sauce => self.rating_sauce,
        }
    }

    /// Check every field and build a [`NewReview`].
    pub fn validate(self) -> Result<NewReview> {
        let mut errors = ValidationErrors::new();

        let shop_name = required_name(&mut errors, "shop_name", self.shop_name.clone());
        let burger_name = required_name(&mut errors, "burger_name", self.burger_name.clone());

        let mut scores = [None; 6];
        for (slot, axis) in scores.iter_mut().zip(RatingAxis::ALL) {
            *slot = match self.raw_score(axis) {
                Some(raw) => check_rating(&mut errors, axis, raw),
                None => {
                    errors.push(axis.field(), "field required");
                    None
                }
            };
        }

        let price = match self.price {
            Some(p) => check_price(&mut errors, p),
            None => {
                errors.push("price", "field required");
                None
            }
        };

        let visit_date = match self.visit_date.as_deref() {
            Some(raw) => check_visit_date(&mut errors, raw),
            None => {
                errors.push("visit_date", "field required");
                None
            }
        };

        match (shop_name, burger_name, scores, price, visit_date) {
            (
                Some(shop_name),
                Some(burger_name),
                [Some(rating), Some(rating_style), Some(rating_volume), Some(rating_patty), Some(rating_buns), Some(rating_sauce)],
                Some(price),
                Some(visit_date),
            ) if errors.is_empty() => Ok(NewReview {
                shop_name,
                burger_name,
                rating,
                rating_style,
                rating_volume,
                rating_patty,
                rating_buns,
                rating_sauce,
                price,
                visit_date,
                image_url: self.image_url,
                tags: self.tags,
                comment: self.comment,
            }),
            _ => Err(Error::Validation(errors)),
        }
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// Deserialize a field so that "present but null" (`Some(None)`) is kept
/// apart from "absent" (`None`, via `#[serde(default)]`).
pub fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body of a partial update. Only fields present in the payload are applied.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct ReviewUpdate {
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub shop_name: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub burger_name: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<i64>)]
    pub rating: Option<Option<i64>>,
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<i64>)]
    pub rating_style: Option<Option<i64>>,
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<i64>)]
    pub rating_volume: Option<Option<i64>>,
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<i64>)]
    pub rating_patty: Option<Option<i64>>,
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<i64>)]
    pub rating_buns: Option<Option<i64>>,
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<i64>)]
    pub rating_sauce: Option<Option<i64>>,
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<i64>)]
    pub price: Option<Option<i64>>,
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub visit_date: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub tags: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub comment: Option<Option<String>>,
}

/// Validated patch: `None` means untouched. For the optional text fields,
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewChanges {
    pub shop_name: Option<String>,
    pub burger_name: Option<String>,
    pub scores: Vec<(RatingAxis, Rating)>,
    pub price: Option<i64>,
    pub visit_date: Option<NaiveDateTime>,
    pub image_url: Option<Option<String>>,
    pub tags: Option<Option<String>>,
    pub comment: Option<Option<String>>,
}

impl ReviewUpdate {
    /// Decode a JSON body. Type mismatches are reported on `body`.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::validation("body", e.to_string()))
    }

    fn raw_score(&self, axis: RatingAxis) -> Option<Option<i64>> {
        match axis {
            RatingAxis::Overall => self.rating,
            RatingAxis::Style => self.rating_style,
            RatingAxis::Volume => self.rating_volume,
            RatingAxis::Patty => self.rating_patty,
            RatingAxis::Buns => self.rating_buns,
            RatingAxis::Sauce => self.rating_sauce,
        }
    }

    /// Check every supplied field.
    pub fn validate(self) -> Result<ReviewChanges> {
        let mut errors = ValidationErrors::new();
        let mut changes = ReviewChanges::default();

        if let Some(value) = self.shop_name.clone() {
            changes.shop_name = required_name(&mut errors, "shop_name", value);
        }
        if let Some(value) = self.burger_name.clone() {
            changes.burger_name = required_name(&mut errors, "burger_name", value);
        }

        for axis in RatingAxis::ALL {
            match self.raw_score(axis) {
                None => {}
                Some(None) => errors.push(axis.field(), "may not be null"),
                Some(Some(raw)) => {
                    if let Some(score) = check_rating(&mut errors, axis, raw) {
                        changes.scores.push((axis, score));
                    }
                }
            }
        }

        match self.price {
            None => {}
            Some(None) => errors.push("price", "may not be null"),
            Some(Some(p)) => changes.price = check_price(&mut errors, p),
        }

        match self.visit_date.as_ref() {
            None => {}
            Some(None) => errors.push("visit_date", "may not be null"),
            Some(Some(raw)) => changes.visit_date = check_visit_date(&mut errors, raw),
        }

        changes.image_url = self.image_url;
        changes.tags = self.tags;
        changes.comment = self.comment;

        errors.into_result()?;
        Ok(changes)
    }
}

impl ReviewChanges {
    /// True when the patch touches nothing.
    pub fn is_empty(&self) -> bool {
        *self == ReviewChanges::default()
    }

    /// Merge the supplied fields into `review`, leaving the rest untouched.
    pub fn apply(self, review: &mut NewReview) {
        if let Some(v) = self.shop_name {
            review.shop_name = v;
        }
        if let Some(v) = self.burger_name {
            review.burger_name = v;
        }
        for (axis, score) in self.scores {
            *review.score_mut(axis) = score;
        }
        if let Some(v) = self.price {
            review.price = v;
        }
        if let Some(v) = self.visit_date {
            review.visit_date = v;
        }
        if let Some(v) = self.image_url {
            review.image_url = v;
        }
        if let Some(v) = self.tags {
            review.tags = v;
        }
        if let Some(v) = self.comment {
            review.comment = v;
        }
    }
}

// ---------------------------------------------------------------------------
// Field checks
// ---------------------------------------------------------------------------

fn required_name(errors: &mut ValidationErrors, field: &str, value: Option<String>) -> Option<String> {
    match value {
        None => {
            errors.push(field, "field required");
            None
        }
        Some(v) if v.trim().is_empty() => {
            errors.push(field, "must not be empty");
            None
        }
        Some(v) => Some(v),
    }
}

fn check_rating(errors: &mut ValidationErrors, axis: RatingAxis, raw: i64) -> Option<Rating> {
    let score = Rating::new(raw);
    if score.is_none() {
        errors.push(
            axis.field(),
            format!(
                "must be between {} and {} ({}), got {raw}",
                Rating::MIN,
                Rating::MAX,
                axis.scale()
            ),
        );
    }
    score
}

fn check_price(errors: &mut ValidationErrors, price: i64) -> Option<i64> {
    if price < 0 {
        errors.push("price", format!("must not be negative, got {price}"));
        None
    } else {
        Some(price)
    }
}

fn check_visit_date(errors: &mut ValidationErrors, raw: &str) -> Option<NaiveDateTime> {
    let parsed = parse_visit_date(raw);
    if parsed.is_none() {
        errors.push("visit_date", format!("invalid date-time: {raw:?}"));
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_body() -> serde_json::Value {
        json!({
            "shop_name": "Joe's",
            "burger_name": "Classic",
            "rating": 4,
            "rating_style": 2,
            "rating_volume": 3,
            "rating_patty": 3,
            "rating_buns": 2,
            "rating_sauce": 3,
            "price": 12,
            "visit_date": "2024-01-15T12:00:00"
        })
    }

    fn sample_review() -> NewReview {
        ReviewCreate::from_json(sample_body())
            .unwrap()
            .validate()
            .unwrap()
    }

    fn validation_fields(err: Error) -> Vec<String> {
        match err {
            Error::Validation(errors) => errors.fields().iter().map(|f| f.field.clone()).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_create() {
        let review = sample_review();
        assert_eq!(review.shop_name, "Joe's");
        assert_eq!(review.rating.get(), 4);
        assert_eq!(review.price, 12);
        assert_eq!(format_visit_date(&review.visit_date), "2024-01-15T12:00:00");
        assert!(review.image_url.is_none());
    }

    #[test]
    fn every_axis_rejects_zero_and_six() {
        for axis in RatingAxis::ALL {
            for bad in [0, 6] {
                let mut body = sample_body();
                body[axis.field()] = json!(bad);
                let err = ReviewCreate::from_json(body).unwrap().validate().unwrap_err();
                assert_eq!(validation_fields(err), vec![axis.field().to_string()]);
            }
        }
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let err = ReviewCreate::from_json(json!({})).unwrap().validate().unwrap_err();
        let fields = validation_fields(err);
        assert_eq!(fields.len(), 10);
        assert!(fields.contains(&"visit_date".to_string()));
        assert!(fields.contains(&"rating_sauce".to_string()));
    }

    #[test]
    fn empty_names_rejected() {
        let mut body = sample_body();
        body["shop_name"] = json!("   ");
        let err = ReviewCreate::from_json(body).unwrap().validate().unwrap_err();
        assert_eq!(validation_fields(err), vec!["shop_name"]);
    }

    #[test]
    fn negative_price_rejected_zero_allowed() {
        let mut body = sample_body();
        body["price"] = json!(-1);
        let err = ReviewCreate::from_json(body.clone()).unwrap().validate().unwrap_err();
        assert_eq!(validation_fields(err), vec!["price"]);

        body["price"] = json!(0);
        assert_eq!(ReviewCreate::from_json(body).unwrap().validate().unwrap().price, 0);
    }

    #[test]
    fn unparsable_date_rejected() {
        let mut body = sample_body();
        body["visit_date"] = json!("last tuesday");
        let err = ReviewCreate::from_json(body).unwrap().validate().unwrap_err();
        assert_eq!(validation_fields(err), vec!["visit_date"]);
    }

    #[test]
    fn wrong_type_is_body_error() {
        let mut body = sample_body();
        body["rating"] = json!("four");
        let err = ReviewCreate::from_json(body).unwrap_err();
        assert_eq!(validation_fields(err), vec!["body"]);
    }

    #[test]
    fn visit_date_formats() {
        let minutes = parse_visit_date("2024-01-15T12:00").unwrap();
        let seconds = parse_visit_date("2024-01-15 12:00:00").unwrap();
        let offset = parse_visit_date("2024-01-15T13:00:00+01:00").unwrap();
        assert_eq!(minutes, seconds);
        assert_eq!(seconds, offset);

        let fractional = parse_visit_date("2024-01-15T12:00:00.250").unwrap();
        assert_eq!(format_visit_date(&fractional), "2024-01-15T12:00:00.250");
        assert!(parse_visit_date("2024-13-40T00:00:00").is_none());

        let date_only = parse_visit_date("2024-01-15").unwrap();
        assert_eq!(format_visit_date(&date_only), "2024-01-15T00:00:00");
        assert!(parse_visit_date("2023-02-29").is_none());
    }

    #[test]
    fn from_record_strips_id() {
        let mut body = sample_body();
        body["id"] = json!(99);
        let input = ReviewCreate::from_record(body).unwrap();
        assert!(input.validate().is_ok());
        assert!(ReviewCreate::from_record(json!([1, 2])).is_err());
    }

    #[test]
    fn review_serializes_flat() {
        let review = Review {
            id: ReviewId::from_raw(1),
            fields: sample_review(),
        };
        let value = serde_json::to_value(&review).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["shop_name"], "Joe's");
        assert_eq!(value["rating_buns"], 2);
        assert_eq!(value["visit_date"], "2024-01-15T12:00:00");
        assert!(value["comment"].is_null());

        let back: Review = serde_json::from_value(value).unwrap();
        assert_eq!(back, review);
    }

    #[test]
    fn patch_distinguishes_absent_from_null() {
        let patch = ReviewUpdate::from_json(json!({"comment": null, "tags": "a,b"})).unwrap();
        assert_eq!(patch.comment, Some(None));
        assert_eq!(patch.tags, Some(Some("a,b".to_string())));
        assert_eq!(patch.image_url, None);
        assert_eq!(patch.rating, None);
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let changes = ReviewUpdate::from_json(json!({})).unwrap().validate().unwrap();
        assert!(changes.is_empty());

        let original = sample_review();
        let mut patched = original.clone();
        changes.apply(&mut patched);
        assert_eq!(patched, original);
    }

    #[test]
    fn rating_only_patch() {
        let changes = ReviewUpdate::from_json(json!({"rating": 3}))
            .unwrap()
            .validate()
            .unwrap();
        let original = sample_review();
        let mut patched = original.clone();
        changes.apply(&mut patched);

        assert_eq!(patched.rating.get(), 3);
        patched.rating = original.rating;
        assert_eq!(patched, original);
    }

    #[test]
    fn patch_validation() {
        let err = ReviewUpdate::from_json(json!({"rating_patty": 6, "shop_name": null, "price": -5}))
            .unwrap()
            .validate()
            .unwrap_err();
        let mut fields = validation_fields(err);
        fields.sort();
        assert_eq!(fields, vec!["price", "rating_patty", "shop_name"]);
    }

    #[test]
    fn patch_null_clears_optional_text() {
        let mut review = sample_review();
        review.comment = Some("juicy".into());
        ReviewUpdate::from_json(json!({"comment": null}))
            .unwrap()
            .validate()
            .unwrap()
            .apply(&mut review);
        assert!(review.comment.is_none());
    }
}
