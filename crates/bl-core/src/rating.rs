//! Bounded 1–5 rating scales.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A score on one of the six rating axes, always within `1..=5`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, utoipa::ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = u8)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    /// Returns `None` when `value` falls outside `1..=5`.
    pub fn new(value: i64) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Some(Self(value as u8))
        } else {
            None
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Rating::new(raw).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "rating must be between {} and {}, got {raw}",
                Rating::MIN,
                Rating::MAX
            ))
        })
    }
}

/// One of the independent quality dimensions a burger is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingAxis {
    Overall,
    Style,
    Volume,
    Patty,
    Buns,
    Sauce,
}

impl RatingAxis {
    pub const ALL: [RatingAxis; 6] = [
        RatingAxis::Overall,
        RatingAxis::Style,
        RatingAxis::Volume,
        RatingAxis::Patty,
        RatingAxis::Buns,
        RatingAxis::Sauce,
    ];

    /// JSON / column name of the axis.
    pub fn field(self) -> &'static str {
        match self {
            RatingAxis::Overall => "rating",
            RatingAxis::Style => "rating_style",
            RatingAxis::Volume => "rating_volume",
            RatingAxis::Patty => "rating_patty",
            RatingAxis::Buns => "rating_buns",
            RatingAxis::Sauce => "rating_sauce",
        }
    }

    /// What the low and high ends of the scale mean.
    pub fn scale(self) -> &'static str {
        match self {
            RatingAxis::Overall => "overall satisfaction 1-5",
            RatingAxis::Style => "1=junk/classic, 5=rich/gourmet",
            RatingAxis::Volume => "1=light/snack, 5=heavy/massive",
            RatingAxis::Patty => "1=balanced/sauce-focused, 5=meaty/steak-like",
            RatingAxis::Buns => "1=soft/fluffy, 5=hard/crispy",
            RatingAxis::Sauce => "1=mild/simple, 5=strong/rich",
        }
    }
}

impl fmt::Display for RatingAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_closed_range() {
        for v in 1..=5 {
            assert_eq!(Rating::new(v).unwrap().get() as i64, v);
        }
    }

    #[test]
    fn rejects_zero_six_and_negative() {
        assert!(Rating::new(0).is_none());
        assert!(Rating::new(6).is_none());
        assert!(Rating::new(-1).is_none());
        assert!(Rating::new(i64::MAX).is_none());
    }

    #[test]
    fn deserialize_enforces_range() {
        let ok: Rating = serde_json::from_str("4").unwrap();
        assert_eq!(ok.get(), 4);

        let err = serde_json::from_str::<Rating>("9").unwrap_err();
        assert!(err.to_string().contains("between 1 and 5"));
    }

    #[test]
    fn axis_fields_are_unique() {
        let mut names: Vec<_> = RatingAxis::ALL.iter().map(|a| a.field()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 6);
        assert_eq!(RatingAxis::Buns.to_string(), "rating_buns");
    }
}
