//! Food spot records.

use super::timestamp;
use crate::error::ValidationError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Ratings the front end offers. Storage does not enforce it.
pub const RATING_RANGE: RangeInclusive<u8> = 1..=5;

/// A single venue owned by exactly one list.
///
/// # Examples
///
/// ```
/// use munch_rs::core::FoodSpot;
///
/// let spot = FoodSpot::new(1, "Curry 36", "Mehringdamm 36, Berlin")
///     .with_rating(4)
///     .with_category("Imbiss");
/// assert!(spot.id.is_none());
/// assert!(spot.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodSpot {
    /// Storage identifier (`None` until inserted).
    pub id: Option<i64>,

    /// Venue name. Not unique, even within a list.
    pub name: String,

    /// Postal address, used for geocoding.
    pub address: String,

    /// Rating, intended range 1..=5.
    pub rating: u8,

    /// Free-text comment.
    #[serde(default)]
    pub comment: String,

    /// Owning list.
    pub list_id: i64,

    /// Creation time (local).
    pub date_added: NaiveDateTime,

    /// Cuisine or venue category.
    #[serde(default)]
    pub category: String,

    /// Menu reference, often a URL.
    #[serde(default)]
    pub menu: String,

    /// Set when the stored timestamp was unreadable and replaced on load.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub date_recovered: bool,
}

impl FoodSpot {
    /// Creates an unsaved spot added now, rated 1.
    #[must_use]
    pub fn new(list_id: i64, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            address: address.into(),
            rating: *RATING_RANGE.start(),
            comment: String::new(),
            list_id,
            date_added: timestamp::now(),
            category: String::new(),
            menu: String::new(),
            date_recovered: false,
        }
    }

    /// Sets the rating.
    #[must_use]
    pub const fn with_rating(mut self, rating: u8) -> Self {
        self.rating = rating;
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the menu reference.
    #[must_use]
    pub fn with_menu(mut self, menu: impl Into<String>) -> Self {
        self.menu = menu.into();
        self
    }

    /// Sets the creation time.
    #[must_use]
    pub const fn with_date_added(mut self, date_added: NaiveDateTime) -> Self {
        self.date_added = date_added;
        self
    }

    /// Checks the rating against [`RATING_RANGE`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if RATING_RANGE.contains(&self.rating) {
            Ok(())
        } else {
            Err(ValidationError::RatingOutOfRange(i64::from(self.rating)))
        }
    }

    /// Case-insensitive substring match on the name.
    ///
    /// A blank query matches every spot.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        query.is_empty() || self.name.to_lowercase().contains(&query.to_lowercase())
    }

    /// Creation time formatted for display.
    #[must_use]
    pub fn display_date(&self) -> String {
        timestamp::display_timestamp(&self.date_added)
    }
}
