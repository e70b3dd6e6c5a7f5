//! Food spot lists.

use super::spot::FoodSpot;
use serde::{Deserialize, Serialize};

/// Icon tag given to lists that never picked one.
pub const DEFAULT_ICON: &str = "Default";

/// A named, owned collection of spots.
///
/// `spots` is never filled by storage: spots point at their list through
/// `list_id` and are fetched separately.
///
/// # Examples
///
/// ```
/// use munch_rs::core::FoodSpotList;
///
/// let list = FoodSpotList::new("Ramen", "alex");
/// assert_eq!(list.icon, "Default");
/// assert!(list.spots.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodSpotList {
    /// Storage identifier (`None` until inserted).
    pub id: Option<i64>,

    /// Unique list name.
    pub name: String,

    /// Who created the list.
    pub owner: String,

    /// Icon tag.
    pub icon: String,

    /// Member spots, only populated by callers that load them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spots: Vec<FoodSpot>,
}

impl FoodSpotList {
    /// Creates an unsaved list with the default icon.
    #[must_use]
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            owner: owner.into(),
            icon: DEFAULT_ICON.to_string(),
            spots: Vec::new(),
        }
    }

    /// Sets the icon tag.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Case-insensitive substring match on the name.
    ///
    /// A blank query matches every list.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        query.is_empty() || self.name.to_lowercase().contains(&query.to_lowercase())
    }
}
