//! Screen state machines.
//!
//! View-models hold the state a front end renders and translate user
//! intents into repository calls. The capability traits let a front end
//! or a test drive a fake instead of the real view-model.

mod list;
mod location;
mod spot;

pub use list::{ListViewModel, ListViewState};
pub use location::LocationViewModel;
pub use spot::{FoodSpotViewModel, FoodSpotViewState};

use crate::core::{FoodSpot, FoodSpotList};
use crate::error::Result;
use async_trait::async_trait;

/// Intents of the list screen.
#[async_trait]
pub trait ListViewModelApi: Send + Sync {
    /// Current state.
    fn state(&self) -> ListViewState;

    /// Opens the create dialog.
    fn handle_action_button(&self);

    /// Sets the dialog name and clears any error.
    fn update_list_name(&self, name: &str);

    /// Sets the dialog icon.
    fn update_selected_icon(&self, icon: &str);

    /// Sets the search filter.
    fn on_search_query_changed(&self, query: &str);

    /// Closes the dialog and discards the typed name.
    fn cancel_dialog(&self);

    /// Opens the dialog to rename the list called `name`.
    fn prepare_edit(&self, name: &str);

    /// Validates and commits the dialog.
    ///
    /// Blank names are rejected first, then duplicates (outside edit mode).
    /// A rejection is published as `name_error` and returned as
    /// [`Error::Validation`](crate::Error::Validation).
    async fn confirm_new_list(&self) -> Result<()>;

    /// Reloads the lists.
    async fn load_lists(&self) -> Result<()>;

    /// Deletes a list by name, then reloads.
    async fn delete_list(&self, name: &str) -> Result<()>;

    /// Lists whose name contains the search filter.
    fn filtered_lists(&self) -> Vec<FoodSpotList>;
}

/// Intents of the spot screen of one list.
#[async_trait]
pub trait FoodSpotViewModelApi: Send + Sync {
    /// The list this view-model is scoped to.
    fn list_id(&self) -> i64;

    /// Current state.
    fn state(&self) -> FoodSpotViewState;

    /// Reloads the spots of the list.
    async fn load_spots(&self) -> Result<()>;

    /// Inserts a spot, then reloads. Returns the new ID.
    async fn add_spot(&self, spot: &FoodSpot) -> Result<i64>;

    /// Deletes every spot of the list, then reloads.
    async fn delete_all_spots(&self) -> Result<usize>;

    /// Deletes one spot by ID, then reloads.
    async fn delete_spot(&self, spot: &FoodSpot) -> Result<usize>;

    /// Rewrites a spot, makes it the current spot, then reloads.
    async fn update_spot(&self, spot: &FoodSpot) -> Result<usize>;

    /// Spots whose name contains `query`.
    fn filtered_spots(&self, query: &str) -> Vec<FoodSpot>;
}
