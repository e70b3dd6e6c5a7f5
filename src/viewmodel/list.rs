//! List screen state machine.

use super::ListViewModelApi;
use crate::core::{DEFAULT_ICON, FoodSpotList};
use crate::error::{Error, Result, ValidationError};
use crate::repository::ListRepository;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

/// Snapshot of the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListViewState {
    /// Lists as last loaded.
    pub lists: Vec<FoodSpotList>,
    /// Whether the create/edit dialog is open.
    pub show_dialog: bool,
    /// Name typed into the dialog.
    pub list_name: String,
    /// Validation failure of the last confirm.
    pub name_error: Option<ValidationError>,
    /// Icon picked in the dialog.
    pub selected_icon: String,
    /// Current search filter.
    pub search_query: String,
    /// Whether the dialog edits an existing list.
    pub edit_mode: bool,
    /// Original name of the list being edited.
    pub list_being_edited: Option<String>,
}

impl Default for ListViewState {
    fn default() -> Self {
        Self {
            lists: Vec::new(),
            show_dialog: false,
            list_name: String::new(),
            name_error: None,
            selected_icon: DEFAULT_ICON.to_string(),
            search_query: String::new(),
            edit_mode: false,
            list_being_edited: None,
        }
    }
}

/// Drives list creation, editing, deletion and search.
///
/// State is published through a [`watch`] channel; every transition is
/// visible to subscribers as one update.
pub struct ListViewModel {
    repository: Arc<dyn ListRepository>,
    owner: String,
    state: watch::Sender<ListViewState>,
}

impl std::fmt::Debug for ListViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListViewModel")
            .field("owner", &self.owner)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl ListViewModel {
    /// Creates the view-model and loads the lists.
    pub async fn new(repository: Arc<dyn ListRepository>, owner: impl Into<String>) -> Result<Self> {
        let (state, _) = watch::channel(ListViewState::default());
        let vm = Self {
            repository,
            owner: owner.into(),
            state,
        };
        vm.load_lists().await?;
        Ok(vm)
    }

    /// Owner stamped on new lists.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Receiver for state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ListViewState> {
        self.state.subscribe()
    }

    fn reject(&self, error: ValidationError) -> Error {
        self.state.send_modify(|s| s.name_error = Some(error));
        error.into()
    }
}

#[async_trait]
impl ListViewModelApi for ListViewModel {
    fn state(&self) -> ListViewState {
        self.state.borrow().clone()
    }

    fn handle_action_button(&self) {
        self.state.send_modify(|s| {
            s.show_dialog = true;
            s.name_error = None;
        });
    }

    fn update_list_name(&self, name: &str) {
        self.state.send_modify(|s| {
            s.list_name = name.to_string();
            s.name_error = None;
        });
    }

    fn update_selected_icon(&self, icon: &str) {
        self.state.send_modify(|s| s.selected_icon = icon.to_string());
    }

    fn on_search_query_changed(&self, query: &str) {
        self.state.send_modify(|s| s.search_query = query.to_string());
    }

    fn cancel_dialog(&self) {
        self.state.send_modify(|s| {
            s.show_dialog = false;
            s.list_name.clear();
            s.name_error = None;
        });
    }

    fn prepare_edit(&self, name: &str) {
        self.state.send_modify(|s| {
            s.list_name = name.to_string();
            s.list_being_edited = Some(name.to_string());
            s.edit_mode = true;
            s.show_dialog = true;
        });
    }

    async fn confirm_new_list(&self) -> Result<()> {
        let (name, icon, edit_mode, editing) = {
            let s = self.state.borrow();
            (
                s.list_name.trim().to_string(),
                s.selected_icon.clone(),
                s.edit_mode,
                s.list_being_edited.clone(),
            )
        };

        if name.is_empty() {
            return Err(self.reject(ValidationError::BlankName));
        }
        if !edit_mode && self.repository.exists(&name).await? {
            return Err(self.reject(ValidationError::DuplicateName));
        }

        match editing.filter(|_| edit_mode) {
            Some(old_name) => {
                let changed = self
                    .repository
                    .update(&old_name, &name, &self.owner, &icon)
                    .await?;
                if changed > 1 {
                    tracing::warn!(old_name, changed, "renamed several lists sharing a name");
                }
            }
            None => {
                let id = self.repository.insert(&name, &self.owner, &icon).await?;
                tracing::debug!(id, name, "created list");
            }
        }

        self.state.send_modify(|s| {
            s.list_name.clear();
            s.selected_icon = DEFAULT_ICON.to_string();
            s.show_dialog = false;
            s.edit_mode = false;
            s.list_being_edited = None;
            s.name_error = None;
        });
        self.load_lists().await
    }

    async fn load_lists(&self) -> Result<()> {
        let lists = self.repository.all().await?;
        self.state.send_modify(|s| s.lists = lists);
        Ok(())
    }

    async fn delete_list(&self, name: &str) -> Result<()> {
        let removed = self.repository.delete(name).await?;
        tracing::debug!(name, removed, "deleted list");
        self.load_lists().await
    }

    fn filtered_lists(&self) -> Vec<FoodSpotList> {
        let s = self.state.borrow();
        s.lists
            .iter()
            .filter(|l| l.matches(&s.search_query))
            .cloned()
            .collect()
    }
}
