//! Spot screen state.

use super::FoodSpotViewModelApi;
use crate::core::FoodSpot;
use crate::error::Result;
use crate::repository::FoodSpotRepository;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

/// Snapshot of the spots of one list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoodSpotViewState {
    /// Spots of the list as last loaded.
    pub spots: Vec<FoodSpot>,
    /// Spot opened for detail or editing.
    pub spot: Option<FoodSpot>,
}

/// Spot operations scoped to a single list.
///
/// Every mutation reloads the full list afterwards.
pub struct FoodSpotViewModel {
    repository: Arc<dyn FoodSpotRepository>,
    list_id: i64,
    state: watch::Sender<FoodSpotViewState>,
}

impl std::fmt::Debug for FoodSpotViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoodSpotViewModel")
            .field("list_id", &self.list_id)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl FoodSpotViewModel {
    /// Creates the view-model, loading the list's spots and, for a
    /// non-negative `spot_id`, that spot.
    pub async fn new(
        repository: Arc<dyn FoodSpotRepository>,
        list_id: i64,
        spot_id: Option<i64>,
    ) -> Result<Self> {
        let (state, _) = watch::channel(FoodSpotViewState::default());
        let vm = Self {
            repository,
            list_id,
            state,
        };

        vm.load_spots().await?;
        if let Some(id) = spot_id.filter(|id| *id >= 0) {
            let spot = vm.repository.by_id(id).await?;
            if spot.is_none() {
                tracing::debug!(id, "spot to open does not exist");
            }
            vm.state.send_modify(|s| s.spot = spot);
        }
        Ok(vm)
    }

    /// Receiver for state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FoodSpotViewState> {
        self.state.subscribe()
    }
}

#[async_trait]
impl FoodSpotViewModelApi for FoodSpotViewModel {
    fn list_id(&self) -> i64 {
        self.list_id
    }

    fn state(&self) -> FoodSpotViewState {
        self.state.borrow().clone()
    }

    async fn load_spots(&self) -> Result<()> {
        let spots = self.repository.spots_for_list(self.list_id).await?;
        self.state.send_modify(|s| s.spots = spots);
        Ok(())
    }

    async fn add_spot(&self, spot: &FoodSpot) -> Result<i64> {
        let id = self.repository.insert(spot).await?;
        tracing::debug!(id, list_id = self.list_id, "added spot");
        self.load_spots().await?;
        Ok(id)
    }

    async fn delete_all_spots(&self) -> Result<usize> {
        let removed = self.repository.delete_all_for_list(self.list_id).await?;
        self.load_spots().await?;
        Ok(removed)
    }

    async fn delete_spot(&self, spot: &FoodSpot) -> Result<usize> {
        let removed = self.repository.delete(spot).await?;
        self.load_spots().await?;
        Ok(removed)
    }

    async fn update_spot(&self, spot: &FoodSpot) -> Result<usize> {
        let changed = self.repository.update(spot).await?;
        let current = spot.clone();
        self.state.send_modify(|s| s.spot = Some(current));
        self.load_spots().await?;
        Ok(changed)
    }

    fn filtered_spots(&self, query: &str) -> Vec<FoodSpot> {
        self.state
            .borrow()
            .spots
            .iter()
            .filter(|spot| spot.matches(query))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        SpotsForList(i64),
        ById(i64),
        Insert(String),
        Delete(Option<i64>),
        DeleteAll(i64),
        Update(Option<i64>),
    }

    #[derive(Default)]
    struct FakeSpots {
        spots: Mutex<Vec<FoodSpot>>,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeSpots {
        fn with(spots: Vec<FoodSpot>) -> Arc<Self> {
            Arc::new(Self {
                spots: Mutex::new(spots),
                calls: Mutex::default(),
            })
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl FoodSpotRepository for FakeSpots {
        async fn insert(&self, spot: &FoodSpot) -> Result<i64> {
            self.record(Call::Insert(spot.name.clone()));
            let mut spots = self.spots.lock().unwrap();
            let id = spots.iter().filter_map(|s| s.id).max().unwrap_or(0) + 1;
            spots.push(FoodSpot {
                id: Some(id),
                ..spot.clone()
            });
            Ok(id)
        }

        async fn spots_for_list(&self, list_id: i64) -> Result<Vec<FoodSpot>> {
            self.record(Call::SpotsForList(list_id));
            Ok(self
                .spots
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.list_id == list_id)
                .cloned()
                .collect())
        }

        async fn delete_all_for_list(&self, list_id: i64) -> Result<usize> {
            self.record(Call::DeleteAll(list_id));
            let mut spots = self.spots.lock().unwrap();
            let before = spots.len();
            spots.retain(|s| s.list_id != list_id);
            Ok(before - spots.len())
        }

        async fn delete(&self, spot: &FoodSpot) -> Result<usize> {
            self.record(Call::Delete(spot.id));
            let mut spots = self.spots.lock().unwrap();
            let before = spots.len();
            spots.retain(|s| spot.id.is_none() || s.id != spot.id);
            Ok(before - spots.len())
        }

        async fn update(&self, spot: &FoodSpot) -> Result<usize> {
            self.record(Call::Update(spot.id));
            let mut n = 0;
            for s in self.spots.lock().unwrap().iter_mut() {
                if spot.id.is_some() && s.id == spot.id {
                    *s = spot.clone();
                    n += 1;
                }
            }
            Ok(n)
        }

        async fn by_id(&self, id: i64) -> Result<Option<FoodSpot>> {
            self.record(Call::ById(id));
            Ok(self
                .spots
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.id == Some(id))
                .cloned())
        }
    }

    fn saved(id: i64, list_id: i64, name: &str) -> FoodSpot {
        FoodSpot {
            id: Some(id),
            ..FoodSpot::new(list_id, name, "Teststraße 1")
        }
    }

    #[tokio::test]
    async fn test_loads_spots_on_construction() {
        let repo = FakeSpots::with(vec![saved(1, 1, "A"), saved(2, 1, "B"), saved(3, 2, "C")]);
        let vm = FoodSpotViewModel::new(repo.clone(), 1, None).await.unwrap();

        assert_eq!(vm.state().spots.len(), 2);
        assert!(vm.state().spot.is_none());
        assert_eq!(repo.calls(), vec![Call::SpotsForList(1)]);
    }

    #[tokio::test]
    async fn test_loads_single_spot_when_id_given() {
        let repo = FakeSpots::with(vec![saved(1, 1, "A"), saved(2, 1, "B")]);
        let vm = FoodSpotViewModel::new(repo.clone(), 1, Some(2)).await.unwrap();

        assert_eq!(vm.state().spot.map(|s| s.name), Some("B".to_string()));
        assert_eq!(repo.calls(), vec![Call::SpotsForList(1), Call::ById(2)]);
    }

    #[tokio::test]
    async fn test_negative_spot_id_ignored() {
        let repo = FakeSpots::with(vec![saved(1, 1, "A")]);
        let vm = FoodSpotViewModel::new(repo.clone(), 1, Some(-1)).await.unwrap();
        assert!(vm.state().spot.is_none());
        assert_eq!(repo.calls(), vec![Call::SpotsForList(1)]);
    }

    #[tokio::test]
    async fn test_add_reloads() {
        let repo = FakeSpots::with(Vec::new());
        let vm = FoodSpotViewModel::new(repo.clone(), 1, None).await.unwrap();

        let id = vm.add_spot(&FoodSpot::new(1, "Neu", "x")).await.unwrap();
        assert_eq!(id, 1);
        assert_eq!(
            repo.calls(),
            vec![
                Call::SpotsForList(1),
                Call::Insert("Neu".into()),
                Call::SpotsForList(1)
            ]
        );
        assert_eq!(vm.state().spots.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_reloads() {
        let repo = FakeSpots::with(vec![saved(1, 1, "A"), saved(2, 1, "A")]);
        let vm = FoodSpotViewModel::new(repo.clone(), 1, None).await.unwrap();

        let first = vm.state().spots[0].clone();
        assert_eq!(vm.delete_spot(&first).await.unwrap(), 1);
        assert_eq!(vm.state().spots.len(), 1);
        assert_eq!(repo.calls().last(), Some(&Call::SpotsForList(1)));
    }

    #[tokio::test]
    async fn test_delete_all_reloads() {
        let repo = FakeSpots::with(vec![saved(1, 1, "A"), saved(2, 1, "B"), saved(3, 2, "C")]);
        let vm = FoodSpotViewModel::new(repo.clone(), 1, None).await.unwrap();

        assert_eq!(vm.delete_all_spots().await.unwrap(), 2);
        assert!(vm.state().spots.is_empty());
        assert!(repo.calls().contains(&Call::DeleteAll(1)));
    }

    #[tokio::test]
    async fn test_update_sets_current_spot_and_reloads() {
        let repo = FakeSpots::with(vec![saved(1, 1, "Alt")]);
        let vm = FoodSpotViewModel::new(repo.clone(), 1, Some(1)).await.unwrap();

        let updated = FoodSpot {
            name: "Neu".to_string(),
            rating: 5,
            ..vm.state().spot.unwrap()
        };
        assert_eq!(vm.update_spot(&updated).await.unwrap(), 1);

        let state = vm.state();
        assert_eq!(state.spot.as_ref().map(|s| s.name.as_str()), Some("Neu"));
        assert_eq!(state.spots[0].rating, 5);
        assert_eq!(repo.calls().last(), Some(&Call::SpotsForList(1)));
    }

    #[tokio::test]
    async fn test_filtered_spots() {
        let repo = FakeSpots::with(vec![saved(1, 1, "Pho Bar"), saved(2, 1, "Ramen Ya")]);
        let vm = FoodSpotViewModel::new(repo, 1, None).await.unwrap();

        assert_eq!(vm.filtered_spots("").len(), 2);
        assert_eq!(vm.filtered_spots("RAMEN").len(), 1);
    }
}
