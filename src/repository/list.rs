//! List repository.

use super::Database;
use crate::core::FoodSpotList;
use crate::error::Result;
use crate::storage::Storage;
use async_trait::async_trait;

/// Repository for list persistence.
///
/// Lists are addressed by name. Missing names produce `false`, `None` or a
/// zero count rather than an error.
#[async_trait]
pub trait ListRepository: Send + Sync {
    /// Inserts a list and returns its ID. Does not check uniqueness.
    async fn insert(&self, name: &str, owner: &str, icon: &str) -> Result<i64>;

    /// All lists without their spots.
    async fn all(&self) -> Result<Vec<FoodSpotList>>;

    /// Deletes lists by name, cascading to their spots.
    async fn delete(&self, name: &str) -> Result<usize>;

    /// Deletes every list.
    async fn delete_all(&self) -> Result<usize>;

    /// Rewrites the lists named `old_name`, returning the affected count.
    async fn update(&self, old_name: &str, new_name: &str, owner: &str, icon: &str)
    -> Result<usize>;

    /// Whether a list with this name exists.
    async fn exists(&self, name: &str) -> Result<bool>;

    /// ID of the list with this name.
    async fn id_for(&self, name: &str) -> Result<Option<i64>>;
}

/// [`ListRepository`] backed by the shared [`Database`].
#[derive(Debug, Clone)]
pub struct SqliteListRepository {
    db: Database,
}

impl SqliteListRepository {
    /// Creates a repository on `db`.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ListRepository for SqliteListRepository {
    async fn insert(&self, name: &str, owner: &str, icon: &str) -> Result<i64> {
        let (name, owner, icon) = (name.to_owned(), owner.to_owned(), icon.to_owned());
        self.db
            .run(move |s| s.insert_list(&name, &owner, &icon))
            .await
    }

    async fn all(&self) -> Result<Vec<FoodSpotList>> {
        self.db.run(|s| s.all_lists()).await
    }

    async fn delete(&self, name: &str) -> Result<usize> {
        let name = name.to_owned();
        self.db.run(move |s| s.delete_list(&name)).await
    }

    async fn delete_all(&self) -> Result<usize> {
        self.db.run(|s| s.delete_all_lists()).await
    }

    async fn update(
        &self,
        old_name: &str,
        new_name: &str,
        owner: &str,
        icon: &str,
    ) -> Result<usize> {
        let (old_name, new_name) = (old_name.to_owned(), new_name.to_owned());
        let (owner, icon) = (owner.to_owned(), icon.to_owned());
        self.db
            .run(move |s| s.update_list(&old_name, &new_name, &owner, &icon))
            .await
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        let name = name.to_owned();
        self.db.run(move |s| s.list_exists(&name)).await
    }

    async fn id_for(&self, name: &str) -> Result<Option<i64>> {
        let name = name.to_owned();
        self.db.run(move |s| s.list_id_for(&name)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> SqliteListRepository {
        SqliteListRepository::new(Database::in_memory().unwrap())
    }

    #[tokio::test]
    async fn test_insert_then_all() {
        let repo = repo();
        let id = repo.insert("Testliste", "Benja", "test_icon").await.unwrap();
        assert!(id > 0);

        let lists = repo.all().await.unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].name, "Testliste");
        assert!(lists[0].spots.is_empty());
    }

    #[tokio::test]
    async fn test_delete_only_named_list() {
        let repo = repo();
        repo.insert("Keep", "a", "Default").await.unwrap();
        repo.insert("Drop", "a", "Default").await.unwrap();

        assert_eq!(repo.delete("Drop").await.unwrap(), 1);
        assert_eq!(repo.delete("Drop").await.unwrap(), 0);

        let names: Vec<_> = repo
            .all()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["Keep".to_string()]);
    }

    #[tokio::test]
    async fn test_update_exists_and_id_for() {
        let repo = repo();
        let id = repo.insert("Altname", "Benja", "icon_alt").await.unwrap();

        assert_eq!(
            repo.update("Altname", "Neuname", "Benja", "icon_neu")
                .await
                .unwrap(),
            1
        );
        assert!(!repo.exists("Altname").await.unwrap());
        assert!(repo.exists("Neuname").await.unwrap());
        assert_eq!(repo.id_for("Neuname").await.unwrap(), Some(id));
        assert_eq!(repo.id_for("Altname").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_all() {
        let repo = repo();
        repo.insert("A", "x", "Default").await.unwrap();
        repo.insert("B", "x", "Default").await.unwrap();
        assert_eq!(repo.delete_all().await.unwrap(), 2);
        assert!(repo.all().await.unwrap().is_empty());
    }
}
