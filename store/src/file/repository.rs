//! Whole-collection file persistence.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::error::{RepoResult, RepositoryError};
use crate::models::{Entity, Id};
use crate::repository::Repository;

/// File-backed repository for one entity type.
///
/// The whole `id -> entity` map lives in memory, ordered by id, and is
/// written back to a single bincode file after every mutation. A mutation
/// whose write fails is undone in memory. The file is read once on
/// construction and again on every [`FileRepository::load`].
///
/// There is no cross-process locking: two processes writing the same file
/// will overwrite each other.
pub struct FileRepository<T> {
    path: PathBuf,
    entries: Mutex<BTreeMap<Id, T>>,
}

impl<T> FileRepository<T>
where
    T: Entity + Serialize + DeserializeOwned,
{
    /// Open the repository at `path`, loading any existing data.
    ///
    /// A missing or zero-length file yields an empty repository.
    pub fn open(path: impl Into<PathBuf>) -> RepoResult<Self> {
        let path = path.into();
        let entries = read_entries(&path)?;
        tracing::debug!(entity = T::NAME, count = entries.len(), path = %path.display(), "Loaded file repository");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the backing file, replacing the in-memory collection.
    pub async fn load(&self) -> RepoResult<()> {
        let loaded = read_entries(&self.path)?;
        *self.entries.lock().await = loaded;
        Ok(())
    }

    /// Run `predicate` over every stored entity and clone the matches.
    pub(crate) async fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.entries
            .lock()
            .await
            .values()
            .filter(|entity| predicate(entity))
            .cloned()
            .collect()
    }

    /// Lowest-id entity matching `predicate`, if any.
    pub(crate) async fn find<F>(&self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        self.entries
            .lock()
            .await
            .values()
            .find(|entity| predicate(entity))
            .cloned()
    }

    fn write(&self, entries: &BTreeMap<Id, T>) -> RepoResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let bytes = bincode::serialize(entries)?;

        // Write to a sibling temp file and rename over the target
        let temp_path = self.path.with_extension("bin.tmp");
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

fn read_entries<T: DeserializeOwned>(path: &Path) -> RepoResult<BTreeMap<Id, T>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let bytes = fs::read(path)?;
    if bytes.is_empty() {
        return Ok(BTreeMap::new());
    }
    Ok(bincode::deserialize(&bytes)?)
}

fn next_id<T: Entity>(entries: &BTreeMap<Id, T>) -> RepoResult<Id> {
    match entries.last_key_value() {
        Some((&max, _)) => max
            .checked_add(1)
            .ok_or(RepositoryError::IdsExhausted(T::NAME)),
        None => Ok(1),
    }
}

#[async_trait]
impl<T> Repository<Id, T> for FileRepository<T>
where
    T: Entity + Serialize + DeserializeOwned,
{
    async fn save(&self, model: &mut T) -> RepoResult<()> {
        let mut entries = self.entries.lock().await;
        let id = if model.is_new() {
            next_id::<T>(&entries)?
        } else {
            model.id()
        };

        let mut stored = model.clone();
        stored.set_id(id);
        let previous = entries.insert(id, stored);
        if let Err(e) = self.write(&entries) {
            match previous {
                Some(old) => entries.insert(id, old),
                None => entries.remove(&id),
            };
            return Err(e);
        }

        model.set_id(id);
        tracing::debug!(entity = T::NAME, id, "Saved to file");
        Ok(())
    }

    async fn delete(&self, model: &T) -> RepoResult<()> {
        let mut entries = self.entries.lock().await;
        let id = model.id();
        if let Some(removed) = entries.remove(&id) {
            if let Err(e) = self.write(&entries) {
                entries.insert(id, removed);
                return Err(e);
            }
            tracing::debug!(entity = T::NAME, id, "Deleted from file");
        }
        Ok(())
    }

    async fn get(&self, id: Id) -> RepoResult<Option<T>> {
        Ok(self.entries.lock().await.get(&id).cloned())
    }

    async fn get_all(&self) -> RepoResult<Vec<T>> {
        Ok(self.entries.lock().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Agent;

    fn agent(name: &str, role: &str) -> Agent {
        Agent {
            id: 0,
            name: name.to_string(),
            description: format!("{name} description"),
            role: role.to_string(),
        }
    }

    #[tokio::test]
    async fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::<Agent>::open(dir.path().join("agents.bin")).unwrap();
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_zero_length_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agents.bin");
        fs::write(&path, b"").unwrap();
        let repo = FileRepository::<Agent>::open(&path).unwrap();
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ids_continue_from_max() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::<Agent>::open(dir.path().join("agents.bin")).unwrap();

        let mut first = agent("Jett", "Duelist");
        first.id = 10;
        repo.save(&mut first).await.unwrap();

        let mut second = agent("Sage", "Sentinel");
        repo.save(&mut second).await.unwrap();
        assert_eq!(second.id, 11);
    }

    #[tokio::test]
    async fn test_reopen_reads_persisted_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agents.bin");

        let mut jett = agent("Jett", "Duelist");
        {
            let repo = FileRepository::<Agent>::open(&path).unwrap();
            repo.save(&mut jett).await.unwrap();
        }

        let reopened = FileRepository::<Agent>::open(&path).unwrap();
        assert_eq!(reopened.get(jett.id).await.unwrap(), Some(jett));
    }

    #[tokio::test]
    async fn test_load_discards_unsaved_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agents.bin");
        let repo = FileRepository::<Agent>::open(&path).unwrap();
        let other = FileRepository::<Agent>::open(&path).unwrap();

        let mut jett = agent("Jett", "Duelist");
        other.save(&mut jett).await.unwrap();
        assert_eq!(repo.get(jett.id).await.unwrap(), None);

        repo.load().await.unwrap();
        assert_eq!(repo.get(jett.id).await.unwrap(), Some(jett));
    }

    #[tokio::test]
    async fn test_write_creates_parent_dir_and_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("agents.bin");
        let repo = FileRepository::<Agent>::open(&path).unwrap();
        repo.save(&mut agent("Omen", "Controller")).await.unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("bin.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agents.bin");
        fs::write(&path, [0xff; 3]).unwrap();
        assert!(FileRepository::<Agent>::open(&path).is_err());
    }

    #[tokio::test]
    async fn test_new_id_past_max_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::<Agent>::open(dir.path().join("agents.bin")).unwrap();

        let mut last = agent("Jett", "Duelist");
        last.id = Id::MAX;
        repo.save(&mut last).await.unwrap();

        let mut next = agent("Sage", "Sentinel");
        let err = repo.save(&mut next).await.unwrap_err();
        assert!(matches!(err, RepositoryError::IdsExhausted("Agent")));
        assert_eq!(next.id, 0);
        assert_eq!(repo.get_all().await.unwrap(), vec![last]);
    }

    #[tokio::test]
    async fn test_failed_save_leaves_memory_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();
        let repo = FileRepository::<Agent>::open(blocker.join("agents.bin")).unwrap();

        let mut jett = agent("Jett", "Duelist");
        assert!(repo.save(&mut jett).await.is_err());

        assert_eq!(jett.id, 0);
        assert_eq!(repo.get(1).await.unwrap(), None);
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_update_and_delete_keep_stored_entity() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let repo = FileRepository::<Agent>::open(data_dir.join("agents.bin")).unwrap();

        let mut jett = agent("Jett", "Duelist");
        repo.save(&mut jett).await.unwrap();

        fs::remove_dir_all(&data_dir).unwrap();
        fs::write(&data_dir, b"not a directory").unwrap();

        let mut renamed = jett.clone();
        renamed.name = "Neon".to_string();
        assert!(repo.save(&mut renamed).await.is_err());
        assert!(repo.delete(&jett).await.is_err());

        assert_eq!(repo.get(jett.id).await.unwrap(), Some(jett.clone()));
        assert_eq!(repo.get_all().await.unwrap(), vec![jett]);
    }

    #[tokio::test]
    async fn test_find_returns_lowest_id_among_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::<Agent>::open(dir.path().join("agents.bin")).unwrap();
        for id in [5, 3, 8, 4] {
            let mut copy = agent("Jett", "Duelist");
            copy.id = id;
            repo.save(&mut copy).await.unwrap();
        }

        let found = repo.find(|a| a.name == "Jett").await.unwrap();
        assert_eq!(found.id, 3);
        let ids: Vec<Id> = repo.get_all().await.unwrap().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 4, 5, 8]);
    }
}
