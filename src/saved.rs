use crate::error::StoreError;
use crate::models::Job;
use crate::store::{Store, StoreExt, SAVED_JOBS};

/// Outcome of [`SavedJobs::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle {
    pub saved: bool,
}

impl Toggle {
    pub fn notice(&self) -> &'static str {
        if self.saved {
            "Job saved!"
        } else {
            "Removed from saved"
        }
    }
}

/// Bookmarked job ids in the order they were saved. Each id appears once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedJobs {
    ids: Vec<String>,
}

impl SavedJobs {
    pub fn load(store: &dyn Store) -> Result<Self, StoreError> {
        let stored: Vec<String> = store.get(SAVED_JOBS)?;
        let mut ids = Vec::with_capacity(stored.len());
        for id in stored {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(Self { ids })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|saved| saved == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Flips membership of `id` and writes the whole set back.
    ///
    /// On a failed write the in-memory set is rolled back so it keeps
    /// matching what is persisted.
    pub fn toggle(&mut self, id: &str, store: &dyn Store) -> Result<Toggle, StoreError> {
        let position = self.ids.iter().position(|saved| saved == id);
        let toggle = match position {
            Some(index) => {
                self.ids.remove(index);
                Toggle { saved: false }
            }
            None => {
                self.ids.push(id.to_string());
                Toggle { saved: true }
            }
        };

        if let Err(err) = store.set(SAVED_JOBS, &self.ids) {
            match position {
                Some(index) => self.ids.insert(index, id.to_string()),
                None => {
                    self.ids.pop();
                }
            }
            return Err(err);
        }
        tracing::debug!("job {id} saved={}", toggle.saved);
        Ok(toggle)
    }

    /// Catalog jobs that are currently saved, in catalog order.
    pub fn select<'a>(&self, jobs: &'a [Job]) -> Vec<&'a Job> {
        jobs.iter().filter(|job| self.contains(&job.id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Update};
    use serde_json::Value;

    struct ReadOnlyStore;

    fn read_only(key: &str) -> StoreError {
        StoreError::Io {
            key: key.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        }
    }

    impl Store for ReadOnlyStore {
        fn get_raw(&self, _key: &str) -> Result<Option<Value>, StoreError> {
            Ok(None)
        }

        fn set_raw(&self, key: &str, _value: Value) -> Result<(), StoreError> {
            Err(read_only(key))
        }

        fn update(&self, key: &str, _f: Update<'_>) -> Result<(), StoreError> {
            Err(read_only(key))
        }
    }

    #[test]
    fn toggle_twice_restores_membership() {
        let store = MemoryStore::new();
        let mut saved = SavedJobs::load(&store).unwrap();

        assert_eq!(saved.toggle("ssc_1", &store).unwrap(), Toggle { saved: true });
        assert!(saved.contains("ssc_1"));
        assert_eq!(saved.toggle("ssc_1", &store).unwrap(), Toggle { saved: false });
        assert!(saved.is_empty());

        let persisted: Vec<String> = store.get(SAVED_JOBS).unwrap();
        assert!(persisted.is_empty());
    }

    #[test]
    fn every_toggle_is_persisted() {
        let store = MemoryStore::new();
        let mut saved = SavedJobs::default();
        saved.toggle("a", &store).unwrap();
        saved.toggle("b", &store).unwrap();
        saved.toggle("a", &store).unwrap();

        let reloaded = SavedJobs::load(&store).unwrap();
        assert_eq!(reloaded.ids(), ["b".to_string()]);
    }

    #[test]
    fn duplicate_ids_in_store_collapse() {
        let store = MemoryStore::new();
        store.set(SAVED_JOBS, &["a", "b", "a"]).unwrap();
        let saved = SavedJobs::load(&store).unwrap();
        assert_eq!(saved.len(), 2);
    }

    #[test]
    fn failed_write_rolls_back() {
        let mut saved = SavedJobs::default();
        assert!(saved.toggle("a", &ReadOnlyStore).is_err());
        assert!(!saved.contains("a"));
    }

    #[test]
    fn notices() {
        assert_eq!(Toggle { saved: true }.notice(), "Job saved!");
        assert_eq!(Toggle { saved: false }.notice(), "Removed from saved");
    }
}
