use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard};

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};

use crate::catalog::{self, Catalog, Feeds, Stats};
use crate::config::{HandoffMode, Settings};
use crate::error::{FetchError, StoreError};
use crate::saved::{SavedJobs, Toggle};
use crate::shell::{BrowserShell, NoShell, Shell};
use crate::store::{JsonFileStore, MemoryStore, Store};
use crate::suggest::Recorder;

pub type SharedState = Arc<AppState>;

/// Everything a request needs. The catalog is replaced wholesale on refresh;
/// the saved set is mutated in place and written through to the store.
pub struct AppState {
    pub settings: Settings,
    feeds: Feeds,
    catalog: RwLock<Catalog>,
    saved: Mutex<SavedJobs>,
    store: Arc<dyn Store>,
    shell: Arc<dyn Shell>,
    clock: fn() -> DateTime<Utc>,
}

impl AppState {
    /// Starts with an empty catalog; call [`AppState::refresh`] to load it.
    pub fn new(settings: Settings, store: Arc<dyn Store>, shell: Arc<dyn Shell>) -> Self {
        let saved = SavedJobs::load(store.as_ref()).unwrap_or_else(|err| {
            tracing::warn!("ignoring unreadable saved jobs: {err}");
            SavedJobs::default()
        });
        let feeds = Feeds::new(settings.jobs_feed.as_str(), settings.sources_feed.as_str());
        Self {
            settings,
            feeds,
            catalog: RwLock::new(Catalog::default()),
            saved: Mutex::new(saved),
            store,
            shell,
            clock: Utc::now,
        }
    }

    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let store: Arc<dyn Store> = if settings.store_dir.is_empty() {
            tracing::warn!("no store directory configured, preferences will not survive restarts");
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(
                JsonFileStore::open(&settings.store_dir)
                    .with_context(|| format!("opening store at {}", settings.store_dir))?,
            )
        };
        let shell: Arc<dyn Shell> = match settings.handoff {
            HandoffMode::Browser => Arc::new(BrowserShell),
            HandoffMode::None => Arc::new(NoShell),
        };
        Ok(Self::new(settings, store, shell))
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Reloads both feeds. The catalog is only swapped when the load
    /// succeeds; concurrent refreshes resolve as last-writer-wins.
    pub async fn refresh(&self) -> Result<Stats, FetchError> {
        let today = self.today();
        let fresh = catalog::load(&self.feeds, today).await?;
        let stats = fresh.stats(today);
        *self.catalog.write().unwrap_or_else(|e| e.into_inner()) = fresh;
        Ok(stats)
    }

    pub fn catalog(&self) -> RwLockReadGuard<'_, Catalog> {
        self.catalog.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn saved(&self) -> MutexGuard<'_, SavedJobs> {
        self.saved.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn toggle_saved(&self, id: &str) -> Result<Toggle, StoreError> {
        self.saved().toggle(id, self.store.as_ref())
    }

    pub fn recorder(&self) -> Recorder<'_> {
        Recorder::new(self.store.as_ref(), self.shell.as_ref(), &self.settings.issue_base)
    }

    pub fn shell(&self) -> &dyn Shell {
        self.shell.as_ref()
    }
}
