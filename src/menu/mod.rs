//! The menu store: owner of the current navigation menu tree.
//!
//! The tree is held as an immutable snapshot behind an `Arc` and is only ever
//! replaced as a whole, either directly through [`MenuStore::set_menus`] or by
//! a successful [`MenuStore::load_menus`].
//!
//! Loads are single-flight with newest-wins semantics. Each call to
//! `load_menus` (and each `set_menus`) takes a ticket from a generation
//! counter. An in-flight load whose ticket is no longer the latest has its
//! fetch dropped and returns [`MenuError::Superseded`] instead of committing.

mod fixture;
mod render;
mod source;

use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

pub use fixture::fixture_menus;
pub use render::render_menu_tree;
pub use source::{FixtureMenuSource, MenuSource, RemoteMenuSource};

use crate::error::{FetchError, MenuError};
use crate::models::{count_entries, find_entry, validate_tree, MenuEntry};

/// Default upper bound on a single menu fetch.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Whether the store has ever received a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuState {
    Empty,
    Loaded,
}

/// Summary of the store for status responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuStatus {
    pub state: MenuState,
    /// Number of entries across the whole tree.
    pub entries: usize,
    pub loaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct Snapshot {
    menus: Arc<Vec<MenuEntry>>,
    loaded_at: Option<DateTime<Utc>>,
}

pub struct MenuStore {
    source: Arc<dyn MenuSource>,
    timeout: Duration,
    snapshot: RwLock<Snapshot>,
    generation: watch::Sender<u64>,
}

impl std::fmt::Debug for MenuStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuStore")
            .field("source", &self.source.describe())
            .field("timeout", &self.timeout)
            .field("generation", &*self.generation.borrow())
            .finish()
    }
}

impl MenuStore {
    pub fn new(source: Arc<dyn MenuSource>) -> Self {
        Self::with_timeout(source, DEFAULT_LOAD_TIMEOUT)
    }

    pub fn with_timeout(source: Arc<dyn MenuSource>, timeout: Duration) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            source,
            timeout,
            snapshot: RwLock::new(Snapshot {
                menus: Arc::new(Vec::new()),
                loaded_at: None,
            }),
            generation,
        }
    }

    /// A store backed by the built-in fixture tree.
    pub fn with_fixture() -> Self {
        Self::new(Arc::new(FixtureMenuSource::new()))
    }

    /// The current root entries.
    pub fn state(&self) -> Arc<Vec<MenuEntry>> {
        self.snapshot
            .read()
            .expect("menu store lock poisoned")
            .menus
            .clone()
    }

    pub fn status(&self) -> MenuStatus {
        let snapshot = self.snapshot.read().expect("menu store lock poisoned");
        MenuStatus {
            state: if snapshot.loaded_at.is_some() {
                MenuState::Loaded
            } else {
                MenuState::Empty
            },
            entries: count_entries(&snapshot.menus),
            loaded_at: snapshot.loaded_at,
        }
    }

    /// Look up a single entry anywhere in the current tree.
    pub fn find(&self, menu_id: &str) -> Option<MenuEntry> {
        find_entry(&self.state(), menu_id).cloned()
    }

    /// Replace the whole tree. No validation: callers are trusted.
    ///
    /// Counts as the newest write, so any load already in flight will not
    /// commit over it.
    pub fn set_menus(&self, menus: Vec<MenuEntry>) -> Arc<Vec<MenuEntry>> {
        let mut snapshot = self.snapshot.write().expect("menu store lock poisoned");
        self.next_ticket();
        Self::commit(&mut snapshot, menus)
    }

    /// Fetch the tree from the configured source and commit it.
    ///
    /// The returned tree is the one now held by the store. On error the
    /// store is left exactly as it was.
    pub async fn load_menus(&self) -> Result<Arc<Vec<MenuEntry>>, MenuError> {
        let mut newer = self.generation.subscribe();
        let ticket = self.next_ticket();

        tracing::debug!("Loading menus from {} (ticket {})", self.source.describe(), ticket);

        let fetch = tokio::time::timeout(self.timeout, self.source.fetch_menus());
        let menus = tokio::select! {
            fetched = fetch => fetched.map_err(|_| FetchError::Timeout(self.timeout))??,
            _ = newer.wait_for(|generation| *generation != ticket) => {
                tracing::debug!("Menu load {} superseded while fetching", ticket);
                return Err(MenuError::Superseded);
            }
        };

        if let Err(violations) = validate_tree(&menus) {
            tracing::warn!(
                "Rejected menu tree from {}: {} violation(s)",
                self.source.describe(),
                violations.len()
            );
            return Err(MenuError::MalformedData(violations));
        }

        let mut snapshot = self.snapshot.write().expect("menu store lock poisoned");
        if *self.generation.borrow() != ticket {
            tracing::debug!("Menu load {} superseded before commit", ticket);
            return Err(MenuError::Superseded);
        }
        let committed = Self::commit(&mut snapshot, menus);
        tracing::info!("Loaded {} menu entries", count_entries(&committed));
        Ok(committed)
    }

    fn next_ticket(&self) -> u64 {
        let mut ticket = 0;
        self.generation.send_modify(|generation| {
            *generation += 1;
            ticket = *generation;
        });
        ticket
    }

    fn commit(snapshot: &mut Snapshot, menus: Vec<MenuEntry>) -> Arc<Vec<MenuEntry>> {
        snapshot.menus = Arc::new(menus);
        snapshot.loaded_at = Some(Utc::now());
        snapshot.menus.clone()
    }
}
