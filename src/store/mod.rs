//! The plant collection store.
//!
//! [`PlantStore`] owns the canonical list of plants and is the only thing that
//! mutates it. Every mutation runs under one lock, then writes the whole list
//! as a snapshot before the lock is released, so callers see a mutation as
//! complete only once its save attempt is done. Save failures are logged and
//! kept in [`PlantStore::last_save_error`]; the in-memory state stays correct.
//!
//! If a snapshot exists but can't be read and can't be copied aside either,
//! saving is refused for the life of the store so the file is not replaced.

mod snapshot;

pub use snapshot::{SnapshotError, SnapshotFile};

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::clock::Clock;
use crate::completion::{self, DailyStatus};
use crate::models::{CreatePlantInput, Plant};
use crate::reminder::ReminderScheduler;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("index {index} is out of range for {len} plants")]
    OutOfRange { index: usize, len: usize },
}

/// Published after a mutation and its save attempt have finished.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Added(Uuid),
    Updated(Uuid),
    Removed(Vec<Uuid>),
    WateredToggled { id: Uuid, watered: bool },
    RolledOver { cleared: usize },
    SaveFailed(String),
}

struct State {
    plants: Vec<Plant>,
    last_save_error: Option<String>,
    load_error: Option<String>,
    save_blocked: Option<String>,
}

#[derive(Clone)]
pub struct PlantStore {
    state: Arc<Mutex<State>>,
    snapshot: Option<SnapshotFile>,
    scheduler: Arc<dyn ReminderScheduler>,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<StoreEvent>,
}

impl PlantStore {
    /// Open the store backed by the snapshot at `path`.
    ///
    /// A missing snapshot starts empty. An unreadable one also starts empty:
    /// the file is copied to `<path>.bak` and the failure is kept in
    /// [`load_error`](Self::load_error). When that copy fails too, saves are
    /// refused and reported through [`last_save_error`](Self::last_save_error).
    /// A rollover pass runs right after loading.
    pub fn open(
        path: impl Into<PathBuf>,
        scheduler: Arc<dyn ReminderScheduler>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let snapshot = SnapshotFile::new(path);
        let loaded = load_plants(&snapshot);
        let store = Self::with_state(Some(snapshot), loaded, scheduler, clock);
        store.refresh_daily_state();
        store
    }

    /// A store that never touches disk.
    pub fn in_memory(scheduler: Arc<dyn ReminderScheduler>, clock: Arc<dyn Clock>) -> Self {
        Self::with_state(None, Loaded::default(), scheduler, clock)
    }

    fn with_state(
        snapshot: Option<SnapshotFile>,
        loaded: Loaded,
        scheduler: Arc<dyn ReminderScheduler>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(State {
                plants: loaded.plants,
                last_save_error: None,
                load_error: loaded.error,
                save_blocked: loaded.save_blocked,
            })),
            snapshot,
            scheduler,
            clock,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    // ============================================================
    // Reads
    // ============================================================

    pub fn plants(&self) -> Vec<Plant> {
        self.lock().plants.clone()
    }

    pub fn get(&self, id: Uuid) -> Option<Plant> {
        self.lock().plants.iter().find(|p| p.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().plants.is_empty()
    }

    pub fn is_watered_today(&self, id: Uuid) -> Option<bool> {
        let now = self.clock.now();
        self.lock()
            .plants
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.is_watered_today(now, &*self.clock))
    }

    pub fn completed_count(&self) -> usize {
        let now = self.clock.now();
        completion::completed_count(&self.lock().plants, now, &*self.clock)
    }

    pub fn progress_fraction(&self) -> f64 {
        let now = self.clock.now();
        completion::progress_fraction(&self.lock().plants, now, &*self.clock)
    }

    pub fn status(&self) -> DailyStatus {
        let now = self.clock.now();
        completion::status(&self.lock().plants, now, &*self.clock)
    }

    pub fn status_line(&self) -> String {
        self.status().to_string()
    }

    pub fn is_all_done(&self) -> bool {
        let now = self.clock.now();
        completion::is_all_done(&self.lock().plants, now, &*self.clock)
    }

    /// The most recent save failure, cleared by the next successful save.
    pub fn last_save_error(&self) -> Option<String> {
        self.lock().last_save_error.clone()
    }

    /// Why the snapshot could not be read at startup, if it couldn't.
    pub fn load_error(&self) -> Option<String> {
        self.lock().load_error.clone()
    }

    // ============================================================
    // Mutations
    // ============================================================

    /// Append a new plant and request a reminder for it.
    pub fn add(&self, input: CreatePlantInput) -> Plant {
        let plant = Plant::new(input);
        {
            let mut state = self.lock();
            state.plants.push(plant.clone());
            self.persist(&mut state);
        }
        self.publish(StoreEvent::Added(plant.id));

        self.scheduler
            .schedule_reminder(&plant.name, plant.watering_days.interval_days());
        plant
    }

    /// Replace the plant with the same id. Returns `false` if there is none.
    pub fn update(&self, plant: Plant) -> bool {
        let id = plant.id;
        {
            let mut state = self.lock();
            let Some(slot) = state.plants.iter_mut().find(|p| p.id == id) else {
                tracing::debug!(%id, "update skipped, plant not found");
                return false;
            };
            *slot = plant;
            self.persist(&mut state);
        }
        self.publish(StoreEvent::Updated(id));
        true
    }

    pub fn remove(&self, id: Uuid) -> bool {
        {
            let mut state = self.lock();
            let Some(index) = state.plants.iter().position(|p| p.id == id) else {
                tracing::debug!(%id, "remove skipped, plant not found");
                return false;
            };
            state.plants.remove(index);
            self.persist(&mut state);
        }
        self.publish(StoreEvent::Removed(vec![id]));
        true
    }

    /// Remove plants by position. Every index must be valid for the current
    /// list or nothing is removed. Duplicate indices count once.
    pub fn remove_at(&self, indices: &[usize]) -> Result<Vec<Plant>, StoreError> {
        let removed = {
            let mut state = self.lock();
            let len = state.plants.len();
            if let Some(&index) = indices.iter().find(|&&i| i >= len) {
                return Err(StoreError::OutOfRange { index, len });
            }

            let mut positions = indices.to_vec();
            positions.sort_unstable();
            positions.dedup();
            if positions.is_empty() {
                return Ok(Vec::new());
            }

            let mut removed: Vec<Plant> = positions
                .iter()
                .rev()
                .map(|&i| state.plants.remove(i))
                .collect();
            removed.reverse();
            self.persist(&mut state);
            removed
        };

        self.publish(StoreEvent::Removed(removed.iter().map(|p| p.id).collect()));
        Ok(removed)
    }

    /// Flip today's watering for a plant.
    ///
    /// Watered today becomes unwatered with no `last_watered_at` at all, so
    /// an earlier watering date is not restored. Otherwise the plant is
    /// marked watered now. Returns the new state, or `None` if not found.
    pub fn toggle_watered(&self, id: Uuid) -> Option<bool> {
        let now = self.clock.now();
        let watered = {
            let mut state = self.lock();
            let plant = state.plants.iter_mut().find(|p| p.id == id)?;
            if plant.is_watered_today(now, &*self.clock) {
                plant.is_watered = false;
                plant.last_watered_at = None;
            } else {
                plant.is_watered = true;
                plant.last_watered_at = Some(now);
            }
            let watered = plant.is_watered;
            self.persist(&mut state);
            watered
        };

        self.publish(StoreEvent::WateredToggled { id, watered });
        Some(watered)
    }

    /// Run the daily rollover and save if anything changed. Returns how many
    /// plants had a stale watered flag cleared.
    pub fn refresh_daily_state(&self) -> usize {
        let now = self.clock.now();
        let cleared = {
            let mut state = self.lock();
            let cleared = completion::daily_rollover(&mut state.plants, now, &*self.clock);
            if cleared > 0 {
                self.persist(&mut state);
            }
            cleared
        };

        if cleared > 0 {
            tracing::info!(cleared, "cleared stale watered flags");
            self.publish(StoreEvent::RolledOver { cleared });
        }
        cleared
    }

    // ============================================================
    // Internals
    // ============================================================

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("plant store lock poisoned")
    }

    fn persist(&self, state: &mut State) {
        let Some(snapshot) = &self.snapshot else {
            return;
        };

        let result = match &state.save_blocked {
            Some(reason) => Err(format!("not saving over an unreadable snapshot: {}", reason)),
            None => snapshot.save(&state.plants).map_err(|e| e.to_string()),
        };

        match result {
            Ok(()) => state.last_save_error = None,
            Err(message) => {
                tracing::warn!(error = %message, "failed to save plants, keeping in-memory state");
                state.last_save_error = Some(message.clone());
                self.publish(StoreEvent::SaveFailed(message));
            }
        }
    }

    fn publish(&self, event: StoreEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

#[derive(Default)]
struct Loaded {
    plants: Vec<Plant>,
    error: Option<String>,
    save_blocked: Option<String>,
}

fn load_plants(snapshot: &SnapshotFile) -> Loaded {
    let e = match snapshot.load() {
        Ok(plants) => {
            tracing::debug!(
                path = %snapshot.path().display(),
                plants = plants.len(),
                "snapshot loaded"
            );
            return Loaded {
                plants: dedup_ids(plants),
                ..Loaded::default()
            };
        }
        Err(e) => e,
    };

    tracing::warn!(error = %e, "could not load plants, starting with an empty list");
    let save_blocked = match snapshot.back_up() {
        Ok(backup) => {
            tracing::warn!(backup = %backup.display(), "kept a copy of the unreadable snapshot");
            None
        }
        Err(backup_err) => {
            tracing::error!(
                error = %backup_err,
                "could not back up unreadable snapshot, saving is disabled"
            );
            Some(backup_err.to_string())
        }
    };

    Loaded {
        plants: Vec::new(),
        error: Some(e.to_string()),
        save_blocked,
    }
}

fn dedup_ids(plants: Vec<Plant>) -> Vec<Plant> {
    let mut seen = HashSet::new();
    plants
        .into_iter()
        .filter(|p| {
            let fresh = seen.insert(p.id);
            if !fresh {
                tracing::warn!(id = %p.id, name = %p.name, "dropping plant with duplicate id");
            }
            fresh
        })
        .collect()
}
