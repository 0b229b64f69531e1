//! Watering reminders.
//!
//! The store only knows the [`ReminderScheduler`] trait: one fire-and-forget
//! call per added plant. [`ReminderSpool`] is the local implementation. It
//! queues requests on a channel and a background task appends them to a JSON
//! spool file, where the CLI picks up the ones that are due.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::clock::Clock;
use crate::files;

pub const REMINDER_TITLE: &str = "Planto";

/// Outbound notification capability handed to the store.
///
/// Implementations must return promptly and never report failures back;
/// scheduling is best-effort.
pub trait ReminderScheduler: Send + Sync {
    /// Ask for permission to deliver reminders. Called once at startup.
    fn request_authorization(&self) {}

    /// Request a one-shot reminder `interval_days` from now.
    fn schedule_reminder(&self, plant_name: &str, interval_days: u32);
}

/// Drops every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopScheduler;

impl ReminderScheduler for NoopScheduler {
    fn schedule_reminder(&self, plant_name: &str, interval_days: u32) {
        tracing::debug!(plant = plant_name, interval_days, "reminders disabled, not scheduling");
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub plant_name: String,
    pub title: String,
    pub body: String,
    pub interval_days: u32,
    pub scheduled_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
}

impl Reminder {
    pub fn new(plant_name: &str, interval_days: u32, scheduled_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            plant_name: plant_name.to_string(),
            title: REMINDER_TITLE.to_string(),
            body: format!("Hey! let's water your {} buddy!", plant_name),
            interval_days,
            scheduled_at,
            due_at: scheduled_at + Duration::days(i64::from(interval_days)),
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at <= now
    }
}

#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("reminder spool I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("reminder spool at {path} is not valid: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode reminders: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The spool file of pending reminders, ordered by scheduling time.
#[derive(Debug, Clone)]
pub struct ReminderFile {
    path: PathBuf,
}

impl ReminderFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the spool. A missing file has no reminders.
    pub fn load(&self) -> Result<Vec<Reminder>, ReminderError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(self.io_err(source)),
        };

        serde_json::from_slice(&data).map_err(|source| ReminderError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the spool through a temp file and rename.
    pub fn save(&self, reminders: &[Reminder]) -> Result<(), ReminderError> {
        let data = serde_json::to_vec_pretty(reminders)?;
        files::write_atomic(&self.path, &data).map_err(|source| self.io_err(source))
    }

    /// Add one reminder. An unreadable spool is copied to `<path>.bak` and
    /// replaced by a spool holding only the new reminder.
    pub fn append(&self, reminder: Reminder) -> Result<(), ReminderError> {
        let mut reminders = self.load_or_recover()?;
        reminders.push(reminder);
        self.save(&reminders)
    }

    /// Remove and return the reminders due at `now`.
    pub fn take_due(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>, ReminderError> {
        let (due, pending): (Vec<_>, Vec<_>) =
            self.load_or_recover()?.into_iter().partition(|r| r.is_due(now));
        if !due.is_empty() {
            self.save(&pending)?;
        }
        Ok(due)
    }

    fn load_or_recover(&self) -> Result<Vec<Reminder>, ReminderError> {
        match self.load() {
            Err(e @ ReminderError::Corrupt { .. }) => {
                let backup = files::back_up(&self.path).map_err(|source| self.io_err(source))?;
                tracing::warn!(
                    error = %e,
                    backup = %backup.display(),
                    "reminder spool unreadable, starting a new one"
                );
                Ok(Vec::new())
            }
            other => other,
        }
    }

    fn ensure_dir(&self) -> Result<(), ReminderError> {
        match self.path.parent() {
            Some(parent) => fs::create_dir_all(parent).map_err(|source| self.io_err(source)),
            None => Ok(()),
        }
    }

    fn io_err(&self, source: io::Error) -> ReminderError {
        ReminderError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

enum SpoolCommand {
    Authorize,
    Schedule(Reminder),
    Flush(oneshot::Sender<()>),
}

/// [`ReminderScheduler`] backed by a [`ReminderFile`] and a background task.
#[derive(Clone)]
pub struct ReminderSpool {
    tx: mpsc::UnboundedSender<SpoolCommand>,
    clock: Arc<dyn Clock>,
}

impl ReminderSpool {
    /// Spawn the spool worker. Must be called from within a Tokio runtime.
    pub fn start(file: ReminderFile, clock: Arc<dyn Clock>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(file, rx));
        Self { tx, clock }
    }

    /// Wait until every request queued before this call has been written.
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(SpoolCommand::Flush(ack)).is_err() {
            return;
        }
        let _ = done.await;
    }

    fn send(&self, command: SpoolCommand) {
        if self.tx.send(command).is_err() {
            tracing::warn!("reminder spool worker has stopped, request dropped");
        }
    }
}

impl ReminderScheduler for ReminderSpool {
    fn request_authorization(&self) {
        self.send(SpoolCommand::Authorize);
    }

    fn schedule_reminder(&self, plant_name: &str, interval_days: u32) {
        let now = self.clock.now();
        let reminder = Reminder::new(plant_name, interval_days, now);
        tracing::info!(
            plant = plant_name,
            due_at = %reminder.due_at,
            "scheduling watering reminder"
        );
        self.send(SpoolCommand::Schedule(reminder));
    }
}

async fn run_worker(file: ReminderFile, mut rx: mpsc::UnboundedReceiver<SpoolCommand>) {
    while let Some(command) = rx.recv().await {
        match command {
            SpoolCommand::Authorize => match file.ensure_dir() {
                Ok(()) => tracing::debug!(path = %file.path().display(), "reminders allowed"),
                Err(e) => tracing::warn!(error = %e, "reminders denied: spool is not writable"),
            },
            SpoolCommand::Schedule(reminder) => {
                if let Err(e) = file.append(reminder) {
                    tracing::error!(error = %e, "failed to spool reminder");
                }
            }
            SpoolCommand::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    tracing::debug!("reminder spool worker stopped");
}
