//! Debounced Note Autosave
//!
//! Every edit replaces the note's pending content and restarts its quiet
//! period. When the period elapses the latest content is written once. Writes
//! for the same note never overlap: a save that comes due while another is
//! still running waits behind it.
//!
//! Failed saves are logged and dropped; the editor keeps the text and the
//! next edit schedules a new attempt.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::api::ApiResult;

/// Destination of autosaved note content
#[async_trait]
pub trait NoteWriter: Send + Sync {
    async fn save(&self, note_id: i64, content: &str) -> ApiResult<()>;
}

type Slots = HashMap<i64, NoteSlot>;

#[derive(Default)]
struct NoteSlot {
    /// Latest unsaved content
    content: Option<String>,
    /// Quiet-period timer; `None` once it has fired
    timer: Option<JoinHandle<()>>,
    /// Bumped by every edit; a timer only fires for the edit that armed it
    generation: u64,
    /// Serializes writes for this note
    write_gate: Arc<tokio::sync::Mutex<()>>,
}

impl NoteSlot {
    fn is_idle(&self) -> bool {
        self.content.is_none() && self.timer.is_none() && Arc::strong_count(&self.write_gate) == 1
    }
}

struct Inner {
    writer: Arc<dyn NoteWriter>,
    delay: Duration,
    notes: Mutex<Slots>,
    saved_at: Mutex<HashMap<i64, DateTime<Utc>>>,
}

/// Per-note debounced writer
#[derive(Clone)]
pub struct AutosaveScheduler {
    inner: Arc<Inner>,
}

impl AutosaveScheduler {
    pub fn new(writer: Arc<dyn NoteWriter>, delay: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                writer,
                delay,
                notes: Mutex::new(HashMap::new()),
                saved_at: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn delay(&self) -> Duration {
        self.inner.delay
    }

    /// Record an edit and restart the note's quiet period
    pub fn edit(&self, note_id: i64, content: impl Into<String>) {
        let mut notes = self.inner.lock_notes();
        self.schedule(&mut notes, note_id, content.into());
    }

    fn schedule(&self, notes: &mut Slots, note_id: i64, content: String) {
        let slot = notes.entry(note_id).or_default();
        slot.content = Some(content);
        slot.generation += 1;

        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }

        let inner = Arc::clone(&self.inner);
        let delay = self.inner.delay;
        let generation = slot.generation;
        slot.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            inner.fire(note_id, generation).await;
        }));

        tracing::trace!(note_id, delay_ms = delay.as_millis() as u64, "Autosave scheduled");
    }

    /// Drop unsaved content without writing it. Returns whether anything was pending.
    pub fn cancel(&self, note_id: i64) -> bool {
        let mut notes = self.inner.lock_notes();
        let Some(slot) = notes.get_mut(&note_id) else {
            return false;
        };

        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.generation += 1;
        let had_pending = slot.content.take().is_some();
        if had_pending {
            tracing::debug!(note_id, "Autosave cancelled");
        }
        Inner::settle(&mut notes, note_id);
        had_pending
    }

    /// Write pending content now, after any in-flight write for the note.
    /// Returns `Ok(false)` when nothing was pending.
    pub async fn flush(&self, note_id: i64) -> ApiResult<bool> {
        let pending = {
            let mut notes = self.inner.lock_notes();
            notes.get_mut(&note_id).and_then(|slot| {
                if let Some(timer) = slot.timer.take() {
                    timer.abort();
                }
                slot.generation += 1;
                slot.content
                    .take()
                    .map(|content| (content, Arc::clone(&slot.write_gate)))
            })
        };

        let Some((content, gate)) = pending else {
            Inner::settle(&mut self.inner.lock_notes(), note_id);
            return Ok(false);
        };
        let result = self.inner.write(note_id, &content, &gate).await;
        drop(gate);
        Inner::settle(&mut self.inner.lock_notes(), note_id);
        result.map(|_| true)
    }

    /// Whether the note has unsaved content
    pub fn is_pending(&self, note_id: i64) -> bool {
        self.inner
            .lock_notes()
            .get(&note_id)
            .map(|slot| slot.content.is_some())
            .unwrap_or(false)
    }

    /// Time of the note's last successful save
    pub fn last_saved(&self, note_id: i64) -> Option<DateTime<Utc>> {
        self.inner.lock_saved_at().get(&note_id).copied()
    }

    /// Flush every pending note and wait for in-flight writes to finish
    pub async fn shutdown(&self) {
        let ids: Vec<i64> = self.inner.lock_notes().keys().copied().collect();

        for id in &ids {
            if let Err(e) = self.flush(*id).await {
                tracing::warn!(note_id = id, error = %e, "Final autosave failed");
            }
        }

        let gates: Vec<_> = self
            .inner
            .lock_notes()
            .values()
            .map(|slot| Arc::clone(&slot.write_gate))
            .collect();
        for gate in gates {
            let _ = gate.lock().await;
        }
    }
}

impl Inner {
    fn lock_notes(&self) -> MutexGuard<'_, Slots> {
        // A panic while holding the map leaves it structurally intact
        self.notes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_saved_at(&self) -> MutexGuard<'_, HashMap<i64, DateTime<Utc>>> {
        self.saved_at.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Forget the note's slot once nothing is pending, scheduled or writing
    fn settle(notes: &mut Slots, note_id: i64) {
        if notes.get(&note_id).is_some_and(NoteSlot::is_idle) {
            notes.remove(&note_id);
        }
    }

    async fn fire(&self, note_id: i64, generation: u64) {
        let pending = {
            let mut notes = self.lock_notes();
            match notes.get_mut(&note_id) {
                Some(slot) if slot.generation == generation => {
                    slot.timer = None;
                    slot.content
                        .take()
                        .map(|content| (content, Arc::clone(&slot.write_gate)))
                }
                // Superseded by a later edit, cancel or flush
                _ => None,
            }
        };

        let Some((content, gate)) = pending else {
            return;
        };
        if let Err(e) = self.write(note_id, &content, &gate).await {
            tracing::warn!(note_id, error = %e, "Autosave failed");
        }
        drop(gate);
        Self::settle(&mut self.lock_notes(), note_id);
    }

    async fn write(
        &self,
        note_id: i64,
        content: &str,
        gate: &tokio::sync::Mutex<()>,
    ) -> ApiResult<()> {
        let _in_flight = gate.lock().await;

        self.writer.save(note_id, content).await?;

        self.lock_saved_at().insert(note_id, Utc::now());
        tracing::debug!(note_id, chars = content.chars().count(), "Note autosaved");
        Ok(())
    }
}
