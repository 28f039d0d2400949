//! Linear undo/redo history of image versions.
//!
//! Every entry owns at most one display handle, minted lazily the first time
//! the UI asks to show it. Handles of entries that leave the retained sequence
//! are released immediately; the rest are released when the history drops.

use retouch_core::Artifact;
use tracing::{debug, error, info, trace};

use crate::handles::{DisplayHandle, HandleTable};

#[derive(Debug)]
pub struct HistoryEntry {
    artifact: Artifact,
    display: Option<DisplayHandle>,
}

impl HistoryEntry {
    fn new(artifact: Artifact) -> Self {
        Self {
            artifact,
            display: None,
        }
    }

    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    /// The handle, if one has been materialized.
    pub fn display(&self) -> Option<DisplayHandle> {
        self.display
    }
}

#[derive(Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
    handles: HandleTable,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the active entry; `None` while empty.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 < self.entries.len())
    }

    pub fn is_at_original(&self) -> bool {
        self.cursor == Some(0)
    }

    pub fn current(&self) -> Option<&Artifact> {
        self.cursor.map(|c| &self.entries[c].artifact)
    }

    pub fn original(&self) -> Option<&Artifact> {
        self.entries.first().map(|e| &e.artifact)
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn handles(&self) -> &HandleTable {
        &self.handles
    }

    /// Drop the redo tail, push `artifact`, and make it current.
    pub fn append(&mut self, artifact: Artifact) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        let discarded = self.entries.len().saturating_sub(keep);
        for entry in self.entries.drain(keep..) {
            release_entry(&mut self.handles, entry);
        }

        debug!(
            "Appending {} after index {:?} (discarded {} redo entries)",
            artifact.name(),
            self.cursor,
            discarded
        );
        self.entries.push(HistoryEntry::new(artifact));
        self.cursor = Some(self.entries.len() - 1);
    }

    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            trace!("Undo ignored at {:?}", self.cursor);
            return false;
        }
        self.cursor = self.cursor.map(|c| c - 1);
        debug!("Undo -> {:?}", self.cursor);
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            trace!("Redo ignored at {:?}", self.cursor);
            return false;
        }
        self.cursor = self.cursor.map(|c| c + 1);
        debug!("Redo -> {:?}", self.cursor);
        true
    }

    /// Jump back to the first entry. The redo tail stays reachable.
    pub fn reset_to_original(&mut self) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        self.cursor = Some(0);
        debug!("Reset to original ({} entries retained)", self.entries.len());
        true
    }

    /// Start over from a single new image.
    pub fn replace_all(&mut self, artifact: Artifact) {
        info!("Replacing history with {}", artifact.name());
        self.release_all();
        self.entries.push(HistoryEntry::new(artifact));
        self.cursor = Some(0);
    }

    pub fn clear(&mut self) {
        info!("Clearing history ({} entries)", self.entries.len());
        self.release_all();
        self.cursor = None;
    }

    /// Materialize (if needed) and return the handle for entry `index`.
    pub fn display_handle(&mut self, index: usize) -> Option<DisplayHandle> {
        let entry = self.entries.get_mut(index)?;
        if let Some(handle) = entry.display {
            return Some(handle);
        }
        let handle = self.handles.acquire(&entry.artifact);
        entry.display = Some(handle);
        Some(handle)
    }

    pub fn current_display(&mut self) -> Option<DisplayHandle> {
        self.cursor.and_then(|c| self.display_handle(c))
    }

    pub fn original_display(&mut self) -> Option<DisplayHandle> {
        self.display_handle(0)
    }

    fn release_all(&mut self) {
        for entry in self.entries.drain(..) {
            release_entry(&mut self.handles, entry);
        }
    }
}

impl Drop for History {
    fn drop(&mut self) {
        self.release_all();
    }
}

fn release_entry(handles: &mut HandleTable, entry: HistoryEntry) {
    if let Some(handle) = entry.display {
        // Entries only ever hold handles minted by their own table.
        if let Err(err) = handles.release(handle) {
            error!("Lost track of {} for {}: {}", handle, entry.artifact.name(), err);
        }
    }
}
