//! Display-handle table.
//!
//! A display handle is the UI's cheap reference to an artifact. Every handle
//! handed out by [`HandleTable::acquire`] must come back through
//! [`HandleTable::release`] exactly once.

use std::collections::HashMap;
use std::fmt;

use retouch_core::Artifact;
use thiserror::Error;
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// Opaque, copyable reference to a materialized artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayHandle(Uuid);

impl DisplayHandle {
    pub fn id(&self) -> Uuid {
        self.0
    }

    pub fn url(&self) -> String {
        format!("blob:retouch/{}", self.0)
    }
}

impl fmt::Display for DisplayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blob:retouch/{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandleError {
    #[error("display handle {0} is not live")]
    NotLive(DisplayHandle),
}

#[derive(Debug, Clone)]
struct HandleRecord {
    artifact_name: String,
    byte_len: usize,
}

/// Tracks every live display handle.
#[derive(Debug, Default)]
pub struct HandleTable {
    live: HashMap<DisplayHandle, HandleRecord>,
    acquired: u64,
    released: u64,
}

impl HandleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&mut self, artifact: &Artifact) -> DisplayHandle {
        let handle = DisplayHandle(Uuid::new_v4());
        self.live.insert(
            handle,
            HandleRecord {
                artifact_name: artifact.name().to_string(),
                byte_len: artifact.len(),
            },
        );
        self.acquired += 1;
        debug!("Acquired {} for {}", handle, artifact.name());
        handle
    }

    pub fn release(&mut self, handle: DisplayHandle) -> Result<(), HandleError> {
        match self.live.remove(&handle) {
            Some(record) => {
                self.released += 1;
                trace!(
                    "Released {} ({}, {} bytes)",
                    handle,
                    record.artifact_name,
                    record.byte_len
                );
                Ok(())
            }
            None => {
                warn!("Attempted to release {} which is not live", handle);
                Err(HandleError::NotLive(handle))
            }
        }
    }

    pub fn is_live(&self, handle: DisplayHandle) -> bool {
        self.live.contains_key(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn acquired(&self) -> u64 {
        self.acquired
    }

    pub fn released(&self) -> u64 {
        self.released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retouch_core::ImageMime;

    fn artifact() -> Artifact {
        Artifact::new("a.png", ImageMime::Png, vec![0u8; 16])
    }

    #[test]
    fn acquire_then_release() {
        let mut table = HandleTable::new();
        let handle = table.acquire(&artifact());
        assert!(table.is_live(handle));
        assert_eq!(table.live_count(), 1);

        table.release(handle).unwrap();
        assert!(!table.is_live(handle));
        assert_eq!(table.live_count(), 0);
        assert_eq!(table.acquired(), 1);
        assert_eq!(table.released(), 1);
    }

    #[test]
    fn double_release_is_an_error() {
        let mut table = HandleTable::new();
        let handle = table.acquire(&artifact());
        table.release(handle).unwrap();
        assert_eq!(table.release(handle), Err(HandleError::NotLive(handle)));
        assert_eq!(table.released(), 1);
    }

    #[test]
    fn handles_are_distinct() {
        let mut table = HandleTable::new();
        let a = table.acquire(&artifact());
        let b = table.acquire(&artifact());
        assert_ne!(a, b);
        assert!(a.url().starts_with("blob:retouch/"));
        assert_eq!(a.url(), a.to_string());
    }
}
