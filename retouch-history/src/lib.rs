//! retouch-history: edit history and display-handle lifecycle for Retouch.
//!
//! Design rules:
//! - History is linear: appending after an undo discards the redo tail.
//! - Every operation is total; there is nothing to fail.
//! - A display handle is released exactly once, when its entry stops being
//!   retained or the history is dropped.

pub mod export;
pub mod handles;
pub mod history;

pub use export::{download_name, export_artifact, export_current};
pub use handles::{DisplayHandle, HandleError, HandleTable};
pub use history::{History, HistoryEntry};
