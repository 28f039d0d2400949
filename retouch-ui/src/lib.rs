//! retouch-ui: the Retouch editing session and its command-line front end.
//!
//! [`editor::EditorSession`] holds all interactive state (history, tab,
//! selection, busy flag, last error). Front ends feed it user events and read
//! it back to render.

pub mod config;
pub mod editor;
pub mod logging;
pub mod presets;
pub mod samples;
pub mod script;

pub use editor::{EditError, EditOutcome, EditorSession};
