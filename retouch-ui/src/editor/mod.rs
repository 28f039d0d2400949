// Editor module for Retouch.

pub mod crop;
pub mod dispatch;
pub mod selection;
pub mod session;
pub mod tabs;

pub use crop::{crop_artifact, image_dimensions, CropError};
pub use dispatch::{Completion, Dispatcher};
pub use selection::{AspectRatio, ImageViewport, Selection};
pub use session::{EditError, EditOutcome, EditorSession};
pub use tabs::{swipe_target, SwipeDirection, SwipeGesture, SwipeTracker};
