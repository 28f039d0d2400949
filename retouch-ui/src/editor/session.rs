//! The editing session: everything a front end needs to render and drive.
//!
//! A session owns the history, the active tab, the pending selection, and the
//! dispatcher. Every user action is one method here. Failed actions leave the
//! history untouched and record a message the UI can show until dismissed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use egui::{Pos2, Rect};
use retouch_ai::{EditKind, EditRequest, EditService, ServiceError};
use retouch_core::{Artifact, CropRect, Hotspot, Tab};
use retouch_history::{export_current, DisplayHandle, History};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::crop::{crop_artifact, image_dimensions, CropError};
use super::dispatch::{Completion, Dispatcher};
use super::selection::{AspectRatio, ImageViewport, Selection};
use super::tabs::{swipe_target, SwipeGesture, SwipeTracker};

/// Why an action did not produce a new history entry.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("No image loaded to {0}.")]
    NoImage(&'static str),

    #[error("Please enter a description for your {0}.")]
    EmptyInstruction(&'static str),

    #[error("Please click on the image to select an area to edit.")]
    MissingHotspot,

    #[error("Please select an area to crop.")]
    MissingCrop,

    #[error("An edit is already in progress. Please wait for it to finish.")]
    Busy,

    #[error("{} {source}", failure_prefix(.kind))]
    Service {
        kind: EditKind,
        #[source]
        source: ServiceError,
    },

    #[error("Could not process the crop. {0}")]
    Crop(#[from] CropError),
}

/// What became of a finished request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The result is the new current entry.
    Applied,
    /// The image it was made from was replaced in the meantime; history is untouched.
    Discarded,
}

fn failure_prefix(kind: &EditKind) -> &'static str {
    match kind {
        EditKind::Edit => "Failed to generate the image.",
        EditKind::Filter => "Failed to apply the filter.",
        EditKind::Adjustment => "Failed to apply the adjustment.",
    }
}

fn no_image_target(kind: EditKind) -> &'static str {
    match kind {
        EditKind::Edit => "edit",
        EditKind::Filter => "apply a filter to",
        EditKind::Adjustment => "apply an adjustment to",
    }
}

pub struct EditorSession {
    history: History,
    dispatcher: Dispatcher,
    tab: Tab,
    selection: Selection,
    aspect: AspectRatio,
    comparing: bool,
    prompt: String,
    error: Option<String>,
    swipe: SwipeTracker,
    // Bumped whenever the whole history is replaced, so a request started
    // against a previous image cannot land in the new one.
    epoch: u64,
}

impl EditorSession {
    pub fn new(service: Arc<dyn EditService>) -> Self {
        Self::with_gesture(service, SwipeGesture::default())
    }

    pub fn with_gesture(service: Arc<dyn EditService>, gesture: SwipeGesture) -> Self {
        Self {
            history: History::new(),
            dispatcher: Dispatcher::new(service),
            tab: Tab::default(),
            selection: Selection::None,
            aspect: AspectRatio::default(),
            comparing: false,
            prompt: String::new(),
            error: None,
            swipe: SwipeTracker::new(gesture),
            epoch: 0,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn current(&self) -> Option<&Artifact> {
        self.history.current()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn hotspot(&self) -> Option<Hotspot> {
        self.selection.hotspot()
    }

    pub fn aspect(&self) -> AspectRatio {
        self.aspect
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn is_busy(&self) -> bool {
        self.dispatcher.is_busy()
    }

    pub fn is_comparing(&self) -> bool {
        self.comparing
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn current_display(&mut self) -> Option<DisplayHandle> {
        self.history.current_display()
    }

    pub fn original_display(&mut self) -> Option<DisplayHandle> {
        self.history.original_display()
    }

    // ---- image lifecycle ----

    /// Start a new session from an uploaded image.
    pub fn load_image(&mut self, artifact: Artifact) {
        info!("Loaded {} ({} bytes)", artifact.name(), artifact.len());
        self.epoch += 1;
        self.history.replace_all(artifact);
        self.error = None;
        self.selection = Selection::None;
        self.tab = Tab::Retouch;
        self.comparing = false;
    }

    /// Drop the current image and return to the start screen.
    pub fn new_image(&mut self) {
        info!("Starting over");
        self.epoch += 1;
        self.history.clear();
        self.error = None;
        self.prompt.clear();
        self.selection = Selection::None;
        self.tab = Tab::Retouch;
        self.comparing = false;
    }

    pub fn download(&self, dir: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
        export_current(dir, &self.history)
    }

    // ---- history navigation ----

    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo();
        if moved {
            self.selection = Selection::None;
        }
        moved
    }

    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo();
        if moved {
            self.selection = Selection::None;
        }
        moved
    }

    pub fn reset(&mut self) -> bool {
        let moved = self.history.reset_to_original();
        if moved {
            self.error = None;
            self.selection = Selection::None;
            self.comparing = false;
        }
        moved
    }

    /// Flip the compare-with-original overlay. Only available past the original.
    pub fn toggle_compare(&mut self) -> bool {
        if self.history.can_undo() {
            self.comparing = !self.comparing;
        } else {
            self.comparing = false;
        }
        self.comparing
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    // ---- tabs and selection ----

    pub fn select_tab(&mut self, tab: Tab) {
        if tab == self.tab {
            return;
        }
        match (self.tab, self.selection) {
            (Tab::Retouch, Selection::Point { .. }) | (Tab::Crop, Selection::Crop(_)) => {
                debug!("Leaving {} clears {:?}", self.tab, self.selection);
                self.selection = Selection::None;
            }
            _ => {}
        }
        info!("Tab {} -> {}", self.tab, tab);
        self.tab = tab;
    }

    pub fn touch_start(&mut self, pos: Pos2) {
        self.swipe.begin(pos);
    }

    /// End a touch; switches tab on a recognised swipe and returns the new tab.
    pub fn touch_end(&mut self, pos: Pos2) -> Option<Tab> {
        let direction = self.swipe.finish(pos)?;
        let target = swipe_target(self.tab, direction)?;
        self.select_tab(target);
        Some(target)
    }

    /// Handle a click on the displayed image. Only the retouch tab places hotspots.
    pub fn click_image(&mut self, viewport: &ImageViewport, click: Pos2) -> Option<Hotspot> {
        if self.tab != Tab::Retouch || self.history.is_empty() {
            return None;
        }
        let (hotspot, display) = viewport.to_hotspot(click)?;
        self.selection = Selection::Point { hotspot, display };
        Some(hotspot)
    }

    /// Place a hotspot directly in natural pixels.
    pub fn set_hotspot(&mut self, hotspot: Hotspot) {
        self.selection = Selection::Point {
            hotspot,
            display: Pos2::new(hotspot.x as f32, hotspot.y as f32),
        };
    }

    pub fn set_aspect(&mut self, aspect: AspectRatio) {
        self.aspect = aspect;
        if let Selection::Crop(rect) = self.selection {
            self.set_crop(rect);
        }
    }

    /// Record a crop rectangle in natural pixels, fitted to the image and
    /// the aspect preset.
    pub fn set_crop(&mut self, rect: CropRect) {
        let fitted = match self.current_size() {
            Some((width, height)) => self.aspect.fit(rect, width, height),
            // Undecodable image: keep the raw rect, the crop itself reports the failure.
            None => (!rect.is_empty()).then_some(rect),
        };
        self.selection = match fitted {
            Some(rect) => Selection::Crop(rect),
            None => Selection::None,
        };
    }

    fn current_size(&self) -> Option<(u32, u32)> {
        let current = self.history.current()?;
        match image_dimensions(current) {
            Ok(size) => Some(size),
            Err(err) => {
                debug!("Could not read size of {}: {}", current.name(), err);
                None
            }
        }
    }

    /// Record a crop rectangle dragged out in display coordinates.
    pub fn drag_crop(&mut self, viewport: &ImageViewport, drag: Rect) -> Option<CropRect> {
        match viewport.to_crop_rect(drag) {
            Some(rect) => {
                self.set_crop(rect);
                self.selection.crop()
            }
            None => {
                self.selection = Selection::None;
                None
            }
        }
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    // ---- edit actions ----

    /// Localized edit using the typed prompt and the pending hotspot.
    pub fn generate(&mut self) -> Result<(), EditError> {
        let instruction = self.prompt.clone();
        self.submit_edit(&instruction)
    }

    /// A one-click retouch action; still needs a hotspot.
    pub fn quick_action(&mut self, instruction: &str) -> Result<(), EditError> {
        self.prompt = instruction.to_string();
        self.submit_edit(instruction)
    }

    pub fn apply_filter(&mut self, instruction: &str) -> Result<(), EditError> {
        let request = EditRequest::Filter {
            instruction: instruction.trim().to_string(),
        };
        self.dispatch(request)
    }

    pub fn apply_adjustment(&mut self, instruction: &str) -> Result<(), EditError> {
        let request = EditRequest::Adjustment {
            instruction: instruction.trim().to_string(),
        };
        self.dispatch(request)
    }

    fn submit_edit(&mut self, instruction: &str) -> Result<(), EditError> {
        let hotspot = self.selection.hotspot();
        let result = self.check_ready(EditKind::Edit, instruction).and_then(|()| {
            hotspot.ok_or(EditError::MissingHotspot).map(|hotspot| EditRequest::Edit {
                instruction: instruction.trim().to_string(),
                hotspot,
            })
        });
        match result {
            Ok(request) => self.dispatch(request),
            Err(err) => Err(self.fail(err)),
        }
    }

    fn check_ready(&self, kind: EditKind, instruction: &str) -> Result<(), EditError> {
        if self.dispatcher.is_busy() {
            return Err(EditError::Busy);
        }
        if self.history.is_empty() {
            return Err(EditError::NoImage(no_image_target(kind)));
        }
        if instruction.trim().is_empty() {
            return Err(EditError::EmptyInstruction(kind.noun()));
        }
        Ok(())
    }

    fn dispatch(&mut self, request: EditRequest) -> Result<(), EditError> {
        if let Err(err) = self.check_ready(request.kind(), request.instruction()) {
            return Err(self.fail(err));
        }
        let Some(image) = self.history.current().cloned() else {
            return Err(self.fail(EditError::NoImage(no_image_target(request.kind()))));
        };

        self.error = None;
        if self.dispatcher.submit(image, request, self.epoch) {
            Ok(())
        } else {
            Err(self.fail(EditError::Busy))
        }
    }

    /// Apply the pending crop locally. Only valid on the crop tab.
    pub fn apply_crop(&mut self) -> Result<(), EditError> {
        if self.dispatcher.is_busy() {
            return Err(self.fail(EditError::Busy));
        }
        let Some(current) = self.history.current().cloned() else {
            return Err(self.fail(EditError::NoImage("crop")));
        };
        let rect = match (self.tab, self.selection) {
            (Tab::Crop, Selection::Crop(rect)) if !rect.is_empty() => rect,
            _ => return Err(self.fail(EditError::MissingCrop)),
        };

        match crop_artifact(&current, rect) {
            Ok(cropped) => {
                self.commit(cropped);
                Ok(())
            }
            Err(err) => Err(self.fail(err.into())),
        }
    }

    // ---- completion ----

    /// Check for a finished request and fold it into the session.
    pub fn poll(&mut self) -> Option<Result<EditOutcome, EditError>> {
        let completion = self.dispatcher.poll()?;
        Some(self.complete(completion))
    }

    /// Block until the outstanding request resolves.
    pub fn wait(&mut self) -> Option<Result<EditOutcome, EditError>> {
        let completion = self.dispatcher.wait()?;
        Some(self.complete(completion))
    }

    fn complete(&mut self, completion: Completion) -> Result<EditOutcome, EditError> {
        if completion.tag != self.epoch {
            warn!(
                "Discarding {} result for an image that is no longer loaded",
                completion.kind.noun()
            );
            return Ok(EditOutcome::Discarded);
        }

        match completion.result {
            Ok(artifact) => {
                if completion.kind == EditKind::Edit {
                    self.prompt.clear();
                }
                self.commit(artifact);
                Ok(EditOutcome::Applied)
            }
            Err(source) => Err(self.fail(EditError::Service {
                kind: completion.kind,
                source,
            })),
        }
    }

    fn commit(&mut self, artifact: Artifact) {
        self.history.append(artifact);
        self.selection = Selection::None;
        self.error = None;
    }

    fn fail(&mut self, err: EditError) -> EditError {
        warn!("{}", err);
        self.error = Some(err.to_string());
        err
    }
}
