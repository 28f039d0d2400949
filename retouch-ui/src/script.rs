//! Scripted sessions: a JSON list of editor actions replayed in order.
//!
//! ```json
//! [
//!   {"op": "edit", "prompt": "remove the lamp post", "x": 420, "y": 310},
//!   {"op": "quick", "action": "teeth", "x": 200, "y": 260},
//!   {"op": "filter", "preset": "noir"},
//!   {"op": "undo"},
//!   {"op": "adjust", "prompt": "lift the shadows"},
//!   {"op": "crop", "x": 0, "y": 0, "width": 800, "height": 600, "aspect": "four_three"}
//! ]
//! ```

use anyhow::{bail, Context};
use retouch_core::{CropRect, Hotspot, Tab};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::editor::{AspectRatio, EditOutcome, EditorSession};
use crate::presets::{find_adjustment, find_filter, find_quick_action};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Edit {
        prompt: String,
        x: u32,
        y: u32,
    },
    /// One of the retouch quick actions, by id or label.
    Quick {
        action: String,
        x: u32,
        y: u32,
    },
    Filter {
        #[serde(default)]
        preset: Option<String>,
        #[serde(default)]
        prompt: Option<String>,
    },
    Adjust {
        #[serde(default)]
        preset: Option<String>,
        #[serde(default)]
        prompt: Option<String>,
    },
    Crop {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        #[serde(default)]
        aspect: AspectRatio,
    },
    Undo,
    Redo,
    Reset,
}

pub fn load_steps(path: impl AsRef<Path>) -> anyhow::Result<Vec<Step>> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("read steps file: {}", path.display()))?;
    let steps: Vec<Step> = serde_json::from_str(&data).context("parse steps json")?;
    Ok(steps)
}

/// Resolve a preset id or free-text prompt into the instruction to send.
pub fn resolve_instruction(
    preset: Option<&str>,
    prompt: Option<&str>,
    lookup: impl Fn(&str) -> Option<&'static str>,
) -> anyhow::Result<String> {
    match (preset, prompt) {
        (Some(id), _) => lookup(id)
            .map(str::to_string)
            .with_context(|| format!("unknown preset: {id}")),
        (None, Some(prompt)) => Ok(prompt.to_string()),
        (None, None) => Ok(String::new()),
    }
}

/// Run one step to completion. Service calls are waited for before returning.
pub fn run_step(session: &mut EditorSession, step: &Step) -> anyhow::Result<()> {
    debug!("Running step {:?}", step);
    match step {
        Step::Edit { prompt, x, y } => {
            session.select_tab(Tab::Retouch);
            session.set_hotspot(Hotspot::new(*x, *y));
            session.set_prompt(prompt.clone());
            session.generate()?;
            finish(session)?;
        }
        Step::Quick { action, x, y } => {
            let action =
                find_quick_action(action).with_context(|| format!("unknown quick action: {action}"))?;
            session.select_tab(Tab::Retouch);
            session.set_hotspot(Hotspot::new(*x, *y));
            session.quick_action(action.prompt)?;
            finish(session)?;
        }
        Step::Filter { preset, prompt } => {
            session.select_tab(Tab::Filters);
            let instruction = resolve_instruction(preset.as_deref(), prompt.as_deref(), |id| {
                find_filter(id).map(|p| p.prompt)
            })?;
            session.apply_filter(&instruction)?;
            finish(session)?;
        }
        Step::Adjust { preset, prompt } => {
            session.select_tab(Tab::Adjust);
            let instruction = resolve_instruction(preset.as_deref(), prompt.as_deref(), |id| {
                find_adjustment(id).map(|p| p.prompt)
            })?;
            session.apply_adjustment(&instruction)?;
            finish(session)?;
        }
        Step::Crop {
            x,
            y,
            width,
            height,
            aspect,
        } => {
            session.select_tab(Tab::Crop);
            session.set_aspect(*aspect);
            session.set_crop(CropRect::new(*x, *y, *width, *height));
            session.apply_crop()?;
        }
        Step::Undo => {
            session.undo();
        }
        Step::Redo => {
            session.redo();
        }
        Step::Reset => {
            session.reset();
        }
    }
    Ok(())
}

fn finish(session: &mut EditorSession) -> anyhow::Result<()> {
    match session.wait() {
        Some(Ok(EditOutcome::Applied)) => Ok(()),
        Some(Ok(EditOutcome::Discarded)) => {
            bail!("the result was discarded because the image was replaced")
        }
        Some(Err(err)) => Err(err.into()),
        None => bail!("no request was dispatched"),
    }
}

pub fn run_steps(session: &mut EditorSession, steps: &[Step]) -> anyhow::Result<()> {
    for (index, step) in steps.iter().enumerate() {
        run_step(session, step).with_context(|| format!("step {} failed", index + 1))?;
    }
    info!(
        "Ran {} steps; history has {} entries",
        steps.len(),
        session.history().len()
    );
    Ok(())
}
