#![allow(dead_code)]

use std::io::Cursor;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use image::{ImageFormat, Rgba, RgbaImage};
use retouch_ai::{EditService, ServiceError};
use retouch_core::{Artifact, Hotspot, ImageMime};

/// In-memory edit service that records every call.
#[derive(Default)]
pub struct ScriptedService {
    calls: Mutex<Vec<String>>,
    gate: Mutex<Option<Receiver<()>>>,
    failure: Mutex<Option<String>>,
}

impl ScriptedService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The first call blocks until the returned sender fires.
    pub fn gated() -> (Arc<Self>, Sender<()>) {
        let (sender, receiver) = mpsc::channel();
        let service = Self {
            gate: Mutex::new(Some(receiver)),
            ..Self::default()
        };
        (Arc::new(service), sender)
    }

    pub fn fail_next(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, call: String, prefix: &str, image: &Artifact) -> Result<Artifact, ServiceError> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.recv();
        }

        let count = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(call);
            calls.len()
        };
        if let Some(message) = self.failure.lock().unwrap().take() {
            return Err(ServiceError::Other(message));
        }

        // Echo the pixels so later local crops can still decode them.
        Ok(Artifact::new(
            format!("{prefix}-{count}.png"),
            image.mime(),
            image.bytes().to_vec(),
        ))
    }
}

impl EditService for ScriptedService {
    fn edit(&self, image: &Artifact, instruction: &str, hotspot: Hotspot) -> Result<Artifact, ServiceError> {
        self.respond(
            format!("edit:{instruction}@{},{}", hotspot.x, hotspot.y),
            "edited",
            image,
        )
    }

    fn filter(&self, image: &Artifact, instruction: &str) -> Result<Artifact, ServiceError> {
        self.respond(format!("filter:{instruction}"), "filtered", image)
    }

    fn adjust(&self, image: &Artifact, instruction: &str) -> Result<Artifact, ServiceError> {
        self.respond(format!("adjust:{instruction}"), "adjusted", image)
    }
}

/// A small real PNG so local crops can decode it.
pub fn png(name: &str, width: u32, height: u32) -> Artifact {
    let mut img = RgbaImage::from_pixel(width, height, Rgba([20, 40, 60, 255]));
    img.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    Artifact::new(name, ImageMime::Png, bytes)
}

pub fn names(session: &retouch_ui::EditorSession) -> Vec<String> {
    session
        .history()
        .entries()
        .iter()
        .map(|e| e.artifact().name().to_string())
        .collect()
}
