// Built-in filter, adjustment and quick-retouch presets.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub prompt: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdjustmentPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub prompt: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickAction {
    pub id: &'static str,
    pub label: &'static str,
    pub prompt: &'static str,
}

pub static FILTERS: [FilterPreset; 8] = [
    FilterPreset { id: "vintage", name: "Vintage", prompt: "apply a warm vintage film look with sepia tones" },
    FilterPreset { id: "cinematic", name: "Cinematic", prompt: "apply a cinematic blue and orange color grading" },
    FilterPreset { id: "bw", name: "B&W", prompt: "convert to black and white with high contrast" },
    FilterPreset { id: "neon", name: "Neon", prompt: "apply a cyberpunk neon glow effect with vibrant colors" },
    FilterPreset { id: "soft", name: "Soft Focus", prompt: "apply a soft dreamy filter with gentle lighting" },
    FilterPreset { id: "dramatic", name: "Dramatic", prompt: "enhance drama with deep shadows and rich colors" },
    FilterPreset { id: "pastel", name: "Pastel", prompt: "apply soft pastel colors with light airy feeling" },
    FilterPreset { id: "noir", name: "Film Noir", prompt: "apply classic film noir style with dramatic lighting" },
];

pub static ADJUSTMENTS: [AdjustmentPreset; 6] = [
    AdjustmentPreset { id: "brightness", name: "Brightness", description: "Make it brighter", prompt: "increase the brightness of the image" },
    AdjustmentPreset { id: "contrast", name: "Contrast", description: "Enhance contrast", prompt: "increase the contrast to make the image more dramatic" },
    AdjustmentPreset { id: "saturation", name: "Saturation", description: "More vivid colors", prompt: "increase the saturation to make colors more vivid" },
    AdjustmentPreset { id: "warmth", name: "Warmth", description: "Warmer tone", prompt: "make the image warmer with more yellow and orange tones" },
    AdjustmentPreset { id: "exposure", name: "Exposure", description: "Fix exposure", prompt: "correct the exposure for better lighting" },
    AdjustmentPreset { id: "shadows", name: "Shadows", description: "Lift shadows", prompt: "brighten the shadow areas while preserving highlights" },
];

pub static QUICK_ACTIONS: [QuickAction; 4] = [
    QuickAction { id: "background", label: "Remove background", prompt: "remove the background completely" },
    QuickAction { id: "eyes", label: "Enhance eyes", prompt: "enhance and brighten the eyes" },
    QuickAction { id: "skin", label: "Smooth skin", prompt: "smooth and enhance the skin texture" },
    QuickAction { id: "teeth", label: "Whiten teeth", prompt: "whiten and brighten the teeth" },
];

pub fn find_filter(id: &str) -> Option<&'static FilterPreset> {
    FILTERS.iter().find(|p| p.id.eq_ignore_ascii_case(id))
}

pub fn find_adjustment(id: &str) -> Option<&'static AdjustmentPreset> {
    ADJUSTMENTS.iter().find(|p| p.id.eq_ignore_ascii_case(id))
}

/// Look a quick action up by id or by its button label.
pub fn find_quick_action(name: &str) -> Option<&'static QuickAction> {
    QUICK_ACTIONS
        .iter()
        .find(|a| a.id.eq_ignore_ascii_case(name) || a.label.eq_ignore_ascii_case(name))
}
