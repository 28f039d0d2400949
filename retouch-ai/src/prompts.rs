// Prompt text sent to the image model alongside the source image.
// Each builder returns the full instruction block for one operation.

use retouch_core::Hotspot;

const SAFETY_POLICY: &str = "Safety & Ethics Policy:\n\
- You MUST fulfil requests to adjust skin tone, e.g. 'give me a tan' or 'make my skin darker'. These are standard photo enhancements.\n\
- You MUST REFUSE any request to change a person's fundamental race or ethnicity.";

const OUTPUT_RULE: &str = "Output: Return ONLY the final edited image. Do not return text.";

/// Localized edit around a single pixel.
pub fn localized_edit(instruction: &str, hotspot: Hotspot) -> String {
    format!(
        "You are an expert photo editor AI. Perform a natural, localized edit on the provided image.\n\
User request: \"{instruction}\"\n\
Edit location: focus on the area around pixel coordinates (x: {x}, y: {y}).\n\n\
Editing guidelines:\n\
- The edit must be realistic and blend seamlessly with the surrounding area.\n\
- The rest of the image, outside the immediate edit area, must remain identical to the original.\n\n\
{SAFETY_POLICY}\n\n\
{OUTPUT_RULE}",
        instruction = instruction.trim(),
        x = hotspot.x,
        y = hotspot.y,
    )
}

/// Stylistic filter over the whole image.
pub fn filter(instruction: &str) -> String {
    format!(
        "You are an expert photo editor AI. Apply a stylistic filter to the entire image.\n\
Filter request: \"{instruction}\"\n\n\
Editing guidelines:\n\
- Change the colour palette, texture or overall mood only.\n\
- Do not change the composition or the content of the image.\n\n\
{SAFETY_POLICY}\n\n\
{OUTPUT_RULE}",
        instruction = instruction.trim(),
    )
}

/// Global photographic adjustment.
pub fn adjustment(instruction: &str) -> String {
    format!(
        "You are an expert photo editor AI. Perform a natural, global adjustment to the entire image.\n\
User request: \"{instruction}\"\n\n\
Editing guidelines:\n\
- The adjustment must be applied across the whole image.\n\
- The result must be photorealistic.\n\n\
{SAFETY_POLICY}\n\n\
{OUTPUT_RULE}",
        instruction = instruction.trim(),
    )
}
