//! Prompt composition for fresh generations and refinement rounds.
//!
//! Segments are rendered from `{{key}}` templates, empty segments are
//! dropped, and the rest are joined with `", "` in a fixed order.

use crate::models::{GenerationRequest, RefinementRequest};

pub const MAIN_TEXT: &str = "YouTube thumbnail with text \"{{main_text}}\"";
pub const REFERENCE_INSPIRATION: &str = "inspired by video style from {{url}}";
pub const REFINE_INSTRUCTION: &str = "Refine YouTube thumbnail: {{note}}";
pub const ORIGINAL_TEXT: &str = "Original text: \"{{main_text}}\"";
pub const QUALITY_SUFFIX: &str = "16:9 aspect ratio, high quality, professional YouTube thumbnail";

const SEPARATOR: &str = ", ";

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn join_segments(segments: Vec<Option<String>>) -> String {
    segments
        .into_iter()
        .flatten()
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Build the prompt for a fresh generation.
///
/// Never fails: an unknown style id contributes nothing.
pub fn compose(request: &GenerationRequest) -> String {
    join_segments(vec![
        Some(render(MAIN_TEXT, &[("main_text", &request.main_text)])),
        request.style().map(|preset| preset.keywords.to_string()),
        non_blank(request.context_text.as_deref()).map(str::to_string),
        request
            .reference_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .map(|url| render(REFERENCE_INSPIRATION, &[("url", url)])),
        Some(QUALITY_SUFFIX.to_string()),
    ])
}

/// Build the prompt for a refinement round. Style and reference URL from the
/// original request are not repeated.
pub fn compose_refinement(request: &RefinementRequest) -> String {
    join_segments(vec![
        Some(render(REFINE_INSTRUCTION, &[("note", &request.note)])),
        Some(render(
            ORIGINAL_TEXT,
            &[("main_text", &request.original_main_text)],
        )),
        non_blank(request.context_text.as_deref()).map(str::to_string),
        Some(QUALITY_SUFFIX.to_string()),
    ])
}
