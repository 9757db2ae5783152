//! Data models and structures
//!
//! Defines the user-facing request types and the fixed table of style
//! presets that bias the visual tone of generated thumbnails.

use crate::{mime, Error, Result};

/// A named keyword phrase injected verbatim into generation prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylePreset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub keywords: &'static str,
}

pub static STYLE_PRESETS: [StylePreset; 4] = [
    StylePreset {
        id: "bold",
        name: "Bold & Dramatic",
        description: "High contrast, impactful visuals with strong typography",
        keywords: "bold dramatic high contrast cinematic lighting intense colors impactful",
    },
    StylePreset {
        id: "minimal",
        name: "Minimal & Clean",
        description: "Simple, elegant design with plenty of white space",
        keywords: "minimal clean simple elegant white space modern sophisticated",
    },
    StylePreset {
        id: "energetic",
        name: "Energetic & Fun",
        description: "Vibrant colors, dynamic elements, playful composition",
        keywords: "energetic fun vibrant colorful dynamic playful exciting pop",
    },
    StylePreset {
        id: "professional",
        name: "Professional & Trust",
        description: "Credible, authoritative look with refined aesthetics",
        keywords: "professional trustworthy credible authoritative refined corporate",
    },
];

/// Look up a preset by id. Unknown ids yield `None`.
pub fn find_style(id: &str) -> Option<&'static StylePreset> {
    STYLE_PRESETS.iter().find(|preset| preset.id == id)
}

/// Everything the user supplies for a fresh generation.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub main_text: String,
    pub style_id: Option<String>,
    pub context_text: Option<String>,
    pub reference_url: Option<String>,
    /// Accepted and validated, but never sent to the provider.
    pub reference_image: Option<Vec<u8>>,
}

impl GenerationRequest {
    pub fn new(main_text: impl Into<String>) -> Self {
        Self {
            main_text: main_text.into(),
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style_id: impl Into<String>) -> Self {
        self.style_id = Some(style_id.into());
        self
    }

    pub fn with_context(mut self, context_text: impl Into<String>) -> Self {
        self.context_text = Some(context_text.into());
        self
    }

    pub fn with_reference_url(mut self, reference_url: impl Into<String>) -> Self {
        self.reference_url = Some(reference_url.into());
        self
    }

    pub fn with_reference_image(mut self, image: Vec<u8>) -> Self {
        self.reference_image = Some(image);
        self
    }

    /// Resolved style preset, ignoring unknown ids.
    pub fn style(&self) -> Option<&'static StylePreset> {
        self.style_id.as_deref().and_then(find_style)
    }

    pub fn validate(&self) -> Result<()> {
        if self.main_text.trim().is_empty() {
            return Err(Error::Validation("Main text is required".to_string()));
        }

        if let Some(image) = &self.reference_image {
            let mime = mime::validate_reference_image(image)?;
            tracing::debug!(
                "Reference image accepted ({}, {} bytes); it is not sent to the provider",
                mime,
                image.len()
            );
        }

        Ok(())
    }
}

/// A follow-up round against a previously generated request.
#[derive(Debug, Clone)]
pub struct RefinementRequest {
    pub note: String,
    pub original_main_text: String,
    pub context_text: Option<String>,
}

impl RefinementRequest {
    pub fn from_original(note: impl Into<String>, original: &GenerationRequest) -> Self {
        Self {
            note: note.into(),
            original_main_text: original.main_text.clone(),
            context_text: original.context_text.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.note.trim().is_empty() {
            return Err(Error::Validation(
                "Refinement instructions are required".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_style_known_and_unknown() {
        assert_eq!(find_style("bold").unwrap().name, "Bold & Dramatic");
        assert!(find_style("vaporwave").is_none());
    }

    #[test]
    fn test_style_ids_unique() {
        for (i, a) in STYLE_PRESETS.iter().enumerate() {
            for b in &STYLE_PRESETS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_validate_rejects_blank_main_text() {
        let err = GenerationRequest::new("   ").validate().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_non_image_reference() {
        let request = GenerationRequest::new("Top 10 tips").with_reference_image(b"GIF89a".to_vec());
        assert!(matches!(request.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_refinement_copies_original_context() {
        let original = GenerationRequest::new("Rust in 100 seconds")
            .with_style("bold")
            .with_context("dark background");
        let refinement = RefinementRequest::from_original("make the text bigger", &original);

        assert_eq!(refinement.original_main_text, "Rust in 100 seconds");
        assert_eq!(refinement.context_text.as_deref(), Some("dark background"));
        assert!(refinement.validate().is_ok());
    }

    #[test]
    fn test_refinement_rejects_blank_note() {
        let original = GenerationRequest::new("Rust in 100 seconds");
        let refinement = RefinementRequest::from_original(" ", &original);
        assert!(matches!(refinement.validate(), Err(Error::Validation(_))));
    }
}
