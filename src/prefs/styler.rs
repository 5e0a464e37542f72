use serde::Serialize;

use crate::prefs::prefs_model::{ColorBlindness, FontSize, UserConfig};

/// How the preferences translate into presentation: classes for the
/// interface root plus inline overrides for the actions list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccessibilityProfile {
    pub classes: Vec<String>,
    pub overrides: StyleOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StyleOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size_rem: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
}

impl AccessibilityProfile {
    pub fn from_config(config: Option<&UserConfig>) -> Self {
        let Some(config) = config else {
            return Self::default();
        };

        let mut classes = Vec::new();
        let mut overrides = StyleOverrides::default();

        if config.is_dyslexic == Some(true) {
            classes.push("dyslexic".to_string());
            overrides.font_family = Some("Arial, sans-serif".to_string());
            overrides.line_height = Some(1.8);
        }

        // A bare flag has no filter to apply
        if let Some(ColorBlindness::Kind(kind)) = config.is_color_blind {
            classes.push(kind.as_str().to_string());
        }

        match config.font_size {
            Some(FontSize::Large) => {
                classes.push("font-size-large".to_string());
                overrides.font_size_rem = Some(1.2);
            }
            Some(FontSize::ExtraLarge) => {
                classes.push("font-size-extra-large".to_string());
                overrides.font_size_rem = Some(1.5);
            }
            Some(FontSize::Normal) | None => {}
        }

        if config.high_contrast == Some(true) {
            classes.push("high-contrast".to_string());
            overrides.background = Some("#000".to_string());
            overrides.foreground = Some("#fff".to_string());
        }

        if config.reduce_motion == Some(true) {
            classes.push("reduce-motion".to_string());
        }

        Self { classes, overrides }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}
