use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Persisted accessibility preferences. Every field is optional; an absent
/// field means "not configured".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_dyslexic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_color_blind: Option<ColorBlindness>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deaf: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_contrast: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduce_motion: Option<bool>,
}

/// Either a plain flag or the specific kind of colour blindness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorBlindness {
    Flag(bool),
    Kind(ColorBlindKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorBlindKind {
    Protanopia,
    Deuteranopia,
    Tritanopia,
}

impl ColorBlindKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorBlindKind::Protanopia => "protanopia",
            ColorBlindKind::Deuteranopia => "deuteranopia",
            ColorBlindKind::Tritanopia => "tritanopia",
        }
    }
}

impl FromStr for ColorBlindness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "true" => Ok(ColorBlindness::Flag(true)),
            "false" | "none" => Ok(ColorBlindness::Flag(false)),
            "protanopia" => Ok(ColorBlindness::Kind(ColorBlindKind::Protanopia)),
            "deuteranopia" => Ok(ColorBlindness::Kind(ColorBlindKind::Deuteranopia)),
            "tritanopia" => Ok(ColorBlindness::Kind(ColorBlindKind::Tritanopia)),
            other => Err(format!("unknown colour blindness '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontSize {
    #[default]
    Normal,
    Large,
    ExtraLarge,
}

impl FontSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontSize::Normal => "normal",
            FontSize::Large => "large",
            FontSize::ExtraLarge => "extra-large",
        }
    }
}

impl FromStr for FontSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(FontSize::Normal),
            "large" => Ok(FontSize::Large),
            "extra-large" => Ok(FontSize::ExtraLarge),
            other => Err(format!("unknown font size '{}'", other)),
        }
    }
}

impl UserConfig {
    /// Shallow merge: fields present in `patch` replace the current ones.
    pub fn merge(&mut self, patch: &UserConfig) {
        if patch.is_dyslexic.is_some() {
            self.is_dyslexic = patch.is_dyslexic;
        }
        if patch.is_color_blind.is_some() {
            self.is_color_blind = patch.is_color_blind;
        }
        if patch.is_deaf.is_some() {
            self.is_deaf = patch.is_deaf;
        }
        if patch.font_size.is_some() {
            self.font_size = patch.font_size;
        }
        if patch.high_contrast.is_some() {
            self.high_contrast = patch.high_contrast;
        }
        if patch.reduce_motion.is_some() {
            self.reduce_motion = patch.reduce_motion;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == UserConfig::default()
    }
}
