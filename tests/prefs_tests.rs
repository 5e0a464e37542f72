use std::sync::Arc;

use page_actions::prefs::{
    prefs_model::{ColorBlindKind, ColorBlindness, FontSize, UserConfig},
    store::{
        FilePreferenceStore, MemoryPreferenceStore, PreferenceHandle, PreferenceStore,
        load_preferences, update_preferences,
    },
    styler::AccessibilityProfile,
};

// =========================================================================
// Model
// =========================================================================

#[test]
fn merge_replaces_only_present_fields() {
    let mut config = UserConfig {
        is_dyslexic: Some(true),
        font_size: Some(FontSize::Large),
        ..Default::default()
    };

    config.merge(&UserConfig {
        font_size: Some(FontSize::ExtraLarge),
        high_contrast: Some(true),
        ..Default::default()
    });

    assert_eq!(config.is_dyslexic, Some(true));
    assert_eq!(config.font_size, Some(FontSize::ExtraLarge));
    assert_eq!(config.high_contrast, Some(true));
    assert_eq!(config.reduce_motion, None);
}

#[test]
fn stored_json_uses_camel_case_keys() {
    let config: UserConfig = serde_json::from_str(
        r#"{"isDyslexic":true,"isColorBlind":"tritanopia","fontSize":"extra-large","reduceMotion":false}"#,
    )
    .unwrap();

    assert_eq!(config.is_dyslexic, Some(true));
    assert_eq!(
        config.is_color_blind,
        Some(ColorBlindness::Kind(ColorBlindKind::Tritanopia))
    );
    assert_eq!(config.font_size, Some(FontSize::ExtraLarge));
    assert_eq!(config.reduce_motion, Some(false));
    assert_eq!(config.is_deaf, None);

    let flag: UserConfig = serde_json::from_str(r#"{"isColorBlind":true}"#).unwrap();
    assert_eq!(flag.is_color_blind, Some(ColorBlindness::Flag(true)));

    assert_eq!(serde_json::to_string(&UserConfig::default()).unwrap(), "{}");
}

#[test]
fn cli_values_parse() {
    assert_eq!(
        "deuteranopia".parse::<ColorBlindness>(),
        Ok(ColorBlindness::Kind(ColorBlindKind::Deuteranopia))
    );
    assert_eq!("false".parse::<ColorBlindness>(), Ok(ColorBlindness::Flag(false)));
    assert!("purple".parse::<ColorBlindness>().is_err());
    assert_eq!("extra-large".parse::<FontSize>(), Ok(FontSize::ExtraLarge));
    assert!("huge".parse::<FontSize>().is_err());
}

// =========================================================================
// Stores
// =========================================================================

#[test]
fn file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = FilePreferenceStore::new(dir.path().join("nested").join("prefs.json"));

    assert_eq!(store.read().unwrap(), None, "Missing file reads as absent");

    let config = UserConfig {
        high_contrast: Some(true),
        ..Default::default()
    };
    store.write(&config).unwrap();
    assert_eq!(store.read().unwrap(), Some(config));

    store.remove().unwrap();
    assert_eq!(store.read().unwrap(), None);
    store.remove().unwrap();
}

#[test]
fn corrupt_content_loads_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, "{not json").unwrap();

    let store = FilePreferenceStore::new(&path);
    assert!(store.read().is_err());
    assert_eq!(load_preferences(&store), None);

    let memory = MemoryPreferenceStore::with_raw(Some("[1,2"));
    assert_eq!(load_preferences(&memory), None);
}

#[test]
fn update_merges_over_corrupt_content() {
    let store = MemoryPreferenceStore::with_raw(Some("garbage"));

    let saved = update_preferences(
        &store,
        &UserConfig {
            reduce_motion: Some(true),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(saved.reduce_motion, Some(true));
    assert_eq!(load_preferences(&store), Some(saved));
}

// =========================================================================
// Handle
// =========================================================================

#[test]
fn handle_update_and_reset() {
    let store = Arc::new(MemoryPreferenceStore::default());
    let mut handle = PreferenceHandle::new(store.clone());
    assert_eq!(handle.config(), None);

    handle.update(&UserConfig {
        is_dyslexic: Some(true),
        ..Default::default()
    });
    let merged = handle.update(&UserConfig {
        font_size: Some(FontSize::Large),
        ..Default::default()
    });
    assert_eq!(merged.is_dyslexic, Some(true));
    assert_eq!(merged.font_size, Some(FontSize::Large));
    assert_eq!(load_preferences(store.as_ref()), Some(merged));

    handle.reset();
    let config = handle.config().unwrap();
    assert!(config.is_empty(), "Reset stores an empty object");
    assert_eq!(load_preferences(store.as_ref()), Some(UserConfig::default()));
}

#[tokio::test]
async fn handle_reloads_on_external_change() {
    let store = Arc::new(MemoryPreferenceStore::default());
    let mut handle = PreferenceHandle::new(store.clone());

    store.set_raw(Some(r#"{"highContrast":true}"#));
    assert!(handle.changed().await);
    assert_eq!(handle.config().and_then(|c| c.high_contrast), Some(true));

    store.set_raw(None);
    assert!(handle.changed().await);
    assert_eq!(handle.config(), None);
}

#[tokio::test]
async fn file_store_announces_writes() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FilePreferenceStore::new(dir.path().join("prefs.json")));
    let mut handle = PreferenceHandle::new(store.clone());

    store
        .write(&UserConfig {
            is_deaf: Some(true),
            ..Default::default()
        })
        .unwrap();

    assert!(handle.changed().await);
    assert_eq!(handle.config().and_then(|c| c.is_deaf), Some(true));
}

// =========================================================================
// Styler
// =========================================================================

#[test]
fn no_preferences_means_no_adjustments() {
    assert_eq!(AccessibilityProfile::from_config(None), AccessibilityProfile::default());
    assert_eq!(
        AccessibilityProfile::from_config(Some(&UserConfig::default())),
        AccessibilityProfile::default()
    );
}

#[test]
fn preferences_map_to_classes_and_overrides() {
    let config = UserConfig {
        is_dyslexic: Some(true),
        is_color_blind: Some(ColorBlindness::Kind(ColorBlindKind::Protanopia)),
        font_size: Some(FontSize::ExtraLarge),
        high_contrast: Some(true),
        reduce_motion: Some(true),
        ..Default::default()
    };
    let profile = AccessibilityProfile::from_config(Some(&config));

    for class in [
        "dyslexic",
        "protanopia",
        "font-size-extra-large",
        "high-contrast",
        "reduce-motion",
    ] {
        assert!(profile.has_class(class), "missing class {}", class);
    }

    let o = &profile.overrides;
    assert_eq!(o.font_size_rem, Some(1.5));
    assert_eq!(o.font_family.as_deref(), Some("Arial, sans-serif"));
    assert_eq!(o.line_height, Some(1.8));
    assert_eq!(o.background.as_deref(), Some("#000"));
    assert_eq!(o.foreground.as_deref(), Some("#fff"));
}

#[test]
fn plain_colour_blind_flag_adds_no_class() {
    let profile = AccessibilityProfile::from_config(Some(&UserConfig {
        is_color_blind: Some(ColorBlindness::Flag(true)),
        font_size: Some(FontSize::Large),
        ..Default::default()
    }));

    assert_eq!(profile.classes, vec!["font-size-large".to_string()]);
    assert_eq!(profile.overrides.font_size_rem, Some(1.2));
    assert_eq!(profile.overrides.line_height, None);
}
