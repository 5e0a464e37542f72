mod common;

use common::{click, form, storefront};
use serde_json::json;

use page_actions::ranking::rank::rank;
use page_actions::schema::decoder::decode_json;
use page_actions::state::{
    forms::{AUTO_EXPAND_IMPORTANCE, should_auto_expand},
    identity::{element_identity, field_identity},
    state_builder::seed_state,
    state_model::{ElementPhase, InteractionState},
};

fn seeded(payload: serde_json::Value) -> InteractionState {
    let collection = decode_json(&payload.to_string()).unwrap();
    seed_state(&rank(&collection))
}

// =========================================================================
// Identities
// =========================================================================

#[test]
fn identities_prefer_declared_ids() {
    assert_eq!(element_identity(Some("buy"), 3), "buy");
    assert_eq!(element_identity(None, 3), "element-3");
    assert_eq!(element_identity(Some(""), 4), "element-4");
    assert_eq!(field_identity(2, 0), "input-2-0");
}

// =========================================================================
// Seeding
// =========================================================================

#[test]
fn seeding_sets_defaults_for_every_element() {
    let state = seeded(storefront());

    assert_eq!(state.select_value("size"), "S", "Select seeds its first option");
    assert_eq!(state.input_values.get("coupon").map(String::as_str), Some(""));
    let fields = state.field_values("signup").unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields.get("input-3-0").map(String::as_str), Some(""));
    assert_eq!(fields.get("input-3-1").map(String::as_str), Some(""));
    assert!(state.action_results.is_empty());
    assert!(state.pending.is_empty());
}

#[test]
fn first_rendered_form_starts_open_even_when_unimportant() {
    let state = seeded(json!({ "elements": [form(Some("f"), 3.0)] }));
    assert!(state.is_form_open("f"));
}

#[test]
fn important_form_starts_open_anywhere() {
    let state = seeded(json!({
        "elements": [click(Some("a"), "A", 20.0), click(Some("b"), "B", 10.0), form(Some("f"), 9.0)]
    }));
    assert!(state.is_form_open("f"));
}

#[test]
fn unimportant_form_further_down_starts_closed() {
    let state = seeded(json!({
        "elements": [click(Some("a"), "A", 20.0), click(Some("b"), "B", 10.0), form(Some("f"), 5.0)]
    }));
    assert_eq!(state.open_forms.get("f"), Some(&false));
}

#[test]
fn auto_expand_uses_rendered_position_not_payload_position() {
    // Payload position 1, but ranked first
    let state = seeded(json!({
        "elements": [click(Some("a"), "A", 1.0), form(Some("f"), 4.0)]
    }));
    assert!(state.is_form_open("f"));
}

#[test]
fn auto_expand_threshold() {
    assert!(should_auto_expand(AUTO_EXPAND_IMPORTANCE, 5));
    assert!(!should_auto_expand(7.9, 5));
    assert!(should_auto_expand(0.0, 0));
}

// =========================================================================
// Store operations
// =========================================================================

#[test]
fn upserts_are_keyed_by_identity() {
    let mut state = InteractionState::default();
    state.set_input_value("coupon", "SAVE10");
    state.set_select_value("size", "L");
    state.set_input_value("coupon", "SAVE20");

    assert_eq!(state.input_value("coupon"), "SAVE20");
    assert_eq!(state.select_value("size"), "L");
    assert_eq!(state.input_value("missing"), "");
}

#[test]
fn phases_follow_busy_and_result() {
    let mut state = InteractionState::default();
    assert_eq!(state.phase("a"), ElementPhase::Idle);

    state.mark_busy("a");
    assert_eq!(state.phase("a"), ElementPhase::Pending);
    assert!(state.any_busy());

    state.set_result("a", "Done");
    state.clear_busy("a");
    assert_eq!(state.phase("a"), ElementPhase::IdleWithResult);

    state.set_error("a", "Error: nope");
    assert_eq!(state.phase("a"), ElementPhase::IdleWithError);
    assert_eq!(state.result("a"), Some("Error: nope"));

    state.set_result("a", "Done again");
    assert_eq!(state.phase("a"), ElementPhase::IdleWithResult);

    state.clear_result("a");
    assert_eq!(state.phase("a"), ElementPhase::Idle);
    assert!(!state.any_busy());
}

// =========================================================================
// Form sub-state
// =========================================================================

#[test]
fn toggle_form_flips_open_flag() {
    let mut state = InteractionState::default();
    assert!(state.toggle_form("f"), "Unknown form toggles open");
    assert!(!state.toggle_form("f"));
    assert!(!state.is_form_open("f"));
}

#[test]
fn field_values_are_upserted_per_form() {
    let mut state = InteractionState::default();
    state.set_field_value("f", "input-0-0", "a@b.c");
    state.set_field_value("f", "input-0-1", "nick");
    state.set_field_value("f", "input-0-0", "x@y.z");
    state.set_field_value("g", "input-1-0", "other");

    assert_eq!(state.field_value("f", "input-0-0"), "x@y.z");
    assert_eq!(state.field_value("f", "input-0-1"), "nick");
    assert_eq!(state.field_value("g", "input-1-0"), "other");
    assert_eq!(state.field_value("g", "input-1-9"), "");
}

#[test]
fn submission_outcome_collapses_only_on_success() {
    let mut state = InteractionState::default();
    state.open_forms.insert("f".into(), true);

    state.apply_submission_outcome("f", false);
    assert!(state.is_form_open("f"), "Failure leaves the form open");

    state.apply_submission_outcome("f", true);
    assert!(!state.is_form_open("f"), "Success collapses the form");
}
