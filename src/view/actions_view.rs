use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::{
    dispatch::{
        dispatcher::{DispatchOutcome, Dispatcher, PendingDispatch, SharedState},
        error::DispatchError,
    },
    prefs::{prefs_model::UserConfig, styler::AccessibilityProfile},
    ranking::rank::rank,
    schema::{
        decoder::{decode_json, decode_payload},
        element_model::{CollectionEntry, ElementCollection, ElementKind},
        error::DecodeError,
    },
    state::{
        error::StateError, identity::field_identity, state_builder::seed_state,
        state_model::InteractionState,
    },
};

/// Banner shown when the inbound payload cannot be decoded.
pub const DECODE_ERROR_BANNER: &str = "Error parsing the action data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    /// No element description was supplied.
    NoActions,
    /// The supplied description could not be decoded.
    Failed { banner: String },
    Ready,
}

struct LoadedCollection {
    collection: ElementCollection,
    state: SharedState,
}

/// The display component that owns a collection and its interaction state.
///
/// Loading a new payload replaces the state; responses still in flight for
/// the old one are dropped when they arrive.
pub struct ActionsView {
    dispatcher: Dispatcher,
    loaded: Option<LoadedCollection>,
    banner: Option<String>,
    profile: AccessibilityProfile,
}

impl ActionsView {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            loaded: None,
            banner: None,
            profile: AccessibilityProfile::default(),
        }
    }

    // ---- Loading ----

    /// Load the value of the `actions` query parameter, if any.
    ///
    /// An empty or blank value counts as no value.
    pub fn load(&mut self, encoded: Option<&str>) -> Result<(), DecodeError> {
        match non_blank(encoded) {
            None => {
                self.clear();
                Ok(())
            }
            Some(encoded) => {
                let decoded = decode_payload(encoded);
                self.apply_decoded(decoded)
            }
        }
    }

    /// Load an element description that is already plain JSON.
    pub fn load_json(&mut self, json: Option<&str>) -> Result<(), DecodeError> {
        match non_blank(json) {
            None => {
                self.clear();
                Ok(())
            }
            Some(json) => {
                let decoded = decode_json(json);
                self.apply_decoded(decoded)
            }
        }
    }

    pub fn load_collection(&mut self, collection: ElementCollection) {
        let state = {
            let rendered = rank(&collection);
            seed_state(&rendered)
        };

        info!(
            elements = collection.len(),
            shape = ?collection.shape,
            "loaded element collection"
        );

        self.banner = None;
        self.loaded = Some(LoadedCollection {
            collection,
            state: Arc::new(Mutex::new(state)),
        });
    }

    fn apply_decoded(
        &mut self,
        decoded: Result<ElementCollection, DecodeError>,
    ) -> Result<(), DecodeError> {
        match decoded {
            Ok(collection) => {
                self.load_collection(collection);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "could not decode element description");
                self.loaded = None;
                self.banner = Some(DECODE_ERROR_BANNER.to_string());
                Err(e)
            }
        }
    }

    fn clear(&mut self) {
        self.loaded = None;
        self.banner = None;
    }

    // ---- Inspection ----

    pub fn status(&self) -> ViewStatus {
        match (&self.banner, &self.loaded) {
            (Some(banner), _) => ViewStatus::Failed {
                banner: banner.clone(),
            },
            (None, Some(_)) => ViewStatus::Ready,
            (None, None) => ViewStatus::NoActions,
        }
    }

    pub fn collection(&self) -> Option<&ElementCollection> {
        self.loaded.as_ref().map(|l| &l.collection)
    }

    /// Entries in display order.
    pub fn rendered(&self) -> Vec<&CollectionEntry> {
        self.collection().map(rank).unwrap_or_default()
    }

    /// Snapshot of the current interaction state.
    pub fn state(&self) -> Option<InteractionState> {
        self.loaded.as_ref().map(|l| l.state.lock().clone())
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn profile(&self) -> &AccessibilityProfile {
        &self.profile
    }

    pub fn set_preferences(&mut self, config: Option<&UserConfig>) {
        self.profile = AccessibilityProfile::from_config(config);
    }

    // ---- User edits ----

    fn entry(&self, identity: &str) -> Result<(&CollectionEntry, &SharedState), StateError> {
        let loaded = self
            .loaded
            .as_ref()
            .ok_or_else(|| StateError::UnknownElement(identity.to_string()))?;
        let entry = loaded
            .collection
            .get(identity)
            .ok_or_else(|| StateError::UnknownElement(identity.to_string()))?;
        Ok((entry, &loaded.state))
    }

    pub fn set_input_value(&self, identity: &str, value: &str) -> Result<(), StateError> {
        let (entry, state) = self.entry(identity)?;
        match &entry.element.kind {
            ElementKind::Input { .. } => {
                state.lock().set_input_value(identity, value);
                Ok(())
            }
            _ => Err(wrong_kind(entry, "input")),
        }
    }

    pub fn set_select_value(&self, identity: &str, value: &str) -> Result<(), StateError> {
        let (entry, state) = self.entry(identity)?;
        match &entry.element.kind {
            ElementKind::Select { options } => {
                if !options.iter().any(|o| o == value) {
                    return Err(StateError::InvalidOption {
                        identity: identity.to_string(),
                        value: value.to_string(),
                    });
                }
                state.lock().set_select_value(identity, value);
                Ok(())
            }
            _ => Err(wrong_kind(entry, "select")),
        }
    }

    pub fn set_field_value(&self, identity: &str, field: &str, value: &str) -> Result<(), StateError> {
        let (entry, state) = self.entry(identity)?;
        match &entry.element.kind {
            ElementKind::Form { inputs, .. } => {
                let declared = (0..inputs.len()).any(|i| field_identity(entry.index, i) == field);
                if !declared {
                    return Err(StateError::UnknownField {
                        identity: identity.to_string(),
                        field: field.to_string(),
                    });
                }
                state.lock().set_field_value(identity, field, value);
                Ok(())
            }
            _ => Err(wrong_kind(entry, "form")),
        }
    }

    /// Flip a form open or closed; returns the new state.
    pub fn toggle_form(&self, identity: &str) -> Result<bool, StateError> {
        let (entry, state) = self.entry(identity)?;
        if !entry.element.is_form() {
            return Err(wrong_kind(entry, "form"));
        }
        Ok(state.lock().toggle_form(identity))
    }

    // ---- Dispatch ----

    /// Trigger the element's action and wait for it to finish.
    pub async fn trigger(&self, identity: &str) -> Result<DispatchOutcome, DispatchError> {
        let loaded = self.loaded.as_ref().ok_or(DispatchError::NoCollection)?;
        self.dispatcher
            .dispatch(&loaded.collection, &loaded.state, identity)
            .await
    }

    /// Mark the element pending and hand back the request, for callers that
    /// drive the executor themselves.
    pub fn begin(&self, identity: &str) -> Result<Option<PendingDispatch>, DispatchError> {
        let loaded = self.loaded.as_ref().ok_or(DispatchError::NoCollection)?;
        self.dispatcher.begin(&loaded.collection, &loaded.state, identity)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn wrong_kind(entry: &CollectionEntry, expected: &'static str) -> StateError {
    StateError::WrongKind {
        identity: entry.identity.clone(),
        expected,
        actual: entry.element.kind_name(),
    }
}
