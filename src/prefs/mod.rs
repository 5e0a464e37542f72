pub mod error;
pub mod prefs_model;
pub mod store;
pub mod styler;
