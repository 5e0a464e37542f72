pub mod error;
pub mod forms;
pub mod identity;
pub mod state_builder;
pub mod state_model;
