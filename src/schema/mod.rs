pub mod decoder;
pub mod element_model;
pub mod error;
