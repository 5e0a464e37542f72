pub mod actions_view;
pub mod console;
pub mod view_model;
