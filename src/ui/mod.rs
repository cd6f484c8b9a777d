pub mod components;
pub mod state;
pub mod style;
pub mod view;
