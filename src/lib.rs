pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod gesture;
pub mod grid;
pub mod hit;
pub mod navigation;
pub mod script;
pub mod ui;
