// src/display/mod.rs
//! Output front-ends for decoded GPS data

pub mod json;
pub mod terminal;

pub use json::JsonDisplay;
pub use terminal::TerminalDisplay;
