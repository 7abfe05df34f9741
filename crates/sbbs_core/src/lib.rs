pub mod core_api;
pub mod handedness;
pub mod layout;
pub mod reader;
pub mod rom;
pub mod sbbs;
