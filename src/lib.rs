// Public library interface for rowmap-rs
// The CLI and the debug-layout tool both drive these modules

pub mod app;
pub mod config;
pub mod data;
pub mod layout;
pub mod render;
