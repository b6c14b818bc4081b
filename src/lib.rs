// Crate root library declaration and module exports.
pub mod cli;
pub mod config;
pub mod context;
pub mod controller;
pub mod gateway;
pub mod logging;
pub mod status;
pub mod store;
pub mod timer;
pub mod view;

#[cfg(feature = "tui")]
pub mod tui;
