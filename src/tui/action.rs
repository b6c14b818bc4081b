// What the TUI event handlers ask the main loop to do.
use crate::view::Intent;

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Dispatch(Intent),
    Quit,
}
