// Capabilities a front end provides to the list manager, and the intents it
// sends back.
use crate::status::StatusMessage;

/// One rendered task. `index` is the position the row's remove control is
/// bound to; it is only valid until the next render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Submit control or Enter in the input field, carrying the raw input.
    Submit(String),
    /// Remove control of the row rendered at this index.
    Remove(usize),
}

pub trait ListView {
    /// Replaces every visible row.
    fn render_list(&mut self, rows: &[Row]);
    /// `None` blanks the status line.
    fn render_status(&mut self, status: Option<&StatusMessage>);
    fn clear_input(&mut self);
    fn focus_input(&mut self);
}
