// File: ./src/tui/state.rs
// Terminal-side state. `TuiView` is what the list manager renders into.
use crate::status::StatusMessage;
use crate::view::{ListView, Row};
use ratatui::layout::{Position, Rect};
use ratatui::widgets::ListState;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Focus {
    Input,
    List,
}

/// Screen regions recorded during the last draw, used for mouse hit-testing.
#[derive(Debug, Default, Clone)]
pub struct HitAreas {
    pub add_button: Rect,
    /// Remove control of each visible row, with the row index it is bound to.
    pub remove_buttons: Vec<(Rect, usize)>,
}

pub struct TuiView {
    pub rows: Vec<Row>,
    pub status: Option<StatusMessage>,
    pub list_state: ListState,
    pub focus: Focus,

    // Input Buffer
    pub input_buffer: String,
    pub cursor_position: usize,

    pub hit_areas: HitAreas,
}

impl Default for TuiView {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiView {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            status: None,
            list_state: ListState::default(),
            focus: Focus::Input,
            input_buffer: String::new(),
            cursor_position: 0,
            hit_areas: HitAreas::default(),
        }
    }

    pub fn move_cursor_left(&mut self) {
        let cursor_moved_left = self.cursor_position.saturating_sub(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_left);
    }
    pub fn move_cursor_right(&mut self) {
        let cursor_moved_right = self.cursor_position.saturating_add(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_right);
    }
    pub fn enter_char(&mut self, new_char: char) {
        // Safe insertion for UTF-8 strings
        let byte_index = self
            .input_buffer
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor_position)
            .unwrap_or(self.input_buffer.len());

        self.input_buffer.insert(byte_index, new_char);
        self.move_cursor_right();
    }
    pub fn delete_char(&mut self) {
        if self.cursor_position != 0 {
            let current_index = self.cursor_position;
            let before = self.input_buffer.chars().take(current_index - 1);
            let after = self.input_buffer.chars().skip(current_index);
            self.input_buffer = before.chain(after).collect();
            self.move_cursor_left();
        }
    }
    pub fn reset_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }
    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.clamp(0, self.input_buffer.chars().count())
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::List,
            Focus::List => Focus::Input,
        };
        if self.focus == Focus::List && self.list_state.selected().is_none() && !self.rows.is_empty()
        {
            self.list_state.select(Some(0));
        }
    }

    pub fn next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= self.rows.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.rows.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Render-time index of the selected row.
    pub fn selected_index(&self) -> Option<usize> {
        let i = self.list_state.selected()?;
        self.rows.get(i).map(|r| r.index)
    }

    pub fn hit_add_button(&self, column: u16, row: u16) -> bool {
        self.hit_areas.add_button.contains(Position::new(column, row))
    }

    pub fn hit_remove_button(&self, column: u16, row: u16) -> Option<usize> {
        self.hit_areas
            .remove_buttons
            .iter()
            .find(|(area, _)| area.contains(Position::new(column, row)))
            .map(|(_, index)| *index)
    }
}

impl ListView for TuiView {
    fn render_list(&mut self, rows: &[Row]) {
        self.rows = rows.to_vec();
        let selected = match self.list_state.selected() {
            _ if self.rows.is_empty() => None,
            Some(i) => Some(i.min(self.rows.len() - 1)),
            None => None,
        };
        self.list_state.select(selected);
        if self.rows.is_empty() {
            self.focus = Focus::Input;
        }
    }

    fn render_status(&mut self, status: Option<&StatusMessage>) {
        self.status = status.cloned();
    }

    fn clear_input(&mut self) {
        self.reset_input();
    }

    fn focus_input(&mut self) {
        self.focus = Focus::Input;
    }
}
