// File: src/tui/handlers.rs
// Translates keyboard and mouse input into actions for the main loop.
use crate::tui::action::Action;
use crate::tui::state::{Focus, TuiView};
use crate::view::Intent;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

pub fn handle_key_event(key: KeyEvent, state: &mut TuiView) -> Option<Action> {
    if key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    {
        return Some(Action::Quit);
    }

    // Prevent out-of-bounds panics if cursor drift happened
    let char_count = state.input_buffer.chars().count();
    if state.cursor_position > char_count {
        state.cursor_position = char_count;
    }

    match state.focus {
        Focus::Input => match key.code {
            KeyCode::Enter => Some(Action::Dispatch(Intent::Submit(state.input_buffer.clone()))),
            KeyCode::Tab => {
                state.toggle_focus();
                None
            }
            KeyCode::Char(c) => {
                state.enter_char(c);
                None
            }
            KeyCode::Backspace => {
                state.delete_char();
                None
            }
            KeyCode::Left => {
                state.move_cursor_left();
                None
            }
            KeyCode::Right => {
                state.move_cursor_right();
                None
            }
            KeyCode::Home => {
                state.cursor_position = 0;
                None
            }
            KeyCode::End => {
                state.cursor_position = char_count;
                None
            }
            KeyCode::Down => {
                state.toggle_focus();
                None
            }
            _ => None,
        },
        Focus::List => match key.code {
            KeyCode::Tab | KeyCode::Char('i') | KeyCode::Char('a') => {
                state.toggle_focus();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                state.next();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                state.previous();
                None
            }
            KeyCode::Delete | KeyCode::Char('d') => state
                .selected_index()
                .map(|index| Action::Dispatch(Intent::Remove(index))),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        },
    }
}

pub fn handle_mouse_event(mouse: MouseEvent, state: &mut TuiView) -> Option<Action> {
    match mouse.kind {
        MouseEventKind::ScrollDown => {
            state.next();
            None
        }
        MouseEventKind::ScrollUp => {
            state.previous();
            None
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if state.hit_add_button(mouse.column, mouse.row) {
                return Some(Action::Dispatch(Intent::Submit(state.input_buffer.clone())));
            }
            state
                .hit_remove_button(mouse.column, mouse.row)
                .map(|index| Action::Dispatch(Intent::Remove(index)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{ListView, Row};
    use crossterm::event::KeyEventKind;
    use ratatui::layout::Rect;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn two_rows() -> TuiView {
        let mut state = TuiView::new();
        state.render_list(&[
            Row {
                index: 0,
                text: "a".to_string(),
            },
            Row {
                index: 1,
                text: "b".to_string(),
            },
        ]);
        state
    }

    #[test]
    fn test_typing_then_enter_submits_raw_input() {
        let mut state = TuiView::new();
        for c in " milk ".chars() {
            assert_eq!(handle_key_event(key(KeyCode::Char(c)), &mut state), None);
        }
        assert_eq!(
            handle_key_event(key(KeyCode::Enter), &mut state),
            Some(Action::Dispatch(Intent::Submit(" milk ".to_string())))
        );
        // The buffer is cleared by the manager, not by the key handler.
        assert_eq!(state.input_buffer, " milk ");
    }

    #[test]
    fn test_delete_in_list_focus_removes_selected() {
        let mut state = two_rows();
        handle_key_event(key(KeyCode::Tab), &mut state);
        handle_key_event(key(KeyCode::Char('j')), &mut state);
        assert_eq!(
            handle_key_event(key(KeyCode::Char('d')), &mut state),
            Some(Action::Dispatch(Intent::Remove(1)))
        );
    }

    #[test]
    fn test_letters_in_input_focus_are_text() {
        let mut state = two_rows();
        assert_eq!(handle_key_event(key(KeyCode::Char('d')), &mut state), None);
        assert_eq!(handle_key_event(key(KeyCode::Char('q')), &mut state), None);
        assert_eq!(state.input_buffer, "dq");
    }

    #[test]
    fn test_quit_keys() {
        let mut state = TuiView::new();
        assert_eq!(handle_key_event(key(KeyCode::Esc), &mut state), Some(Action::Quit));
        let ctrl_c = KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        };
        assert_eq!(handle_key_event(ctrl_c, &mut state), Some(Action::Quit));
    }

    #[test]
    fn test_mouse_clicks_on_controls() {
        let mut state = two_rows();
        state.input_buffer = "Walk dog".to_string();
        state.hit_areas.add_button = Rect::new(30, 10, 9, 3);
        state.hit_areas.remove_buttons =
            vec![(Rect::new(31, 1, 8, 1), 0), (Rect::new(31, 2, 8, 1), 1)];

        assert_eq!(
            handle_mouse_event(click(33, 11), &mut state),
            Some(Action::Dispatch(Intent::Submit("Walk dog".to_string())))
        );
        assert_eq!(
            handle_mouse_event(click(35, 2), &mut state),
            Some(Action::Dispatch(Intent::Remove(1)))
        );
        assert_eq!(handle_mouse_event(click(2, 2), &mut state), None);
    }
}
