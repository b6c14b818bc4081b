// File: src/tui/view.rs
use crate::status::{Severity, StatusMessage};
use crate::tui::state::{Focus, HitAreas, TuiView};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, HighlightSpacing, List, ListItem, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const REMOVE_LABEL: &str = "[Remove]";
const ADD_LABEL: &str = "[ Add ]";
const HIGHLIGHT_SYMBOL: &str = "> ";

const INFO_COLOR: Color = Color::Rgb(0x7f, 0x8c, 0x8d);
const ERROR_COLOR: Color = Color::Rgb(0xe7, 0x4c, 0x3c);

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => INFO_COLOR,
        Severity::Error => ERROR_COLOR,
    }
}

/// Cuts `text` to at most `max_width` terminal columns.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    if max_width > 0 {
        out.push('…');
    }
    out
}

pub fn draw(f: &mut Frame, state: &mut TuiView) {
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let list_area = v_chunks[0];
    let input_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(ADD_LABEL.width() as u16 + 2)])
        .split(v_chunks[1]);

    // --- Task list ---
    let inner_width = list_area.width.saturating_sub(2) as usize;
    let text_width = inner_width
        .saturating_sub(HIGHLIGHT_SYMBOL.width())
        .saturating_sub(REMOVE_LABEL.width() + 1);

    let items: Vec<ListItem> = state
        .rows
        .iter()
        .map(|row| {
            let text = truncate_to_width(&row.text, text_width);
            let pad = text_width.saturating_sub(text.width()) + 1;
            ListItem::new(Line::from(vec![
                Span::raw(text),
                Span::raw(" ".repeat(pad)),
                Span::styled(REMOVE_LABEL, Style::default().fg(ERROR_COLOR)),
            ]))
        })
        .collect();

    let list_style = if state.focus == Focus::List {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Tasks ({}) ", state.rows.len()))
                .border_style(list_style),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol(HIGHLIGHT_SYMBOL)
        .highlight_spacing(HighlightSpacing::Always);

    f.render_stateful_widget(list, list_area, &mut state.list_state);

    // --- Input line ---
    let input_style = if state.focus == Focus::Input {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(state.input_buffer.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" New task ")
            .border_style(input_style),
    );
    f.render_widget(input, input_chunks[0]);

    let add_button = Paragraph::new(Span::styled(
        ADD_LABEL,
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(add_button, input_chunks[1]);

    if state.focus == Focus::Input {
        let before: String = state
            .input_buffer
            .chars()
            .take(state.cursor_position)
            .collect();
        let max_x = input_chunks[0].x + input_chunks[0].width.saturating_sub(2);
        let x = (input_chunks[0].x as usize + 1 + before.width()).min(max_x as usize) as u16;
        f.set_cursor_position((x, input_chunks[0].y + 1));
    }

    // --- Status line ---
    f.render_widget(status_paragraph(state.status.as_ref()), v_chunks[2]);

    let help = Paragraph::new(Line::from(vec![
        Span::styled(" Enter", Style::default().fg(Color::Cyan)),
        Span::raw(":Add  "),
        Span::styled("Tab", Style::default().fg(Color::Cyan)),
        Span::raw(":Focus list  "),
        Span::styled("j/k", Style::default().fg(Color::Cyan)),
        Span::raw(":Select  "),
        Span::styled("d/Del", Style::default().fg(Color::Cyan)),
        Span::raw(":Remove  "),
        Span::styled("Esc", Style::default().fg(Color::Cyan)),
        Span::raw(":Quit"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, v_chunks[3]);

    state.hit_areas = hit_areas(state, list_area, input_chunks[1]);
}

fn status_paragraph(status: Option<&StatusMessage>) -> Paragraph<'static> {
    match status {
        Some(msg) => Paragraph::new(format!(" {}", msg.text))
            .style(Style::default().fg(severity_color(msg.severity))),
        None => Paragraph::new(""),
    }
}

/// Positions of the clickable controls, based on the list offset after render.
fn hit_areas(state: &TuiView, list_area: Rect, add_area: Rect) -> HitAreas {
    let label_width = REMOVE_LABEL.width() as u16;
    let visible_rows = list_area.height.saturating_sub(2) as usize;
    let offset = state.list_state.offset();
    let x = (list_area.x + list_area.width).saturating_sub(1 + label_width);

    let remove_buttons = state
        .rows
        .iter()
        .skip(offset)
        .take(visible_rows)
        .enumerate()
        .map(|(line, row)| {
            let y = list_area.y + 1 + line as u16;
            (Rect::new(x, y, label_width, 1), row.index)
        })
        .collect();

    HitAreas {
        add_button: add_area,
        remove_buttons,
    }
}
