//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use arsip_core::StoreState;

use super::app::{App, InputMode, NotificationKind};
use crate::output::truncate_line;

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App, state: &StoreState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, app, state, chunks[0]);

    // A failed list fetch replaces the table with an error state
    match &state.last_error {
        Some(error) if error.is_fetch() => draw_fetch_error(frame, &error.message, chunks[1]),
        _ => draw_table(frame, app, state, chunks[1]),
    }

    match app.input_mode {
        InputMode::Search => draw_search_input(frame, app, state, chunks[2]),
        InputMode::Normal | InputMode::ConfirmDelete => draw_status_bar(frame, app, state, chunks[2]),
    }

    if app.input_mode == InputMode::ConfirmDelete {
        draw_confirm_delete(frame, app);
    }

    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the title line with page indicator
fn draw_header(frame: &mut Frame, app: &App, state: &StoreState, area: Rect) {
    let page = app.page(&state.records);

    let mut spans = vec![Span::styled(
        " Manajemen Arsip",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if page.total_pages > 1 {
        let prev = if page.has_prev() { "‹ " } else { "  " };
        let next = if page.has_next() { " ›" } else { "" };
        spans.push(Span::styled(
            format!("  {}page {}/{}{}", prev, page.number, page.total_pages, next),
            Style::default().add_modifier(Modifier::DIM),
        ));
    }
    if !app.view.search().is_empty() {
        spans.push(Span::styled(
            format!("  /{}", app.view.search()),
            Style::default().fg(Color::Cyan),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the record table
fn draw_table(frame: &mut Frame, app: &App, state: &StoreState, area: Rect) {
    let page = app.page(&state.records);

    let title = format!(" Arsip ({}) ", page.total_matches);
    let block = Block::default().title(title).borders(Borders::ALL);

    if page.is_empty() {
        let message = if state.is_loading {
            "Loading..."
        } else {
            "No arsip found."
        };
        let paragraph = Paragraph::new(message)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let desc_width = area.width.saturating_sub(6 + 30 + 12 + 8) as usize;

    let header = Row::new(["No.", "Nama Arsip", "Deskripsi", "Tanggal"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = page
        .items
        .iter()
        .enumerate()
        .map(|(index, record)| {
            Row::new(vec![
                Cell::from(page.row_number(index).to_string()),
                Cell::from(record.nama.clone()),
                Cell::from(truncate_line(&record.deskripsi, desc_width.max(4))),
                Cell::from(record.tanggal.to_string()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Length(30),
            Constraint::Min(10),
            Constraint::Length(11),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut table_state = TableState::default();
    table_state.select(Some(app.selected.min(page.items.len() - 1)));

    frame.render_stateful_widget(table, area, &mut table_state);
}

/// Draw the error state shown when the list could not be fetched
fn draw_fetch_error(frame: &mut Frame, message: &str, area: Rect) {
    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let text = vec![
        Line::from(Span::styled(message, Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled(
            "Press r to retry, q to quit",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, app: &App, state: &StoreState, area: Rect) {
    let line = if state.is_loading {
        Line::from(Span::styled("Loading...", Style::default().fg(Color::Yellow)))
    } else if let Some(notification) = &app.notification {
        let (icon, color) = match notification.kind {
            NotificationKind::Success => ("✓", Color::Green),
            NotificationKind::Failure => ("✗", Color::Red),
        };
        Line::from(Span::styled(
            format!("{} {}", icon, notification.message),
            Style::default().fg(color),
        ))
    } else {
        Line::from(Span::styled(
            "a:add  e:edit  d:del  /:search  h/l:page  r:refresh  ?:help  q:quit",
            Style::default().add_modifier(Modifier::DIM),
        ))
    };

    frame.render_widget(Paragraph::new(line), area);
}

/// Draw search input at the bottom
fn draw_search_input(frame: &mut Frame, app: &App, state: &StoreState, area: Rect) {
    let prefix = "/";
    let matches = app.page(&state.records).total_matches;

    let line = Line::from(vec![
        Span::styled(prefix, Style::default().fg(Color::Cyan)),
        Span::raw(app.search_input.as_str()),
        Span::styled(
            format!("  ({} matches)", matches),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);

    // Position cursor
    let cursor_x = area.x + prefix.len() as u16 + app.search_cursor as u16;
    frame.set_cursor_position((cursor_x, area.y));
}

/// Centered popup area
fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Draw the delete confirmation dialog
fn draw_confirm_delete(frame: &mut Frame, app: &App) {
    let Some(record) = &app.pending_delete else {
        return;
    };

    let area = popup_area(frame.area(), 60, 7);
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(format!("Delete \"{}\"?", record.nama)),
        Line::from("This cannot be undone."),
        Line::from(""),
        Line::from(Span::styled(
            "y: delete   n/Esc: cancel",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Confirm Delete ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let area = popup_area(frame.area(), 46, 19);
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  j/k, ↑/↓    Move up/down"),
        Line::from("  g/G         First/last row"),
        Line::from("  h/l, ←/→    Previous/next page"),
        Line::from(""),
        Line::from("Commands:"),
        Line::from("  a           Add arsip"),
        Line::from("  e           Edit selected arsip"),
        Line::from("  d           Delete selected arsip"),
        Line::from("  /           Search name or description"),
        Line::from("  r           Refresh from server"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}
