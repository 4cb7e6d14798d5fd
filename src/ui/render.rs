//! Terminal rendering

use ratatui::{prelude::*, widgets::*};

use super::{
    input::{App, InputMode},
    view::ChainView,
};
use crate::{services::format_clock, state::StageStatus};

pub fn draw(f: &mut Frame, app: &App, view: &ChainView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Stages and gauges
            Constraint::Length(4), // Controls and status
        ])
        .split(f.size());

    let header = Paragraph::new(Span::styled(
        "Chain Timers",
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    draw_stages(f, app, view, body[0]);
    draw_gauges(f, view, body[1]);
    draw_footer(f, app, view, chunks[2]);
}

fn status_color(status: StageStatus) -> Color {
    match status {
        StageStatus::Done => Color::Red,
        StageStatus::Active => Color::Green,
        StageStatus::Pending => Color::Blue,
    }
}

fn draw_stages(f: &mut Frame, app: &App, view: &ChainView, area: Rect) {
    let items: Vec<ListItem> = view
        .rows
        .iter()
        .map(|row| {
            let marker = if row.status == StageStatus::Active && view.is_running {
                "▶ "
            } else {
                "  "
            };
            ListItem::new(Line::from(vec![
                Span::raw(marker),
                Span::raw(format!("{:>2}. ", row.index + 1)),
                Span::styled(
                    format!("{:<20}", row.title),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" {:>6}s  ", row.duration)),
                Span::styled(
                    row.clock.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]))
            .style(Style::default().fg(status_color(row.status)))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Timers ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut list_state = ListState::default();
    if !view.rows.is_empty() {
        list_state.select(Some(app.selected));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_gauges(f: &mut Frame, view: &ChainView, area: Rect) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let current = Gauge::default()
        .block(
            Block::default()
                .title(" Current Timer ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .label(format!("{}s", view.current_remaining_seconds))
        .ratio(view.current_ratio());
    f.render_widget(current, sections[0]);

    let total = Gauge::default()
        .block(
            Block::default()
                .title(" Total Timers ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .label(format!(
            "{}s ({})",
            view.total_remaining_seconds,
            format_clock(view.total_remaining_seconds)
        ))
        .ratio(view.total_ratio());
    f.render_widget(total, sections[1]);
}

fn draw_footer(f: &mut Frame, app: &App, view: &ChainView, area: Rect) {
    let key = |k: &'static str| {
        Span::styled(
            k,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    };

    let controls = Line::from(vec![
        key("A"),
        Span::raw(" Add  "),
        key("D"),
        Span::raw(" Remove  "),
        key("E"),
        Span::raw(" Title  "),
        key("T"),
        Span::raw(" Duration  "),
        key("S"),
        Span::raw(" Start here  "),
        key("Space"),
        Span::raw(if view.is_running { " Pause  " } else { " Start  " }),
        key("R"),
        Span::raw(" Reset  "),
        key("Q"),
        Span::raw(" Quit"),
    ]);

    let second = match &app.mode {
        InputMode::EditTitle { buffer, .. } => Line::from(format!(
            "Title: {}▏ (Enter to save, Esc to cancel)",
            buffer
        )),
        InputMode::EditDuration { buffer, .. } => Line::from(format!(
            "Duration (90, 1:30, 1m30s): {}▏ (Enter to save, Esc to cancel)",
            buffer
        )),
        InputMode::Normal => match &app.status {
            Some(message) => Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            )),
            None if view.is_complete() => Line::from(Span::styled(
                "Chain complete",
                Style::default().fg(Color::Green),
            )),
            None => {
                let state = if view.is_running { "Running" } else { "Paused" };
                let text = match &app.last_action {
                    Some(last) => format!("{}  ·  last: {}", state, last),
                    None => state.to_string(),
                };
                Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
            }
        },
    };

    let footer = Paragraph::new(vec![controls, second]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(footer, area);
}
