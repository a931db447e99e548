//! TUI views and rendering
//!
//! Draws the App; never modifies it.

use daytypes::{Goal, Mood, Plan, Priority};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap};
use tracing::trace;

use super::app::{App, Focus};
use crate::health::HealthStatus;

mod colors {
    use ratatui::style::Color;

    pub const CONNECTED: Color = Color::Rgb(50, 205, 50); // Lime green
    pub const CHECKING: Color = Color::Rgb(255, 215, 0); // Gold
    pub const FAILED: Color = Color::Rgb(220, 20, 60); // Crimson
    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255);
    pub const SELECTED_BG: Color = Color::Rgb(40, 40, 40);
    pub const DIM: Color = Color::DarkGray;
}

pub const PLAN_COLUMNS: [&str; 6] = ["TIME", "ACTIVITY", "DESCRIPTION", "DURATION", "PRIORITY", "DONE"];

fn health_color(status: HealthStatus) -> Color {
    match status {
        HealthStatus::Connected => colors::CONNECTED,
        HealthStatus::Checking => colors::CHECKING,
        HealthStatus::Error => colors::FAILED,
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => colors::FAILED,
        Priority::Medium => colors::CHECKING,
        Priority::Low => colors::CONNECTED,
    }
}

/// Cell text for each plan item, in display order
pub fn plan_rows(plan: &Plan) -> Vec<[String; 6]> {
    plan.iter()
        .map(|item| {
            [
                item.time.clone(),
                item.activity.clone(),
                item.description.clone(),
                item.duration_label(),
                item.priority.label().to_string(),
                if item.completed { "[x]" } else { "[ ]" }.to_string(),
            ]
        })
        .collect()
}

pub fn render(app: &App, frame: &mut Frame) {
    trace!(?app.focus, "render: called");
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form + plan
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(app, frame, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(0)])
        .split(chunks[1]);

    render_form(app, frame, body[0]);
    render_plan_table(app, frame, body[1]);
    render_footer(app, frame, chunks[2]);

    if app.show_help {
        render_help_overlay(frame, frame.area());
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let state = app.state();
    let status = state.health;

    let mut spans = vec![
        Span::raw(" "),
        Span::styled("●", Style::default().fg(health_color(status))),
        Span::styled(" DayPlan", Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD)),
        Span::raw(" │ "),
        Span::styled(status.label(), Style::default().fg(health_color(status))),
    ];
    if let Some(checked) = state.last_health_check {
        spans.push(Span::styled(
            format!(" (checked {})", checked.format("%H:%M:%S")),
            Style::default().fg(colors::DIM),
        ));
    }
    if status == HealthStatus::Error
        && let Some(message) = &state.health_message
    {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(message.clone(), Style::default().fg(colors::FAILED)));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors::HEADER)),
    );
    frame.render_widget(header, area);
}

fn focused_block(title: &str, focused: bool) -> Block<'_> {
    let color = if focused { colors::HEADER } else { colors::DIM };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(color))
}

fn cursor_style(focused: bool, at_cursor: bool) -> Style {
    if focused && at_cursor {
        Style::default().bg(colors::SELECTED_BG).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn render_form(app: &App, frame: &mut Frame, area: Rect) {
    let state = app.state();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(Mood::ALL.len() as u16 + 2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let mood_focused = app.focus == Focus::Mood;
    let moods: Vec<Line> = Mood::ALL
        .iter()
        .enumerate()
        .map(|(i, mood)| {
            let marker = if state.mood == Some(*mood) { "(•)" } else { "( )" };
            Line::styled(format!(" {} {}", marker, mood), cursor_style(mood_focused, i == app.mood_cursor))
        })
        .collect();
    frame.render_widget(Paragraph::new(moods).block(focused_block(" Mood ", mood_focused)), chunks[0]);

    let energy = format!(
        " {}{} {}/5",
        "■".repeat(state.energy as usize),
        "□".repeat(5usize.saturating_sub(state.energy as usize)),
        state.energy
    );
    frame.render_widget(
        Paragraph::new(energy).block(focused_block(" Energy ", app.focus == Focus::Energy)),
        chunks[1],
    );

    frame.render_widget(
        Paragraph::new(format!(" {} hours", state.available_time))
            .block(focused_block(" Available time ", app.focus == Focus::Time)),
        chunks[2],
    );

    let goals_focused = app.focus == Focus::Goals;
    let goals: Vec<Line> = Goal::ALL
        .iter()
        .enumerate()
        .map(|(i, goal)| {
            let marker = if state.goals.contains(goal) { "[x]" } else { "[ ]" };
            Line::styled(format!(" {} {}", marker, goal), cursor_style(goals_focused, i == app.goal_cursor))
        })
        .collect();
    frame.render_widget(Paragraph::new(goals).block(focused_block(" Goals ", goals_focused)), chunks[3]);
}

fn render_plan_table(app: &App, frame: &mut Frame, area: Rect) {
    let state = app.state();
    let focused = app.focus == Focus::Plan;

    let Some(plan) = state.plan.as_ref() else {
        let message = if state.loading {
            "Generating plan..."
        } else {
            "No plan yet. Pick a mood and goals, then press g."
        };
        frame.render_widget(focused_block(" Plan ", focused), area);
        render_empty_message(frame, area, message);
        return;
    };

    let title = format!(
        " Plan ({}/{} done, {} min) ",
        plan.completed_count(),
        plan.len(),
        plan.total_minutes()
    );

    let rows: Vec<Row> = plan_rows(plan)
        .into_iter()
        .zip(plan.iter())
        .enumerate()
        .map(|(i, (cells, item))| {
            let mut style = cursor_style(focused, i == app.plan_cursor);
            if item.completed {
                style = style.fg(colors::DIM).add_modifier(Modifier::CROSSED_OUT);
            }
            let [time, activity, description, duration, priority, done] = cells;
            Row::new(vec![
                Span::raw(time),
                Span::raw(activity),
                Span::raw(description),
                Span::raw(duration),
                Span::styled(priority, Style::default().fg(priority_color(item.priority))),
                Span::raw(done),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(6),  // TIME
        Constraint::Min(16),    // ACTIVITY
        Constraint::Min(20),    // DESCRIPTION
        Constraint::Length(9),  // DURATION
        Constraint::Length(8),  // PRIORITY
        Constraint::Length(5),  // DONE
    ];

    let table = Table::new(rows, widths)
        .header(Row::new(PLAN_COLUMNS.to_vec()).style(Style::default().add_modifier(Modifier::BOLD).fg(colors::HEADER)))
        .block(focused_block(&title, focused));

    frame.render_widget(table, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let state = app.state();
    let content = if let Some(error) = &state.error {
        Line::from(Span::styled(format!(" Error: {}", error), Style::default().fg(colors::FAILED)))
    } else if state.loading {
        Line::from(Span::styled(" Generating plan...", Style::default().fg(colors::CHECKING)))
    } else {
        let keybinds = [
            ("[Tab]", "Next panel"),
            ("[↑↓]", "Move"),
            ("[←→]", "Adjust"),
            ("[Enter]", "Select"),
            ("[g]", "Generate"),
            ("[?]", "Help"),
            ("[q]", "Quit"),
        ];
        let mut spans = vec![Span::raw(" ")];
        for (key, desc) in keybinds {
            spans.push(Span::styled(key, Style::default().fg(colors::KEYBIND)));
            spans.push(Span::raw(format!(" {}  ", desc)));
        }
        Line::from(spans)
    };

    let footer = Paragraph::new(content).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                .fg(colors::HEADER),
        )),
        Line::from(""),
        key_line("Tab/S-Tab", "Move between panels"),
        key_line("j/↓ k/↑", "Move cursor (or adjust energy/time)"),
        key_line("h/← l/→", "Adjust energy and available time"),
        key_line("Enter/Space", "Select mood, toggle goal, toggle task done"),
        key_line("g", "Generate a plan"),
        key_line("?", "Toggle help"),
        key_line("q/Esc", "Quit"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help (any key to close) ")
                .style(Style::default().bg(Color::Black)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help, popup_area);
}

fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<14}", key), Style::default().fg(colors::KEYBIND)),
        Span::raw(desc),
    ])
}

fn render_empty_message(frame: &mut Frame, area: Rect, message: &str) {
    let inner = area.inner(ratatui::layout::Margin {
        horizontal: 2,
        vertical: 2,
    });

    let empty = Paragraph::new(message)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(ratatui::layout::Alignment::Center);

    frame.render_widget(empty, inner);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
