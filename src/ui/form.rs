//! Parameter list, title bar and status bar.

use crate::app::{App, Field, StatusKind};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

/// Width reserved for parameter labels.
const LABEL_WIDTH: usize = 29;

/// Renders the title bar with the generator mode.
pub fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled(
            " Chordbase MIDI Generator ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  generator: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.generator.mode.label(), Style::default().fg(Color::White)),
        Span::styled("  F1", Style::default().fg(Color::Yellow)),
        Span::styled(" help", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Renders the parameter list panel.
///
/// # Arguments
///
/// * `frame` - The frame to render to
/// * `area` - The area to render in
/// * `app` - Application state
/// * `focused` - Whether this panel is focused
pub fn render_parameters(frame: &mut Frame, area: Rect, app: &App, focused: bool) {
    let block = Block::default()
        .title(" Parameters ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::Gray }));

    let items: Vec<ListItem> = Field::ALL
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let selected = i == app.selected_field;
            let editing = selected && app.field_edit.is_some();

            let value_spans = match (&app.field_edit, editing) {
                (Some(buffer), true) => vec![
                    Span::styled(
                        buffer.clone(),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        "_",
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::RAPID_BLINK),
                    ),
                ],
                _ if field.is_typed() => vec![Span::styled(
                    field.value(&app.params),
                    Style::default().fg(Color::White),
                )],
                _ => vec![
                    Span::styled("< ", Style::default().fg(Color::DarkGray)),
                    Span::styled(field.value(&app.params), Style::default().fg(Color::Green)),
                    Span::styled(" >", Style::default().fg(Color::DarkGray)),
                ],
            };

            let label_style = if selected && focused {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };

            let mut spans = vec![Span::styled(
                format!("{:width$}", field.label(), width = LABEL_WIDTH),
                label_style,
            )];
            spans.extend(value_spans);
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(block).highlight_symbol("> ");
    let mut state = ListState::default();
    if focused {
        state.select(Some(app.selected_field));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Renders the status bar, or key hints when there is no message.
pub fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let line = if let Some((kind, msg, _)) = &app.status_message {
        let color = match kind {
            StatusKind::Info => Color::Yellow,
            StatusKind::Success => Color::Green,
            StatusKind::Error => Color::Red,
        };
        Line::from(Span::styled(
            msg.as_str(),
            Style::default().fg(color).add_modifier(Modifier::ITALIC),
        ))
    } else {
        let key = Style::default().fg(Color::Yellow);
        let desc = Style::default().fg(Color::DarkGray);
        Line::from(vec![
            Span::styled("^R", key),
            Span::styled(" Run  ", desc),
            Span::styled("^S", key),
            Span::styled(" Script  ", desc),
            Span::styled("^E", key),
            Span::styled(" Export  ", desc),
            Span::styled("^O", key),
            Span::styled(" Import  ", desc),
            Span::styled("^T", key),
            Span::styled(" Chord input  ", desc),
            Span::styled("Esc", key),
            Span::styled(" Quit", desc),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);
}
