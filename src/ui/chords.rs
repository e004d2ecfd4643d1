//! Chord progression panel and the progression tool.
//!
//! The chord panel shows either the free-text progression with a live
//! validity line, or the per-measure cell grid with any measure errors.

use crate::app::{App, ChordInputMode};
use crate::chord::MeasureError;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

/// Width of one chord cell in the grid, brackets included.
const CELL_WIDTH: usize = 8;

fn panel_block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::Gray }))
}

fn cursor_span() -> Span<'static> {
    Span::styled(
        "_",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::RAPID_BLINK),
    )
}

/// Renders the chord progression panel.
///
/// # Arguments
///
/// * `frame` - The frame to render to
/// * `area` - The area to render in
/// * `app` - Application state
/// * `focused` - Whether this panel is focused
pub fn render_chords(frame: &mut Frame, area: Rect, app: &App, focused: bool) {
    let required = app.params.chords_required();
    let title = match app.chord_mode {
        ChordInputMode::Text => format!(" Chord Progression ({} chords) ", required),
        ChordInputMode::Cells => format!(
            " Chord Cells ({} measures x {}) ",
            app.params.num_measures,
            app.cells_per_measure()
        ),
    };
    let block = panel_block(title, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match app.chord_mode {
        ChordInputMode::Text => render_text_mode(frame, inner, app, focused),
        ChordInputMode::Cells => render_cell_mode(frame, inner, app, focused),
    }
}

fn render_text_mode(frame: &mut Frame, area: Rect, app: &App, focused: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Progression text
            Constraint::Length(1), // Validity
        ])
        .split(area);

    let mut spans = vec![Span::styled(
        app.params.chord_progression.as_str(),
        Style::default().fg(Color::White),
    )];
    if focused {
        spans.push(cursor_span());
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).wrap(Wrap { trim: false }),
        chunks[0],
    );

    let status = match app.progression_check() {
        Ok(()) => Span::styled("Valid progression", Style::default().fg(Color::Green)),
        Err(e) => Span::styled(e.to_string(), Style::default().fg(Color::Red)),
    };
    frame.render_widget(Paragraph::new(Line::from(status)), chunks[1]);
}

fn render_cell_mode(frame: &mut Frame, area: Rect, app: &App, focused: bool) {
    let errors: Vec<(usize, MeasureError)> = app.assembled_cells().err().unwrap_or_default();
    let grid = &app.cells;

    let mut lines: Vec<Line> = Vec::new();
    for (m, cells) in grid.measures.iter().enumerate() {
        let measure_error = errors.iter().find(|(index, _)| *index == m + 1);
        let label_color = if measure_error.is_some() {
            Color::Red
        } else {
            Color::DarkGray
        };

        let mut spans = vec![Span::styled(
            format!("{:>3} ", m + 1),
            Style::default().fg(label_color),
        )];
        for (s, cell) in cells.iter().enumerate() {
            let is_cursor = focused && m == grid.measure && s == grid.slot;
            let text = if cell.is_empty() { "." } else { cell.as_str() };
            let mut style = if cell.is_empty() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            if is_cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(
                format!("{:^width$}", text, width = CELL_WIDTH - 1),
                style,
            ));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));

        if let Some((_, error)) = measure_error {
            for message in error.to_string().lines() {
                lines.push(Line::from(Span::styled(
                    format!("    {}", message),
                    Style::default().fg(Color::Red),
                )));
            }
        }
    }

    // Keep the cursor row on screen.
    let error_rows = |m: usize| {
        errors
            .iter()
            .find(|(index, _)| *index == m + 1)
            .map_or(0, |(_, e)| e.to_string().lines().count())
    };
    let cursor_row = (0..grid.measure).map(|m| 1 + error_rows(m)).sum::<usize>() as u16;
    let scroll = cursor_row.saturating_sub(area.height.saturating_sub(1));

    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), area);
}

/// Renders the progression tool, which expands one chord per measure.
pub fn render_tool(frame: &mut Frame, area: Rect, app: &App, focused: bool) {
    let block = panel_block(
        format!(" Progression Tool ({}) ", app.params.time_signature),
        focused,
    );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Input
            Constraint::Min(1),    // Expanded output
        ])
        .split(inner);

    let mut input = vec![Span::styled("Chords: ", Style::default().fg(Color::DarkGray))];
    if app.tool_input.is_empty() && !focused {
        input.push(Span::styled(
            crate::chord::EXAMPLE_PROGRESSION,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
    } else {
        input.push(Span::styled(
            app.tool_input.as_str(),
            Style::default().fg(Color::White),
        ));
        if focused {
            input.push(cursor_span());
        }
    }
    frame.render_widget(Paragraph::new(Line::from(input)), chunks[0]);

    let output = if app.tool_input.is_empty() {
        Span::styled(
            app.tool_placeholder(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::styled(app.tool_output(), Style::default().fg(Color::Green))
    };
    frame.render_widget(
        Paragraph::new(Line::from(output)).wrap(Wrap { trim: false }),
        chunks[1],
    );
}
