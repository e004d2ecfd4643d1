//! Dialog overlays for export, import and the script preview.

use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;
use std::path::Path;

use super::centered_rect;

/// Keeps the last `max_width` characters of a path, adding a "..." prefix.
#[inline]
fn truncate_path(path_str: &str, max_width: usize) -> String {
    let len = path_str.chars().count();
    if len > max_width {
        let keep = max_width.saturating_sub(3);
        let tail: String = path_str.chars().skip(len - keep).collect();
        format!("...{}", tail)
    } else {
        path_str.to_string()
    }
}

/// Extracts the display name from a path, returning "?" if extraction fails.
#[inline]
fn path_display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("?")
        .to_string()
}

/// Key hint line such as `[Enter] Save  [Esc] Cancel`.
fn hint_line(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (i, (key, action)) in hints.iter().enumerate() {
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        let sep = if i + 1 < hints.len() { "  " } else { "" };
        spans.push(Span::styled(
            format!(" {}{}", action, sep),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

/// Renders the export dialog overlay.
///
/// # Arguments
///
/// * `frame` - The frame to render to
/// * `app` - Application state
pub fn render_export_dialog(frame: &mut Frame, app: &App) {
    if !app.export_dialog.open {
        return;
    }

    let area = centered_rect(50, 25, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Export Parameters ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Label
            Constraint::Length(1), // Filename input
            Constraint::Length(1), // Spacer
            Constraint::Min(1),    // Instructions
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "Enter the filename for the export:",
            Style::default().fg(Color::White),
        )),
        chunks[0],
    );

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                app.export_dialog.filename.as_str(),
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
            Span::styled(".json", Style::default().fg(Color::DarkGray)),
        ])),
        chunks[1],
    );

    frame.render_widget(
        Paragraph::new(hint_line(&[("[Enter]", "Export"), ("[Esc]", "Cancel")])),
        chunks[3],
    );
}

/// Renders the parameter-file browser overlay.
///
/// # Arguments
///
/// * `frame` - The frame to render to
/// * `app` - Application state
pub fn render_file_browser(frame: &mut Frame, app: &App) {
    let browser = &app.file_browser;
    if !browser.open {
        return;
    }

    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Import Parameters ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Current path
            Constraint::Length(1), // Separator
            Constraint::Min(5),    // File list
            Constraint::Length(1), // Instructions
        ])
        .split(inner);

    let path_str = browser.current_dir.display().to_string();
    let max_width = chunks[0].width.saturating_sub(2) as usize;
    frame.render_widget(
        Paragraph::new(Span::styled(
            truncate_path(&path_str, max_width),
            Style::default().fg(Color::Cyan),
        )),
        chunks[0],
    );

    let visible_height = chunks[2].height as usize;
    let start_idx = browser.scroll.min(browser.entries.len());
    let end_idx = (start_idx + visible_height).min(browser.entries.len());

    let items: Vec<ListItem> = if browser.entries.is_empty() {
        vec![ListItem::new(Span::styled(
            "No .json files here",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))]
    } else {
        browser.entries[start_idx..end_idx]
            .iter()
            .enumerate()
            .map(|(i, path)| {
                let is_selected = start_idx + i == browser.selected;

                let (icon, name, style) = if path.as_path() == Path::new("..") {
                    (
                        "[..]",
                        "Parent Directory".to_string(),
                        Style::default().fg(Color::Blue),
                    )
                } else if path.is_dir() {
                    (
                        "[D]",
                        path_display_name(path),
                        Style::default().fg(Color::Blue),
                    )
                } else {
                    (
                        "[J]",
                        path_display_name(path),
                        Style::default().fg(Color::White),
                    )
                };

                let display_style = if is_selected {
                    style.add_modifier(Modifier::REVERSED)
                } else {
                    style
                };

                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", icon), Style::default().fg(Color::DarkGray)),
                    Span::styled(name, display_style),
                ]))
            })
            .collect()
    };

    frame.render_widget(List::new(items), chunks[2]);

    frame.render_widget(
        Paragraph::new(hint_line(&[
            ("[Up/Down]", "Navigate"),
            ("[Enter]", "Open"),
            ("[Esc]", "Cancel"),
        ])),
        chunks[3],
    );
}

/// Renders the generator command produced by "Create Script".
///
/// # Arguments
///
/// * `frame` - The frame to render to
/// * `app` - Application state
pub fn render_script_preview(frame: &mut Frame, app: &App) {
    let Some(script) = &app.script_preview else {
        return;
    };

    let area = centered_rect(80, 50, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" Script ({}) ", app.generator.mode.label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Command
            Constraint::Length(1), // Instructions
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(script.as_str())
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: false }),
        chunks[0],
    );

    frame.render_widget(
        Paragraph::new(hint_line(&[("[Enter/Esc]", "Close")])),
        chunks[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_path() {
        assert_eq!(truncate_path("/short", 20), "/short");
        assert_eq!(truncate_path("/home/user/midi/params", 10), ".../params");
        assert_eq!(truncate_path("/tmp/ähnlich", 6), "...ich");
    }

    #[test]
    fn test_path_display_name() {
        assert_eq!(path_display_name(Path::new("/a/b/export.json")), "export.json");
        assert_eq!(path_display_name(Path::new("/")), "?");
    }
}
