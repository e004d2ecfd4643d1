//! Terminal user interface components.
//!
//! The form is laid out as a title bar, the parameter list on the left, the
//! chord progression and progression tool on the right, and a status bar.
//! Dialogs and the help overlay are drawn on top.

mod chords;
mod dialogs;
mod form;
mod help;

use crate::app::{App, FocusedPanel};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

pub use chords::{render_chords, render_tool};
pub use dialogs::{render_export_dialog, render_file_browser, render_script_preview};
pub use form::{render_parameters, render_status, render_title};
pub use help::render_help;

/// Renders the complete form and any open overlays.
pub fn render(frame: &mut Frame, app: &App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(10),   // Content
            Constraint::Length(1), // Status
        ])
        .split(frame.area());

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(56), // Parameters
            Constraint::Min(40),    // Chords and tool
        ])
        .split(main_chunks[1]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // Chord progression
            Constraint::Length(6), // Progression tool
        ])
        .split(content_chunks[1]);

    render_title(frame, main_chunks[0], app);
    render_parameters(
        frame,
        content_chunks[0],
        app,
        app.focused_panel == FocusedPanel::Parameters,
    );
    render_chords(
        frame,
        right_chunks[0],
        app,
        app.focused_panel == FocusedPanel::Chords,
    );
    render_tool(
        frame,
        right_chunks[1],
        app,
        app.focused_panel == FocusedPanel::Tool,
    );
    render_status(frame, main_chunks[2], app);

    render_script_preview(frame, app);
    render_export_dialog(frame, app);
    render_file_browser(frame, app);

    if app.show_help {
        render_help(frame, app.help_scroll);
    }
}

/// Helper function to center a rectangle within another rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorConfig;
    use crate::params::GenerationParameters;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_form_shows_parameters_and_placeholder() {
        let app = App::new(GenerationParameters::default(), GeneratorConfig::default());
        let text = screen_text(&app);
        assert!(text.contains("Chordbase MIDI Generator"));
        assert!(text.contains("Number of Measures"));
        assert!(text.contains("acoustic_piano"));
        assert!(text.contains("Please complete the chord progression."));
        assert!(text.contains("Am-Am-Am"));
    }

    #[test]
    fn test_cells_mode_reports_missing_first_chord() {
        let mut app = App::new(GenerationParameters::default(), GeneratorConfig::default());
        app.toggle_chord_mode();
        let text = screen_text(&app);
        assert!(text.contains("Chord Cells (8 measures x 8)"));
        assert!(text.contains("Chord 1 is required."));
    }

    #[test]
    fn test_overlays_render() {
        let mut app = App::new(GenerationParameters::default(), GeneratorConfig::default());
        app.open_export_dialog();
        assert!(screen_text(&app).contains("Export Parameters"));

        app.export_dialog.open = false;
        app.script_preview = Some("./chordbase-test --bpm 120".to_string());
        assert!(screen_text(&app).contains("./chordbase-test --bpm 120"));

        app.script_preview = None;
        app.toggle_help();
        assert!(screen_text(&app).contains("Keyboard Shortcuts"));
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(50, 50, area);
        assert_eq!(popup.width, 50);
        assert_eq!(popup.height, 25);
        assert_eq!(popup.x, 25);
    }
}
