//! Help overlay rendering.
//!
//! Displays keyboard shortcuts in a modal overlay.

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect;

/// Key binding entry for the help display.
struct KeyBinding {
    key: &'static str,
    description: &'static str,
}

const GENERAL_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "F1",
        description: "Toggle this help",
    },
    KeyBinding {
        key: "Esc / Ctrl+Q",
        description: "Quit",
    },
    KeyBinding {
        key: "Ctrl+C",
        description: "Force quit",
    },
    KeyBinding {
        key: "Tab / Shift+Tab",
        description: "Cycle focus between panels",
    },
];

const PARAMETER_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "Up / Down",
        description: "Select parameter",
    },
    KeyBinding {
        key: "Left / Right",
        description: "Previous / next option, or -1 / +1",
    },
    KeyBinding {
        key: "PgUp / PgDn",
        description: "Step numbers by 10",
    },
    KeyBinding {
        key: "Enter",
        description: "Edit typed value / next option",
    },
    KeyBinding {
        key: "Esc",
        description: "Cancel edit",
    },
];

const CHORD_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "Ctrl+T",
        description: "Toggle text / cell input",
    },
    KeyBinding {
        key: "Arrows",
        description: "Move between cells (cell input)",
    },
    KeyBinding {
        key: "Backspace",
        description: "Delete last character",
    },
    KeyBinding {
        key: "Ctrl+U",
        description: "Clear progression",
    },
    KeyBinding {
        key: "Enter",
        description: "Progression tool: use expanded result",
    },
];

const ACTION_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "Ctrl+R",
        description: "Run the generator",
    },
    KeyBinding {
        key: "Ctrl+S",
        description: "Create script (show command)",
    },
    KeyBinding {
        key: "Ctrl+E",
        description: "Export parameters (.json)",
    },
    KeyBinding {
        key: "Ctrl+O",
        description: "Import parameters (.json)",
    },
];

/// Renders the help overlay.
///
/// # Arguments
///
/// * `frame` - The frame to render to
/// * `scroll` - Vertical scroll offset
pub fn render_help(frame: &mut Frame, scroll: u16) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help - Keyboard Shortcuts ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Scrollable content
            Constraint::Length(1), // Fixed footer
        ])
        .split(inner);

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(Color::White);

    let sections: [(&'static str, &[KeyBinding]); 4] = [
        ("General", GENERAL_BINDINGS),
        ("Parameters", PARAMETER_BINDINGS),
        ("Chords", CHORD_BINDINGS),
        ("Actions", ACTION_BINDINGS),
    ];

    let mut lines: Vec<Line<'static>> = Vec::new();
    for (title, bindings) in sections {
        lines.push(Line::from(Span::styled(title, section_style)));
        for binding in bindings {
            lines.push(Line::from(vec![
                Span::styled(format!("{:17}", binding.key), key_style),
                Span::styled(binding.description, desc_style),
            ]));
        }
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), chunks[0]);

    let footer = Paragraph::new(Line::from(Span::styled(
        "Scroll: Up/Down  |  Close: F1/Esc",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )));
    frame.render_widget(footer, chunks[1]);
}
