//! chordbase - A front-end for the Chordbase MIDI generator.
//!
//! Collects generation parameters (tempo, key, meter, instrument, chord
//! progression, ...), validates the chord progression, and launches the
//! external generator with the matching command-line flags.
//!
//! # Usage
//!
//! ```bash
//! chordbase                          # Interactive form
//! chordbase --params song.json run   # Generate from a saved parameter file
//! chordbase --set num_measures=4 expand Am-F-C-G
//! ```
//!
//! Press `F1` in the form for keyboard shortcuts.

use chordbase::app::{App, ChordInputMode, FocusedPanel};
use chordbase::chord::{expand_progression, validate_progression};
use chordbase::generator::{
    build_command, generate, run_generator, GeneratorCommand, GeneratorConfig, GeneratorMode,
};
use chordbase::params::GenerationParameters;
use chordbase::ui;

use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

/// What the invocation should do.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Interactive terminal form.
    Form,
    /// Print the generator command as a shell line.
    Script,
    /// Build and launch the generator.
    Run,
    /// Validate the chord progression.
    Check,
    /// Print the expanded form of a compact progression.
    Expand(String),
    /// Write the parameter set to a JSON file.
    Export(PathBuf),
}

/// Command-line options for the application.
struct CliOptions {
    command: Command,
    /// Generator program selection.
    generator: GeneratorConfig,
    /// Parameter file merged over the defaults.
    params_file: Option<PathBuf>,
    /// `field=value` overrides applied after the parameter file.
    overrides: Vec<String>,
}

impl CliOptions {
    /// Parses command-line arguments.
    ///
    /// Supports:
    /// - `--script-mode`: Run the generator script through the interpreter
    /// - `--generator <path>`: Native generator executable
    /// - `--python <path>` / `--script <path>`: Interpreter and script for script mode
    /// - `--checkpoint <path>`: Model checkpoint passed to the generator
    /// - `--params <file>`: Parameter file to start from
    /// - `--set <field=value>`: Override one parameter (repeatable)
    /// - `--help` or `-h`: Print help and exit
    fn parse() -> Result<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut generator = GeneratorConfig::default();
        let mut params_file: Option<PathBuf> = None;
        let mut overrides: Vec<String> = Vec::new();
        let mut positional: Vec<String> = Vec::new();
        let mut i = 1;

        while i < args.len() {
            match args[i].as_str() {
                "--script-mode" => generator.mode = GeneratorMode::Script,
                "--generator" => generator.native_program = flag_value(&args, &mut i)?,
                "--python" => generator.interpreter = flag_value(&args, &mut i)?,
                "--script" => generator.script = flag_value(&args, &mut i)?,
                "--checkpoint" => generator.checkpoint_dir = flag_value(&args, &mut i)?,
                "--params" | "-p" => params_file = Some(PathBuf::from(flag_value(&args, &mut i)?)),
                "--set" | "-s" => overrides.push(flag_value(&args, &mut i)?),
                "--help" | "-h" => {
                    print_help(args.first().map_or("chordbase", String::as_str));
                    std::process::exit(0);
                }
                other if other.starts_with('-') && other.len() > 1 => {
                    bail!("Unknown option: {} (use --help for usage information)", other);
                }
                other => positional.push(other.to_string()),
            }
            i += 1;
        }

        let mut positional = positional.into_iter();
        let command = match positional.next().as_deref() {
            None | Some("form") => Command::Form,
            Some("script") => Command::Script,
            Some("run") => Command::Run,
            Some("check") => Command::Check,
            Some("expand") => match positional.next() {
                Some(progression) => Command::Expand(progression),
                None => bail!("expand requires a progression, e.g. expand Am-F-C-G"),
            },
            Some("export") => match positional.next() {
                Some(path) => Command::Export(PathBuf::from(path)),
                None => bail!("export requires a file path"),
            },
            Some(other) => bail!("Unknown command: {} (use --help for usage information)", other),
        };
        if let Some(extra) = positional.next() {
            bail!("Unexpected argument: {}", extra);
        }

        Ok(Self {
            command,
            generator,
            params_file,
            overrides,
        })
    }

    /// Builds the starting parameters: defaults, then the file, then overrides.
    fn load_params(&self) -> Result<GenerationParameters> {
        let mut params = match &self.params_file {
            Some(path) => GenerationParameters::load_from_file(path)
                .with_context(|| format!("Failed to load parameters from {}", path.display()))?,
            None => GenerationParameters::default(),
        };
        for assignment in &self.overrides {
            params
                .apply_override(assignment)
                .with_context(|| format!("Invalid --set {}", assignment))?;
        }
        Ok(params)
    }
}

/// Takes the value following a flag.
fn flag_value(args: &[String], i: &mut usize) -> Result<String> {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i) {
        Some(value) => Ok(value.clone()),
        None => bail!("{} requires a value", flag),
    }
}

fn print_help(program: &str) {
    eprintln!("chordbase - Chordbase MIDI generator front-end");
    eprintln!();
    eprintln!("Usage: {} [OPTIONS] [COMMAND]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  form                  Interactive parameter form (default)");
    eprintln!("  script                Print the generator command line");
    eprintln!("  run                   Run the generator");
    eprintln!("  check                 Validate the chord progression");
    eprintln!("  expand PROGRESSION    Expand one chord per measure to eighth notes");
    eprintln!("  export FILE           Write the parameters as JSON");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -p, --params FILE     Start from a parameter file (.json)");
    eprintln!("  -s, --set FIELD=VALUE Override a parameter (repeatable)");
    eprintln!("  --script-mode         Run the generator script instead of the executable");
    eprintln!("  --generator PATH      Native generator executable");
    eprintln!("  --python PATH         Interpreter for script mode");
    eprintln!("  --script PATH         Generator script for script mode");
    eprintln!("  --checkpoint PATH     Model checkpoint");
    eprintln!("  -h, --help            Print this help message");
    eprintln!();
    eprintln!("Set RUST_LOG=debug to log the generator command.");
}

/// Main entry point.
fn main() -> Result<()> {
    let cli = CliOptions::parse()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let params = cli.load_params()?;

    match &cli.command {
        Command::Form => run_form(params, cli.generator),
        Command::Script => {
            let command = build_command(&params, &cli.generator)?;
            println!("{}", command.shell_line());
            Ok(())
        }
        Command::Run => {
            println!("Generating MIDI files. Please wait...");
            let outcome = generate(&params, &cli.generator)?;
            if !outcome.stdout.trim().is_empty() {
                println!("{}", outcome.stdout.trim_end());
            }
            println!(
                "File generated successfully in the output directory: {}",
                params.output_dir
            );
            Ok(())
        }
        Command::Check => {
            validate_progression(
                &params.chord_progression,
                params.num_measures,
                params.time_signature,
            )?;
            println!(
                "Chord progression is valid ({} chords).",
                params.chords_required()
            );
            Ok(())
        }
        Command::Expand(progression) => {
            println!("{}", expand_progression(progression, params.time_signature));
            Ok(())
        }
        Command::Export(path) => {
            params
                .save_to_file(path)
                .with_context(|| format!("Failed to export parameters to {}", path.display()))?;
            println!("Exported parameters to {}", path.display());
            Ok(())
        }
    }
}

/// Runs the interactive form until the user quits.
fn run_form(params: GenerationParameters, generator: GeneratorConfig) -> Result<()> {
    let mut app = App::new(params, generator);
    let mut terminal = setup_terminal().context("Failed to setup terminal")?;

    let result = run_app(&mut terminal, &mut app);

    restore_terminal(&mut terminal).context("Failed to restore terminal")?;
    result
}

/// Sets up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main application loop.
fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.clear_expired_status();

        terminal.draw(|frame| ui::render(frame, app))?;

        if app.should_quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(command) = handle_key(app, key.code, key.modifiers) {
                    // Show the "please wait" status before blocking on the generator.
                    terminal.draw(|frame| ui::render(frame, app))?;
                    let result = run_generator(&command);
                    app.finish_generation(result);
                }
            }
        }
    }
}

/// Handles a key press.
///
/// # Returns
///
/// The generator command to launch, when the user asked to run it
fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Option<GeneratorCommand> {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && code == KeyCode::Char('c') {
        app.quit();
        return None;
    }

    // Overlays take all input while open
    if app.show_help {
        match code {
            KeyCode::F(1) | KeyCode::Esc => app.toggle_help(),
            KeyCode::Up => app.help_scroll = app.help_scroll.saturating_sub(1),
            KeyCode::Down => app.help_scroll = app.help_scroll.saturating_add(1),
            KeyCode::PageUp => app.help_scroll = app.help_scroll.saturating_sub(10),
            KeyCode::PageDown => app.help_scroll = app.help_scroll.saturating_add(10),
            _ => {}
        }
        return None;
    }

    if app.script_preview.is_some() {
        if matches!(code, KeyCode::Enter | KeyCode::Esc) {
            app.close_script_preview();
        }
        return None;
    }

    if app.export_dialog.open {
        match code {
            KeyCode::Enter => {
                app.export_dialog_confirm();
            }
            KeyCode::Esc => app.export_dialog_cancel(),
            KeyCode::Backspace => app.export_dialog_backspace(),
            KeyCode::Char(c) if !ctrl => app.export_dialog_input(c),
            _ => {}
        }
        return None;
    }

    if app.file_browser.open {
        match code {
            KeyCode::Enter => {
                app.file_browser_select();
            }
            KeyCode::Esc => app.file_browser_cancel(),
            KeyCode::Up => app.file_browser.move_up(),
            KeyCode::Down => app.file_browser.move_down(),
            _ => {}
        }
        return None;
    }

    // Global shortcuts
    if ctrl {
        match code {
            KeyCode::Char('q') => app.quit(),
            KeyCode::Char('r') => return app.prepare_generation(),
            KeyCode::Char('s') => app.create_script(),
            KeyCode::Char('e') => app.open_export_dialog(),
            KeyCode::Char('o') => app.open_file_browser(),
            KeyCode::Char('t') => app.toggle_chord_mode(),
            KeyCode::Char('u') => match app.focused_panel {
                FocusedPanel::Tool => app.tool_input.clear(),
                FocusedPanel::Chords => app.clear_chords(),
                FocusedPanel::Parameters => {}
            },
            _ => {}
        }
        return None;
    }

    if code == KeyCode::F(1) {
        app.toggle_help();
        return None;
    }

    // A typed field being edited keeps focus until committed or cancelled
    if app.field_edit.is_some() {
        match code {
            KeyCode::Enter => {
                app.commit_field_edit();
            }
            KeyCode::Esc => app.cancel_field_edit(),
            KeyCode::Backspace => app.field_edit_backspace(),
            KeyCode::Char(c) => app.field_edit_input(c),
            _ => {}
        }
        return None;
    }

    match code {
        KeyCode::Esc => {
            app.quit();
            return None;
        }
        KeyCode::Tab => {
            app.focused_panel = app.focused_panel.next();
            return None;
        }
        KeyCode::BackTab => {
            app.focused_panel = app.focused_panel.prev();
            return None;
        }
        _ => {}
    }

    match app.focused_panel {
        FocusedPanel::Parameters => handle_parameters(app, code),
        FocusedPanel::Chords => handle_chords(app, code),
        FocusedPanel::Tool => match code {
            KeyCode::Enter => app.apply_tool_output(),
            KeyCode::Backspace => app.tool_backspace(),
            KeyCode::Char(c) => app.tool_input_char(c),
            _ => {}
        },
    }
    None
}

/// Handles keys in the parameter list.
fn handle_parameters(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Up => app.select_prev_field(),
        KeyCode::Down => app.select_next_field(),
        KeyCode::Left => app.adjust_field(-1),
        KeyCode::Right => app.adjust_field(1),
        KeyCode::PageDown => app.adjust_field(-10),
        KeyCode::PageUp => app.adjust_field(10),
        KeyCode::Enter => app.begin_field_edit(),
        _ => {}
    }
}

/// Handles keys in the chord progression panel.
fn handle_chords(app: &mut App, code: KeyCode) {
    match (app.chord_mode, code) {
        (_, KeyCode::Backspace) => app.chord_backspace(),
        (_, KeyCode::Char(c)) => app.chord_input(c),
        (ChordInputMode::Cells, KeyCode::Left) => app.cells.move_cursor(-1, 0),
        (ChordInputMode::Cells, KeyCode::Right | KeyCode::Enter) => app.cells.move_cursor(1, 0),
        (ChordInputMode::Cells, KeyCode::Up) => app.cells.move_cursor(0, -1),
        (ChordInputMode::Cells, KeyCode::Down) => app.cells.move_cursor(0, 1),
        (ChordInputMode::Cells, KeyCode::Home) => {
            app.cells.slot = 0;
        }
        _ => {}
    }
}
