//! Application state and event handling.
//!
//! This module holds the parameter form shown by the terminal front-end:
//! the generation parameters being edited, the chord progression input in
//! either of its two modes, the progression tool, and the import/export
//! dialogs. Rendering lives in [`crate::ui`]; key dispatch lives in `main`.

use crate::chord::{
    assemble_from_cells, expand_progression, validate_progression, MeasureError,
    ProgressionError, EXAMPLE_PROGRESSION,
};
use crate::generator::{
    build_command, GenerationOutcome, GeneratorCommand, GeneratorConfig, GeneratorError,
};
use crate::params::{Choice, GenerationParameters, BPM_RANGE, MEASURE_CHOICES, VELOCITY_RANGE};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// How long informational status messages stay visible.
const STATUS_DURATION: Duration = Duration::from_secs(3);

/// Errors stay up longer so there is time to read them.
const ERROR_STATUS_DURATION: Duration = Duration::from_secs(8);

/// File name offered by the export dialog.
pub const DEFAULT_EXPORT_NAME: &str = "export";

/// Number of file browser rows kept visible when scrolling.
const BROWSER_VISIBLE_ROWS: usize = 10;

/// Which panel receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPanel {
    /// Parameter list on the left.
    #[default]
    Parameters,
    /// Chord progression entry.
    Chords,
    /// Compact progression expander.
    Tool,
}

impl FocusedPanel {
    pub fn next(self) -> Self {
        match self {
            FocusedPanel::Parameters => FocusedPanel::Chords,
            FocusedPanel::Chords => FocusedPanel::Tool,
            FocusedPanel::Tool => FocusedPanel::Parameters,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FocusedPanel::Parameters => FocusedPanel::Tool,
            FocusedPanel::Chords => FocusedPanel::Parameters,
            FocusedPanel::Tool => FocusedPanel::Chords,
        }
    }
}

/// How the chord progression is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChordInputMode {
    /// One free-text progression, one chord per eighth note.
    #[default]
    Text,
    /// A grid of chord cells per measure; empty cells hold the previous chord.
    Cells,
}

/// Editable rows of the parameter list, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    OutputDir,
    NumMeasures,
    Bpm,
    AudioKey,
    TimeSignature,
    PitchRange,
    Instrument,
    Genre,
    TrackRole,
    Rhythm,
    MinVelocity,
    MaxVelocity,
    NumGenerate,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::OutputDir,
        Field::NumMeasures,
        Field::Bpm,
        Field::AudioKey,
        Field::TimeSignature,
        Field::PitchRange,
        Field::Instrument,
        Field::Genre,
        Field::TrackRole,
        Field::Rhythm,
        Field::MinVelocity,
        Field::MaxVelocity,
        Field::NumGenerate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::OutputDir => "Output Directory",
            Field::NumMeasures => "Number of Measures",
            Field::Bpm => "BPM (Beats Per Minute)",
            Field::AudioKey => "Audio Key",
            Field::TimeSignature => "Time Signature",
            Field::PitchRange => "Pitch Range",
            Field::Instrument => "Instrument",
            Field::Genre => "Genre",
            Field::TrackRole => "Track Role",
            Field::Rhythm => "Rhythm",
            Field::MinVelocity => "Minimum Velocity",
            Field::MaxVelocity => "Maximum Velocity",
            Field::NumGenerate => "Number of Files to Generate",
        }
    }

    /// Whether the field is edited by typing rather than by cycling.
    pub fn is_typed(&self) -> bool {
        matches!(
            self,
            Field::OutputDir
                | Field::Bpm
                | Field::MinVelocity
                | Field::MaxVelocity
                | Field::NumGenerate
        )
    }

    /// Current value of this field in `params`, as displayed.
    pub fn value(&self, params: &GenerationParameters) -> String {
        match self {
            Field::OutputDir => params.output_dir.clone(),
            Field::NumMeasures => params.num_measures.to_string(),
            Field::Bpm => params.bpm.to_string(),
            Field::AudioKey => params.audio_key.to_string(),
            Field::TimeSignature => params.time_signature.to_string(),
            Field::PitchRange => params.pitch_range.to_string(),
            Field::Instrument => params.inst.to_string(),
            Field::Genre => params.genre.to_string(),
            Field::TrackRole => params.track_role.to_string(),
            Field::Rhythm => params.rhythm.to_string(),
            Field::MinVelocity => params.min_velocity.to_string(),
            Field::MaxVelocity => params.max_velocity.to_string(),
            Field::NumGenerate => params.num_generate.to_string(),
        }
    }
}

/// Colour class of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// State for the export dialog.
#[derive(Debug, Clone, Default)]
pub struct ExportDialogState {
    /// Whether the dialog is open.
    pub open: bool,
    /// The filename being edited (without extension).
    pub filename: String,
}

/// State for the parameter-file browser.
#[derive(Debug, Clone)]
pub struct FileBrowserState {
    /// Whether the browser is open.
    pub open: bool,
    /// Current directory path.
    pub current_dir: PathBuf,
    /// Parent marker, subdirectories, then `.json` files.
    pub entries: Vec<PathBuf>,
    /// Currently selected index.
    pub selected: usize,
    /// Scroll offset for long lists.
    pub scroll: usize,
}

impl Default for FileBrowserState {
    fn default() -> Self {
        Self {
            open: false,
            current_dir: std::env::current_dir().unwrap_or_default(),
            entries: Vec::new(),
            selected: 0,
            scroll: 0,
        }
    }
}

impl FileBrowserState {
    /// Re-reads the current directory.
    pub fn refresh(&mut self) {
        self.entries.clear();

        if self.current_dir.parent().is_some() {
            self.entries.push(PathBuf::from(".."));
        }

        if let Ok(entries) = std::fs::read_dir(&self.current_dir) {
            let mut dirs: Vec<PathBuf> = Vec::new();
            let mut files: Vec<PathBuf> = Vec::new();

            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    dirs.push(path);
                } else if path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
                {
                    files.push(path);
                }
            }

            dirs.sort();
            files.sort();

            self.entries.extend(dirs);
            self.entries.extend(files);
        }

        if self.selected >= self.entries.len() {
            self.selected = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.scroll {
                self.scroll = self.selected;
            }
        }
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
            if self.selected >= self.scroll + BROWSER_VISIBLE_ROWS {
                self.scroll = self.selected + 1 - BROWSER_VISIBLE_ROWS;
            }
        }
    }

    /// Enters the selected directory, or returns the selected file.
    pub fn select(&mut self) -> Option<PathBuf> {
        let selected_path = self.entries.get(self.selected)?.clone();

        if selected_path == PathBuf::from("..") {
            if let Some(parent) = self.current_dir.parent() {
                self.current_dir = parent.to_path_buf();
                self.selected = 0;
                self.scroll = 0;
                self.refresh();
            }
            None
        } else if selected_path.is_dir() {
            self.current_dir = selected_path;
            self.selected = 0;
            self.scroll = 0;
            self.refresh();
            None
        } else {
            Some(selected_path)
        }
    }
}

/// Chord cells for every measure, with an edit cursor.
#[derive(Debug, Clone, Default)]
pub struct CellGrid {
    /// One row of cells per measure.
    pub measures: Vec<Vec<String>>,
    /// Measure under the cursor.
    pub measure: usize,
    /// Cell under the cursor within the measure.
    pub slot: usize,
}

impl CellGrid {
    pub fn new(num_measures: usize, per_measure: usize) -> Self {
        let mut grid = Self::default();
        grid.resize(num_measures, per_measure);
        grid
    }

    /// Changes the grid shape, keeping whatever cells still fit.
    pub fn resize(&mut self, num_measures: usize, per_measure: usize) {
        self.measures.resize_with(num_measures, Vec::new);
        for cells in &mut self.measures {
            cells.resize_with(per_measure, String::new);
        }
        self.measure = self.measure.min(num_measures.saturating_sub(1));
        self.slot = self.slot.min(per_measure.saturating_sub(1));
    }

    pub fn per_measure(&self) -> usize {
        self.measures.first().map_or(0, Vec::len)
    }

    /// The cell under the cursor.
    pub fn current(&self) -> Option<&String> {
        self.measures.get(self.measure)?.get(self.slot)
    }

    fn current_mut(&mut self) -> Option<&mut String> {
        self.measures.get_mut(self.measure)?.get_mut(self.slot)
    }

    /// Moves the cursor, clamping at the grid edges.
    pub fn move_cursor(&mut self, slots: isize, measures: isize) {
        let max_measure = self.measures.len().saturating_sub(1) as isize;
        let max_slot = self.per_measure().saturating_sub(1) as isize;
        self.measure = (self.measure as isize + measures).clamp(0, max_measure) as usize;
        self.slot = (self.slot as isize + slots).clamp(0, max_slot) as usize;
    }

    pub fn clear(&mut self) {
        for cells in &mut self.measures {
            cells.iter_mut().for_each(String::clear);
        }
    }
}

/// Main application state.
pub struct App {
    /// Parameters being edited.
    pub params: GenerationParameters,
    /// Generator program selection.
    pub generator: GeneratorConfig,
    /// Panel receiving key input.
    pub focused_panel: FocusedPanel,
    /// Index into [`Field::ALL`] of the highlighted parameter.
    pub selected_field: usize,
    /// Edit buffer while a typed field is being changed.
    pub field_edit: Option<String>,
    /// Chord progression entry mode.
    pub chord_mode: ChordInputMode,
    /// Chord cells used in [`ChordInputMode::Cells`].
    pub cells: CellGrid,
    /// Compact progression typed into the progression tool.
    pub tool_input: String,
    /// Status message to display.
    pub status_message: Option<(StatusKind, String, Instant)>,
    /// Shell line shown by "Create Script", while open.
    pub script_preview: Option<String>,
    /// Export dialog state.
    pub export_dialog: ExportDialogState,
    /// Directory exports are written into.
    pub export_dir: PathBuf,
    /// Import file browser state.
    pub file_browser: FileBrowserState,
    /// Whether the help overlay is visible.
    pub show_help: bool,
    /// Help overlay scroll offset.
    pub help_scroll: u16,
    /// Set when the user asks to quit.
    pub should_quit: bool,
}

impl App {
    /// Creates the form with the given starting parameters.
    pub fn new(params: GenerationParameters, generator: GeneratorConfig) -> Self {
        let cells = CellGrid::new(
            params.num_measures as usize,
            params.time_signature.eighth_notes_per_measure(),
        );
        Self {
            params,
            generator,
            focused_panel: FocusedPanel::default(),
            selected_field: 0,
            field_edit: None,
            chord_mode: ChordInputMode::default(),
            cells,
            tool_input: String::new(),
            status_message: None,
            script_preview: None,
            export_dialog: ExportDialogState::default(),
            export_dir: PathBuf::from("."),
            file_browser: FileBrowserState::default(),
            show_help: false,
            help_scroll: 0,
            should_quit: false,
        }
    }

    // ==================== Status ====================

    /// Sets an informational status message.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((StatusKind::Info, message.into(), Instant::now()));
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        self.status_message = Some((StatusKind::Success, message.into(), Instant::now()));
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = Some((StatusKind::Error, message.into(), Instant::now()));
    }

    /// Clears expired status messages.
    pub fn clear_expired_status(&mut self) {
        if let Some((kind, _, time)) = &self.status_message {
            let duration = match kind {
                StatusKind::Error => ERROR_STATUS_DURATION,
                _ => STATUS_DURATION,
            };
            if time.elapsed() > duration {
                self.status_message = None;
            }
        }
    }

    // ==================== Parameter list ====================

    pub fn selected_field(&self) -> Field {
        Field::ALL[self.selected_field]
    }

    pub fn select_next_field(&mut self) {
        if self.field_edit.is_none() {
            self.selected_field = (self.selected_field + 1) % Field::ALL.len();
        }
    }

    pub fn select_prev_field(&mut self) {
        if self.field_edit.is_none() {
            self.selected_field = (self.selected_field + Field::ALL.len() - 1) % Field::ALL.len();
        }
    }

    /// Steps the highlighted field by `delta`.
    ///
    /// Selectors cycle through their options, numbers move within their
    /// range, and the output directory is left alone.
    pub fn adjust_field(&mut self, delta: i32) {
        let field = self.selected_field();
        let params = &mut self.params;
        match field {
            Field::OutputDir => return,
            Field::NumMeasures => {
                let index = MEASURE_CHOICES
                    .iter()
                    .position(|&m| m == params.num_measures)
                    .unwrap_or(0) as i32;
                let len = MEASURE_CHOICES.len() as i32;
                params.num_measures = MEASURE_CHOICES[(index + delta).rem_euclid(len) as usize];
            }
            Field::Bpm => {
                params.bpm = step_clamped(params.bpm, delta, *BPM_RANGE.start(), *BPM_RANGE.end());
            }
            Field::AudioKey => params.audio_key = params.audio_key.cycle(delta as isize),
            Field::TimeSignature => {
                params.time_signature = params.time_signature.cycle(delta as isize)
            }
            Field::PitchRange => params.pitch_range = params.pitch_range.cycle(delta as isize),
            Field::Instrument => params.inst = params.inst.cycle(delta as isize),
            Field::Genre => params.genre = params.genre.cycle(delta as isize),
            Field::TrackRole => params.track_role = params.track_role.cycle(delta as isize),
            Field::Rhythm => params.rhythm = params.rhythm.cycle(delta as isize),
            Field::MinVelocity => {
                params.min_velocity = step_clamped(
                    params.min_velocity as u32,
                    delta,
                    *VELOCITY_RANGE.start() as u32,
                    *VELOCITY_RANGE.end() as u32,
                ) as u8;
            }
            Field::MaxVelocity => {
                params.max_velocity = step_clamped(
                    params.max_velocity as u32,
                    delta,
                    *VELOCITY_RANGE.start() as u32,
                    *VELOCITY_RANGE.end() as u32,
                ) as u8;
            }
            Field::NumGenerate => {
                params.num_generate = step_clamped(params.num_generate, delta, 1, u32::MAX);
            }
        }
        self.sync_cells();
    }

    /// Starts editing the highlighted field.
    ///
    /// Typed fields open an edit buffer; selectors step to the next option.
    pub fn begin_field_edit(&mut self) {
        let field = self.selected_field();
        if field.is_typed() {
            self.field_edit = Some(field.value(&self.params));
        } else {
            self.adjust_field(1);
        }
    }

    pub fn field_edit_input(&mut self, c: char) {
        if let Some(buffer) = &mut self.field_edit {
            if !c.is_control() {
                buffer.push(c);
            }
        }
    }

    pub fn field_edit_backspace(&mut self) {
        if let Some(buffer) = &mut self.field_edit {
            buffer.pop();
        }
    }

    /// Applies the edit buffer to the highlighted field.
    ///
    /// Invalid input keeps the buffer open and reports why.
    pub fn commit_field_edit(&mut self) -> bool {
        let Some(buffer) = self.field_edit.clone() else {
            return false;
        };
        let field = self.selected_field();

        let result = match field {
            Field::OutputDir => {
                if buffer.trim().is_empty() {
                    Err("Output directory cannot be empty".to_string())
                } else {
                    self.params.output_dir = buffer;
                    Ok(())
                }
            }
            Field::Bpm => parse_in_range(&buffer, *BPM_RANGE.start(), *BPM_RANGE.end())
                .map(|bpm| self.params.bpm = bpm),
            Field::MinVelocity => parse_in_range(
                &buffer,
                *VELOCITY_RANGE.start() as u32,
                *VELOCITY_RANGE.end() as u32,
            )
            .map(|v| self.params.min_velocity = v as u8),
            Field::MaxVelocity => parse_in_range(
                &buffer,
                *VELOCITY_RANGE.start() as u32,
                *VELOCITY_RANGE.end() as u32,
            )
            .map(|v| self.params.max_velocity = v as u8),
            Field::NumGenerate => {
                parse_in_range(&buffer, 1, u32::MAX).map(|n| self.params.num_generate = n)
            }
            _ => Ok(()),
        };

        match result {
            Ok(()) => {
                self.field_edit = None;
                self.set_status(format!("{}: {}", field.label(), field.value(&self.params)));
                true
            }
            Err(message) => {
                self.set_error(format!("{}: {}", field.label(), message));
                false
            }
        }
    }

    pub fn cancel_field_edit(&mut self) {
        self.field_edit = None;
    }

    // ==================== Chord progression ====================

    /// Chord slots in one measure for the current time signature.
    pub fn cells_per_measure(&self) -> usize {
        self.params.time_signature.eighth_notes_per_measure()
    }

    /// Reshapes the cell grid after the measure count or meter changed.
    fn sync_cells(&mut self) {
        self.cells
            .resize(self.params.num_measures as usize, self.cells_per_measure());
    }

    pub fn toggle_chord_mode(&mut self) {
        self.chord_mode = match self.chord_mode {
            ChordInputMode::Text => ChordInputMode::Cells,
            ChordInputMode::Cells => ChordInputMode::Text,
        };
        self.set_status(match self.chord_mode {
            ChordInputMode::Text => "Chord input: text",
            ChordInputMode::Cells => "Chord input: cells (empty cells hold the previous chord)",
        });
    }

    /// Types into the chord panel (progression text or current cell).
    pub fn chord_input(&mut self, c: char) {
        if c.is_control() || c.is_whitespace() {
            return;
        }
        match self.chord_mode {
            ChordInputMode::Text => self.params.chord_progression.push(c),
            ChordInputMode::Cells => {
                if let Some(cell) = self.cells.current_mut() {
                    cell.push(c);
                }
            }
        }
    }

    pub fn chord_backspace(&mut self) {
        match self.chord_mode {
            ChordInputMode::Text => {
                self.params.chord_progression.pop();
            }
            ChordInputMode::Cells => {
                if let Some(cell) = self.cells.current_mut() {
                    cell.pop();
                }
            }
        }
    }

    /// Clears the whole progression in the current mode.
    pub fn clear_chords(&mut self) {
        match self.chord_mode {
            ChordInputMode::Text => self.params.chord_progression.clear(),
            ChordInputMode::Cells => self.cells.clear(),
        }
    }

    /// Live check of the text-mode progression.
    pub fn progression_check(&self) -> Result<(), ProgressionError> {
        validate_progression(
            &self.params.chord_progression,
            self.params.num_measures,
            self.params.time_signature,
        )
    }

    /// Progression built from the cell grid, or the failing measures.
    pub fn assembled_cells(&self) -> Result<String, Vec<(usize, MeasureError)>> {
        assemble_from_cells(&self.cells.measures, self.cells_per_measure())
    }

    /// Parameters as they will be submitted.
    ///
    /// In cell mode the progression comes from the grid, and is empty while
    /// any measure is invalid so validation reports it as incomplete.
    pub fn submission_params(&self) -> GenerationParameters {
        let mut params = self.params.clone();
        if self.chord_mode == ChordInputMode::Cells {
            params.chord_progression = self.assembled_cells().unwrap_or_default();
        }
        params
    }

    // ==================== Progression tool ====================

    pub fn tool_input_char(&mut self, c: char) {
        if !c.is_control() && !c.is_whitespace() {
            self.tool_input.push(c);
        }
    }

    pub fn tool_backspace(&mut self) {
        self.tool_input.pop();
    }

    /// Expanded form of the tool input for the current time signature.
    pub fn tool_output(&self) -> String {
        expand_progression(&self.tool_input, self.params.time_signature)
    }

    /// Expanded form of the example progression, shown as a hint.
    pub fn tool_placeholder(&self) -> String {
        expand_progression(EXAMPLE_PROGRESSION, self.params.time_signature)
    }

    /// Copies the expanded tool output into the text progression.
    pub fn apply_tool_output(&mut self) {
        let expanded = self.tool_output();
        if expanded.is_empty() {
            self.set_error("Nothing to apply: the progression tool is empty");
            return;
        }
        self.params.chord_progression = expanded;
        self.chord_mode = ChordInputMode::Text;
        self.set_status("Expanded progression copied to the chord progression");
    }

    // ==================== Generation ====================

    /// Builds the generator command, reporting validation failures.
    pub fn build_command(&mut self) -> Option<GeneratorCommand> {
        match build_command(&self.submission_params(), &self.generator) {
            Ok(command) => Some(command),
            Err(e) => {
                tracing::warn!("Rejected parameters: {}", e);
                self.set_error(e.to_string());
                None
            }
        }
    }

    /// Shows the command that "Run" would execute.
    pub fn create_script(&mut self) {
        if let Some(command) = self.build_command() {
            self.script_preview = Some(command.shell_line());
        }
    }

    pub fn close_script_preview(&mut self) {
        self.script_preview = None;
    }

    /// Validates and announces a run. Returns the command to execute.
    pub fn prepare_generation(&mut self) -> Option<GeneratorCommand> {
        let command = self.build_command()?;
        self.set_status("Generating MIDI files. Please wait...");
        Some(command)
    }

    /// Reports the outcome of a generator run.
    pub fn finish_generation(&mut self, result: Result<GenerationOutcome, GeneratorError>) {
        match result {
            Ok(_) => self.set_success(format!(
                "File generated successfully in the output directory: {}",
                self.params.output_dir
            )),
            Err(e) => self.set_error(format!("Error: {}", e)),
        }
    }

    // ==================== Export dialog ====================

    pub fn open_export_dialog(&mut self) {
        self.export_dialog.filename = DEFAULT_EXPORT_NAME.to_string();
        self.export_dialog.open = true;
    }

    pub fn export_dialog_input(&mut self, c: char) {
        if self.export_dialog.open && !c.is_control() {
            self.export_dialog.filename.push(c);
        }
    }

    pub fn export_dialog_backspace(&mut self) {
        if self.export_dialog.open {
            self.export_dialog.filename.pop();
        }
    }

    /// Writes `<filename>.json` into the export directory.
    pub fn export_dialog_confirm(&mut self) -> bool {
        if !self.export_dialog.open || self.export_dialog.filename.is_empty() {
            return false;
        }

        let path = self
            .export_dir
            .join(format!("{}.json", self.export_dialog.filename));
        self.export_dialog.open = false;

        match self.submission_params().save_to_file(&path) {
            Ok(()) => {
                tracing::info!("Exported parameters to {:?}", path);
                self.set_success(format!("Exported: {}", path.display()));
                true
            }
            Err(e) => {
                tracing::error!("Export to {:?} failed: {}", path, e);
                self.set_error(format!("Export failed: {}", e));
                false
            }
        }
    }

    pub fn export_dialog_cancel(&mut self) {
        self.export_dialog.open = false;
        self.set_status("Export cancelled");
    }

    // ==================== Import browser ====================

    pub fn open_file_browser(&mut self) {
        self.file_browser.open = true;
        self.file_browser.selected = 0;
        self.file_browser.scroll = 0;
        self.file_browser.refresh();
    }

    /// Selects the current browser entry, importing it if it is a file.
    pub fn file_browser_select(&mut self) -> bool {
        if !self.file_browser.open {
            return false;
        }
        match self.file_browser.select() {
            Some(path) => {
                self.file_browser.open = false;
                self.import_parameters(path)
            }
            None => false,
        }
    }

    pub fn file_browser_cancel(&mut self) {
        self.file_browser.open = false;
        self.set_status("Import cancelled");
    }

    /// Replaces the form with a parameter file merged over the defaults.
    pub fn import_parameters(&mut self, path: PathBuf) -> bool {
        match GenerationParameters::load_from_file(&path) {
            Ok(params) => {
                tracing::info!("Imported parameters from {:?}", path);
                self.params = params;
                self.chord_mode = ChordInputMode::Text;
                self.field_edit = None;
                self.sync_cells();
                self.set_success("File imported successfully!");
                true
            }
            Err(e) => {
                tracing::warn!("Import from {:?} failed: {}", path, e);
                self.set_error(format!("Error importing parameters: {}", e));
                false
            }
        }
    }

    // ==================== Misc ====================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        self.help_scroll = 0;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

/// Adds `delta` to `value`, clamped to `[min, max]`.
fn step_clamped(value: u32, delta: i32, min: u32, max: u32) -> u32 {
    (value as i64 + delta as i64).clamp(min as i64, max as i64) as u32
}

fn parse_in_range(text: &str, min: u32, max: u32) -> Result<u32, String> {
    let value: u32 = text
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a whole number", text.trim()))?;
    if value < min || value > max {
        if max == u32::MAX {
            return Err(format!("must be at least {}", min));
        }
        return Err(format!("must be between {} and {}", min, max));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Genre, TimeSignature};

    fn app() -> App {
        App::new(GenerationParameters::default(), GeneratorConfig::default())
    }

    fn select(app: &mut App, field: Field) {
        app.selected_field = Field::ALL.iter().position(|&f| f == field).unwrap();
    }

    #[test]
    fn test_cycle_selectors() {
        let mut app = app();
        select(&mut app, Field::Genre);
        app.adjust_field(1);
        assert_eq!(app.params.genre, Genre::Cinematic);
        app.begin_field_edit();
        assert_eq!(app.params.genre, Genre::NewAge);
        assert!(app.field_edit.is_none());
    }

    #[test]
    fn test_numbers_are_clamped() {
        let mut app = app();
        select(&mut app, Field::Bpm);
        app.adjust_field(500);
        assert_eq!(app.params.bpm, 300);
        app.adjust_field(-1000);
        assert_eq!(app.params.bpm, 1);

        select(&mut app, Field::MaxVelocity);
        app.adjust_field(100);
        assert_eq!(app.params.max_velocity, 127);

        select(&mut app, Field::NumGenerate);
        app.adjust_field(-5);
        assert_eq!(app.params.num_generate, 1);
    }

    #[test]
    fn test_measure_choices_cycle() {
        let mut app = app();
        select(&mut app, Field::NumMeasures);
        app.adjust_field(1);
        assert_eq!(app.params.num_measures, 16);
        app.adjust_field(1);
        assert_eq!(app.params.num_measures, 4);
        assert_eq!(app.cells.measures.len(), 4);
    }

    #[test]
    fn test_time_signature_reshapes_cells() {
        let mut app = app();
        app.cells.measures[0][0] = "Am".to_string();
        select(&mut app, Field::TimeSignature);
        app.adjust_field(-1);
        assert_eq!(app.params.time_signature, TimeSignature::TwelveEight);
        assert_eq!(app.cells.per_measure(), 12);
        assert_eq!(app.cells.measures[0][0], "Am");
    }

    #[test]
    fn test_typed_field_edit() {
        let mut app = app();
        select(&mut app, Field::Bpm);
        app.begin_field_edit();
        assert_eq!(app.field_edit.as_deref(), Some("120"));
        app.field_edit_backspace();
        app.field_edit_backspace();
        app.field_edit_input('5');
        assert!(app.commit_field_edit());
        assert_eq!(app.params.bpm, 15);

        app.begin_field_edit();
        app.field_edit = Some("999".to_string());
        assert!(!app.commit_field_edit());
        assert_eq!(app.params.bpm, 15);
        assert!(app.field_edit.is_some());
        assert!(matches!(
            app.status_message,
            Some((StatusKind::Error, _, _))
        ));
    }

    #[test]
    fn test_cells_feed_submission() {
        let mut app = app();
        select(&mut app, Field::NumMeasures);
        app.adjust_field(-1);
        assert_eq!(app.params.num_measures, 4);

        app.toggle_chord_mode();
        assert!(app.submission_params().chord_progression.is_empty());

        for (measure, chord) in ["C", "Am", "F", "G"].iter().enumerate() {
            app.cells.measure = measure;
            app.cells.slot = 0;
            for c in chord.chars() {
                app.chord_input(c);
            }
        }
        let params = app.submission_params();
        assert_eq!(params.chord_progression.split('-').count(), 32);
        assert!(app.build_command().is_some());
    }

    #[test]
    fn test_invalid_submission_reports_error() {
        let mut app = app();
        app.params.chord_progression = "C-G".to_string();
        app.create_script();
        assert!(app.script_preview.is_none());
        match &app.status_message {
            Some((StatusKind::Error, message, _)) => {
                assert_eq!(message, "chord_progression has 2 items but should have 64.")
            }
            other => panic!("unexpected status: {:?}", other),
        }
    }

    #[test]
    fn test_tool_expands_and_applies() {
        let mut app = app();
        select(&mut app, Field::NumMeasures);
        app.adjust_field(-1);
        for c in "Am-F-C-G".chars() {
            app.tool_input_char(c);
        }
        assert_eq!(app.tool_output().split('-').count(), 32);
        app.apply_tool_output();
        assert!(app.progression_check().is_ok());
        app.create_script();
        assert!(app.script_preview.as_deref().unwrap().contains("--chord_progression Am-Am"));
    }

    #[test]
    fn test_export_then_import() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app();
        app.export_dir = dir.path().to_path_buf();
        app.params.bpm = 77;
        app.params.chord_progression = "C-C".to_string();

        app.open_export_dialog();
        assert_eq!(app.export_dialog.filename, DEFAULT_EXPORT_NAME);
        app.export_dialog_backspace();
        app.export_dialog_input('t');
        app.export_dialog_input('s');
        assert!(app.export_dialog_confirm());
        let exported = dir.path().join("exports.json");
        assert!(exported.exists());

        let mut other = App::new(GenerationParameters::default(), GeneratorConfig::default());
        assert!(other.import_parameters(exported));
        assert_eq!(other.params, app.params);
    }

    #[test]
    fn test_bad_import_keeps_form() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"bpm\": ").unwrap();

        let mut app = app();
        app.params.bpm = 99;
        assert!(!app.import_parameters(path));
        assert_eq!(app.params.bpm, 99);
        match &app.status_message {
            Some((StatusKind::Error, message, _)) => {
                assert!(message.starts_with("Error importing parameters:"))
            }
            other => panic!("unexpected status: {:?}", other),
        }
    }

    #[test]
    fn test_file_browser_lists_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("b.json"), "{}").unwrap();
        std::fs::write(dir.path().join("a.JSON"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let mut browser = FileBrowserState {
            current_dir: dir.path().to_path_buf(),
            ..FileBrowserState::default()
        };
        browser.refresh();
        let names: Vec<String> = browser
            .entries
            .iter()
            .map(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "..".to_string())
            })
            .collect();
        assert_eq!(names, vec!["..", "nested", "a.JSON", "b.json"]);

        browser.move_down();
        assert_eq!(browser.select(), None);
        assert_eq!(browser.current_dir, dir.path().join("nested"));
    }

    #[test]
    fn test_cell_cursor_clamps() {
        let mut grid = CellGrid::new(2, 3);
        grid.move_cursor(10, 10);
        assert_eq!((grid.measure, grid.slot), (1, 2));
        grid.move_cursor(-10, -10);
        assert_eq!((grid.measure, grid.slot), (0, 0));
        grid.resize(1, 2);
        grid.move_cursor(5, 0);
        assert_eq!(grid.slot, 1);
    }
}
