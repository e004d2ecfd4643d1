//! chordbase - A front-end for the Chordbase MIDI generator.
//!
//! This library validates chord progressions, expands the compact
//! one-chord-per-measure shorthand, imports and exports generation
//! parameters as JSON, and builds the command line for the external
//! generator program.

pub mod app;
pub mod chord;
pub mod generator;
pub mod params;
pub mod ui;

// Re-export commonly used types
pub use app::{App, ChordInputMode, FocusedPanel};
pub use chord::{expand_progression, is_valid_chord, validate_progression, ProgressionError};
pub use generator::{build_command, GeneratorCommand, GeneratorConfig, GeneratorMode};
pub use params::{GenerationParameters, ParamsError, TimeSignature};
