//! Chord symbols and chord progressions.
//!
//! A progression is a `-`-separated list of chord tokens with one token per
//! eighth-note slot, e.g. `C-C-C-C-C-C-C-C-G-G-G-G-G-G-G-G` for two 4/4
//! measures. This module validates such strings, expands the compact
//! one-chord-per-measure shorthand, and assembles progressions from the
//! per-measure chord cells of the form.

mod cells;
mod progression;
mod token;

pub use cells::{
    assemble_from_cells, fill_held_cells, validate_cells, validate_measure, CellIssue,
    MeasureError,
};
pub use progression::{
    expand_progression, required_chord_count, validate_progression, ProgressionError,
    EXAMPLE_PROGRESSION, SEPARATOR,
};
pub use token::{is_valid_chord, ChordToken, Quality, Root};
