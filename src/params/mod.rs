//! Generation parameters and the option lists they draw from.
//!
//! A [`GenerationParameters`] value is the whole form: it is built from
//! defaults, optionally merged with an imported JSON file, edited, and then
//! handed to the command builder once per submission.

mod choices;
mod parameters;

pub use choices::{
    AudioKey, Choice, Genre, Instrument, PitchRange, Rhythm, TimeSignature, TrackRole,
    UnknownChoice,
};
pub use parameters::{
    GenerationParameters, ParamsError, BPM_RANGE, FIELD_NAMES, MEASURE_CHOICES, VELOCITY_RANGE,
};
