//! Whole-progression validation and the compact-to-expanded transform.

use super::token::is_valid_chord;
use crate::params::TimeSignature;
use thiserror::Error;

/// Separator between chord tokens in a progression string.
pub const SEPARATOR: char = '-';

/// Compact progression shown as a hint in the progression tool.
pub const EXAMPLE_PROGRESSION: &str = "Am-F-C-G";

/// Reasons a progression cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressionError {
    /// Nothing was entered
    #[error("Please complete the chord progression.")]
    Empty,
    /// Token count does not fill the requested measures exactly
    #[error("chord_progression has {found} items but should have {required}.")]
    CountMismatch { found: usize, required: usize },
    /// A token is not a chord symbol (position is 1-based)
    #[error("Chord {position}: '{token}' is not a valid chord.")]
    InvalidChord { position: usize, token: String },
}

/// Number of chord tokens `num_measures` measures of `time_signature` hold.
pub fn required_chord_count(num_measures: u32, time_signature: TimeSignature) -> usize {
    num_measures as usize * time_signature.eighth_notes_per_measure()
}

/// Checks a full progression against the measure count and time signature.
///
/// The count is checked before the chord syntax, so a progression that is
/// both too short and misspelled reports the count.
pub fn validate_progression(
    progression: &str,
    num_measures: u32,
    time_signature: TimeSignature,
) -> Result<(), ProgressionError> {
    if progression.is_empty() {
        return Err(ProgressionError::Empty);
    }

    let tokens: Vec<&str> = progression.split(SEPARATOR).collect();
    let required = required_chord_count(num_measures, time_signature);
    if tokens.len() != required {
        return Err(ProgressionError::CountMismatch {
            found: tokens.len(),
            required,
        });
    }

    if let Some((index, token)) = tokens
        .iter()
        .enumerate()
        .find(|(_, token)| !is_valid_chord(token))
    {
        return Err(ProgressionError::InvalidChord {
            position: index + 1,
            token: token.to_string(),
        });
    }

    Ok(())
}

/// Expands a one-chord-per-measure progression to one chord per eighth note.
///
/// Each token is repeated once per eighth-note slot of `time_signature`.
/// Tokens are copied as-is; no chord syntax is checked. Empty input yields
/// an empty string.
///
/// # Examples
///
/// ```
/// use chordbase::chord::expand_progression;
/// use chordbase::params::TimeSignature;
///
/// assert_eq!(
///     expand_progression("C-G", TimeSignature::ThreeFour),
///     "C-C-C-C-C-C-G-G-G-G-G-G"
/// );
/// ```
pub fn expand_progression(compact: &str, time_signature: TimeSignature) -> String {
    if compact.is_empty() {
        return String::new();
    }

    let slots = time_signature.eighth_notes_per_measure();
    compact
        .split(SEPARATOR)
        .flat_map(|chord| std::iter::repeat(chord).take(slots))
        .collect::<Vec<_>>()
        .join("-")
}
