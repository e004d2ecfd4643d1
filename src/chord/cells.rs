//! Per-measure chord entry.
//!
//! In cell mode each measure is a row of chord cells, one per eighth-note
//! slot. An empty cell after the first holds the chord before it, so
//! `["Am", "", "", "", "F", "", "", ""]` fills to
//! `Am-Am-Am-Am-F-F-F-F`.

use super::progression::SEPARATOR;
use super::token::is_valid_chord;
use thiserror::Error;

/// A problem with a single chord cell (indices are 1-based).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellIssue {
    /// The first cell of a measure has nothing to hold, so it must be set
    #[error("Chord 1 is required.")]
    MissingFirstChord,
    /// Cell text is not a chord symbol
    #[error("Chord {index}: '{token}' is not a valid chord.")]
    InvalidChord { index: usize, token: String },
}

/// Reasons a single measure cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeasureError {
    /// Measure has no chords at all
    #[error("Measure is empty.")]
    Empty,
    /// Wrong number of non-blank chords
    #[error("{found} chords were entered; {required} are required, separated by '-'.")]
    CountMismatch { found: usize, required: usize },
    /// One or more cells are invalid
    #[error("{}", join_issues(.0))]
    Cells(Vec<CellIssue>),
}

fn join_issues(issues: &[CellIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Checks a row of chord cells, collecting every issue.
///
/// Empty cells after the first are allowed. Cells are not trimmed, so a
/// cell holding only whitespace is an invalid chord.
pub fn validate_cells<S: AsRef<str>>(cells: &[S]) -> Result<(), Vec<CellIssue>> {
    let mut issues = Vec::new();
    for (index, cell) in cells.iter().enumerate() {
        let cell = cell.as_ref();
        if cell.is_empty() {
            if index == 0 {
                issues.push(CellIssue::MissingFirstChord);
            }
            continue;
        }
        if !is_valid_chord(cell) {
            issues.push(CellIssue::InvalidChord {
                index: index + 1,
                token: cell.to_string(),
            });
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Replaces held (empty) cells with the chord before them and joins the row.
///
/// An empty first cell stays empty; callers validate first.
pub fn fill_held_cells<S: AsRef<str>>(cells: &[S]) -> String {
    let mut filled: Vec<&str> = Vec::with_capacity(cells.len());
    for (index, cell) in cells.iter().enumerate() {
        let cell = cell.as_ref();
        if cell.is_empty() && index > 0 {
            filled.push(filled[index - 1]);
        } else {
            filled.push(cell);
        }
    }
    filled.join("-")
}

/// Checks one measure's worth of `-`-separated chords.
///
/// Blank tokens are ignored when counting, but still go through cell
/// validation, so a measure that starts with a separator reports a missing
/// first chord.
pub fn validate_measure(measure: &str, per_measure: usize) -> Result<(), MeasureError> {
    if measure.is_empty() {
        return Err(MeasureError::Empty);
    }

    let tokens: Vec<&str> = measure.split(SEPARATOR).collect();
    let found = tokens.iter().filter(|t| !t.trim().is_empty()).count();
    if found != per_measure {
        return Err(MeasureError::CountMismatch {
            found,
            required: per_measure,
        });
    }

    validate_cells(&tokens).map_err(MeasureError::Cells)
}

/// Builds a full progression from a grid of measure cells.
///
/// Every measure is validated and filled. The progression is the `-`-join
/// of all filled measures, or the list of `(measure, error)` pairs (1-based)
/// if any measure fails.
pub fn assemble_from_cells<S: AsRef<str>>(
    measures: &[Vec<S>],
    per_measure: usize,
) -> Result<String, Vec<(usize, MeasureError)>> {
    let mut filled = Vec::with_capacity(measures.len());
    let mut errors = Vec::new();

    for (index, cells) in measures.iter().enumerate() {
        let result = validate_cells(cells)
            .map_err(MeasureError::Cells)
            .map(|()| fill_held_cells(cells))
            .and_then(|measure| validate_measure(&measure, per_measure).map(|()| measure));
        match result {
            Ok(measure) => filled.push(measure),
            Err(e) => errors.push((index + 1, e)),
        }
    }

    if errors.is_empty() {
        Ok(filled.join("-"))
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_cells_collects_all_issues() {
        let issues = validate_cells(&["", "Am", "Q", "", "Hm"]).unwrap_err();
        assert_eq!(
            issues,
            vec![
                CellIssue::MissingFirstChord,
                CellIssue::InvalidChord {
                    index: 3,
                    token: "Q".to_string()
                },
                CellIssue::InvalidChord {
                    index: 5,
                    token: "Hm".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_held_cells_are_tolerated() {
        assert_eq!(validate_cells(&["C", "", "", "G"]), Ok(()));
    }

    #[test]
    fn test_fill_held_cells() {
        assert_eq!(
            fill_held_cells(&["Am", "", "", "", "F", "", "", ""]),
            "Am-Am-Am-Am-F-F-F-F"
        );
        assert_eq!(fill_held_cells(&["", "C"]), "-C");
    }

    #[test]
    fn test_validate_measure() {
        assert_eq!(validate_measure("", 6), Err(MeasureError::Empty));
        assert_eq!(
            validate_measure("C-C-C", 6),
            Err(MeasureError::CountMismatch {
                found: 3,
                required: 6
            })
        );
        assert_eq!(validate_measure("C-C-C-G-G-G", 6), Ok(()));
        assert_eq!(
            validate_measure("-C-C-C-G-G-G", 6),
            Err(MeasureError::Cells(vec![CellIssue::MissingFirstChord]))
        );
    }

    #[test]
    fn test_blank_tokens_are_not_counted() {
        // Six real chords plus a blank in the middle: the count passes and
        // the blank is treated as a held cell.
        assert_eq!(validate_measure("C-C--C-G-G-G", 6), Ok(()));
    }

    #[test]
    fn test_assemble_from_cells() {
        let measures = vec![
            vec!["Am", "", "", "", "", ""],
            vec!["F", "", "", "G", "", ""],
        ];
        assert_eq!(
            assemble_from_cells(&measures, 6),
            Ok("Am-Am-Am-Am-Am-Am-F-F-F-G-G-G".to_string())
        );
    }

    #[test]
    fn test_assemble_reports_failing_measures() {
        let measures = vec![
            vec!["C".to_string(), String::new()],
            vec![String::new(), "G".to_string()],
            vec!["D".to_string(), "X".to_string()],
        ];
        let errors = assemble_from_cells(&measures, 2).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].0, 2);
        assert_eq!(
            errors[0].1,
            MeasureError::Cells(vec![CellIssue::MissingFirstChord])
        );
        assert_eq!(errors[1].0, 3);
    }

    #[test]
    fn test_measure_error_message_lists_cells() {
        let err = MeasureError::Cells(vec![
            CellIssue::MissingFirstChord,
            CellIssue::InvalidChord {
                index: 2,
                token: "X".to_string(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Chord 1 is required.\nChord 2: 'X' is not a valid chord."
        );
    }
}
