//! Chord symbol syntax.
//!
//! A chord token is a root pitch class (sharps only) followed by an
//! optional quality suffix, e.g. `C`, `F#m`, `Bm7b5`.

use std::fmt;

/// Pitch class a chord is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Root {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Root {
    /// Roots in the order they are tried against a token.
    ///
    /// `F#` comes before `F`. The scan relies on the `#` rule in
    /// [`ChordToken::parse`] rather than on this order to tell `C` and `C#`
    /// apart.
    pub const SCAN_ORDER: [Root; 12] = [
        Root::C,
        Root::CSharp,
        Root::D,
        Root::DSharp,
        Root::E,
        Root::FSharp,
        Root::F,
        Root::G,
        Root::GSharp,
        Root::A,
        Root::ASharp,
        Root::B,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Root::C => "C",
            Root::CSharp => "C#",
            Root::D => "D",
            Root::DSharp => "D#",
            Root::E => "E",
            Root::F => "F",
            Root::FSharp => "F#",
            Root::G => "G",
            Root::GSharp => "G#",
            Root::A => "A",
            Root::ASharp => "A#",
            Root::B => "B",
        }
    }
}

/// Chord quality written after the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quality {
    /// No suffix.
    Major,
    /// `m`
    Minor,
    /// `dim`
    Diminished,
    /// `m7`
    MinorSeventh,
    /// `maj7`
    MajorSeventh,
    /// `m7b5`
    HalfDiminished,
    /// `dim7`
    DiminishedSeventh,
    /// `sus4`
    SuspendedFourth,
}

impl Quality {
    pub const ALL: [Quality; 8] = [
        Quality::Major,
        Quality::Minor,
        Quality::Diminished,
        Quality::MinorSeventh,
        Quality::MajorSeventh,
        Quality::HalfDiminished,
        Quality::DiminishedSeventh,
        Quality::SuspendedFourth,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            Quality::Major => "",
            Quality::Minor => "m",
            Quality::Diminished => "dim",
            Quality::MinorSeventh => "m7",
            Quality::MajorSeventh => "maj7",
            Quality::HalfDiminished => "m7b5",
            Quality::DiminishedSeventh => "dim7",
            Quality::SuspendedFourth => "sus4",
        }
    }

    /// Looks up a quality by its exact suffix.
    pub fn from_suffix(suffix: &str) -> Option<Quality> {
        Self::ALL.into_iter().find(|q| q.suffix() == suffix)
    }
}

/// A syntactically valid chord symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChordToken {
    pub root: Root,
    pub quality: Quality,
}

impl ChordToken {
    /// Parses a chord symbol.
    ///
    /// Roots are tried in [`Root::SCAN_ORDER`]. For each root that prefixes
    /// the token, a remaining suffix containing `#` skips to the next root;
    /// otherwise the first matching root decides, and the token is valid
    /// only if the suffix is a known quality. Note that any `#` in the
    /// suffix disqualifies it, not only a sharp directly after the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use chordbase::chord::{ChordToken, Quality, Root};
    ///
    /// let chord = ChordToken::parse("C#m").unwrap();
    /// assert_eq!(chord.root, Root::CSharp);
    /// assert_eq!(chord.quality, Quality::Minor);
    /// assert!(ChordToken::parse("Db").is_none());
    /// ```
    pub fn parse(token: &str) -> Option<ChordToken> {
        for root in Root::SCAN_ORDER {
            let Some(suffix) = token.strip_prefix(root.as_str()) else {
                continue;
            };
            if suffix.contains('#') {
                continue;
            }
            return Quality::from_suffix(suffix).map(|quality| ChordToken { root, quality });
        }
        None
    }
}

impl fmt::Display for ChordToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root.as_str(), self.quality.suffix())
    }
}

/// Returns true if `token` is a valid chord symbol.
pub fn is_valid_chord(token: &str) -> bool {
    ChordToken::parse(token).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_known_chords() {
        for token in ["C", "Am", "Gmaj7", "Bm7b5", "C#m", "F#dim7", "Dsus4", "A#m7", "Edim"] {
            assert!(is_valid_chord(token), "{token} should be valid");
        }
    }

    #[test]
    fn test_rejects_unknown_chords() {
        for token in ["H", "C##", "Xmaj7", "", "c", "Gb", "Am9", "C7", " C", "C-"] {
            assert!(!is_valid_chord(token), "{token:?} should be invalid");
        }
    }

    #[test]
    fn test_parse_picks_sharp_root() {
        let chord = ChordToken::parse("F#maj7").unwrap();
        assert_eq!(chord.root, Root::FSharp);
        assert_eq!(chord.quality, Quality::MajorSeventh);

        let chord = ChordToken::parse("G#").unwrap();
        assert_eq!(chord.root, Root::GSharp);
        assert_eq!(chord.quality, Quality::Major);
    }

    #[test]
    fn test_sharp_anywhere_in_suffix_is_rejected() {
        // Quirk: a '#' anywhere after the root disqualifies the suffix, so a
        // sharpened extension is rejected even though the root is fine.
        assert!(!is_valid_chord("Cm7#5"));
        assert!(!is_valid_chord("C#m#"));
        // Flats only fail because "b" is not a quality on its own.
        assert!(!is_valid_chord("Eb"));
        assert!(is_valid_chord("Em7b5"));
    }

    #[test]
    fn test_display_round_trips() {
        for token in ["C", "C#m", "Bm7b5", "F#sus4"] {
            assert_eq!(ChordToken::parse(token).unwrap().to_string(), token);
        }
    }
}
