//! Fixed option lists accepted by the generator.
//!
//! Every selector in the parameter form maps to one of these enums. The
//! string forms are the exact values passed on the generator command line
//! and stored in exported parameter files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a string is not one of a selector's options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct UnknownChoice {
    /// Selector name, e.g. "time signature".
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Behaviour shared by every selector enum.
pub trait Choice: Copy + PartialEq + 'static {
    /// Selector name used in messages.
    const KIND: &'static str;

    /// All options, in the order the form presents them.
    const ALL: &'static [Self];

    /// The generator-facing string for this option.
    fn as_str(&self) -> &'static str;

    /// Returns the option `steps` positions away, wrapping at both ends.
    fn cycle(&self, steps: isize) -> Self {
        let len = Self::ALL.len() as isize;
        let index = Self::ALL.iter().position(|c| c == self).unwrap_or(0) as isize;
        Self::ALL[(index + steps).rem_euclid(len) as usize]
    }

    /// Looks up an option by its generator-facing string.
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == name)
    }
}

/// Declares a selector enum together with its string table.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, default = $default:ident {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl Choice for $name {
            const KIND: &'static str = $kind;
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$name as Choice>::from_name(s).ok_or_else(|| UnknownChoice {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }
    };
}

choice_enum! {
    /// Musical key of the generated track. Major keys first, then minor.
    AudioKey, "audio key", default = C {
        C => "C",
        CSharp => "C#",
        DFlat => "Db",
        D => "D",
        EFlat => "Eb",
        E => "E",
        F => "F",
        FSharp => "F#",
        GFlat => "Gb",
        G => "G",
        AFlat => "Ab",
        A => "A",
        BFlat => "Bb",
        B => "B",
        CMinor => "Cm",
        CSharpMinor => "C#m",
        DMinor => "Dm",
        DSharpMinor => "D#m",
        EFlatMinor => "Ebm",
        EMinor => "Em",
        FMinor => "Fm",
        FSharpMinor => "F#m",
        GMinor => "Gm",
        GSharpMinor => "G#m",
        AFlatMinor => "Abm",
        AMinor => "Am",
        ASharpMinor => "A#m",
        BFlatMinor => "Bbm",
        BMinor => "Bm",
    }
}

choice_enum! {
    /// Meter of the generated track.
    TimeSignature, "time signature", default = FourFour {
        FourFour => "4/4",
        ThreeFour => "3/4",
        SixEight => "6/8",
        TwelveEight => "12/8",
    }
}

impl TimeSignature {
    /// Beats per measure.
    pub fn numerator(&self) -> u32 {
        match self {
            TimeSignature::FourFour => 4,
            TimeSignature::ThreeFour => 3,
            TimeSignature::SixEight => 6,
            TimeSignature::TwelveEight => 12,
        }
    }

    /// Beat unit (4 = quarter note, 8 = eighth note).
    pub fn denominator(&self) -> u32 {
        match self {
            TimeSignature::FourFour | TimeSignature::ThreeFour => 4,
            TimeSignature::SixEight | TimeSignature::TwelveEight => 8,
        }
    }

    /// Number of eighth-note slots in one measure.
    ///
    /// This is the signature read as a fraction, times eight, truncated.
    /// 4/4 has 8 slots, 3/4 and 6/8 have 6, and 12/8 has 12.
    pub fn eighth_notes_per_measure(&self) -> usize {
        (self.numerator() * 8 / self.denominator()) as usize
    }
}

choice_enum! {
    /// Register the generated notes should sit in.
    PitchRange, "pitch range", default = Mid {
        VeryLow => "very_low",
        Low => "low",
        MidLow => "mid_low",
        Mid => "mid",
        MidHigh => "mid_high",
        High => "high",
        VeryHigh => "very_high",
    }
}

choice_enum! {
    /// Instrument the generator writes for.
    Instrument, "instrument", default = AcousticPiano {
        AcousticPiano => "acoustic_piano",
        StringEnsemble => "string_ensemble",
        Accordion => "accordion",
        AcousticBass => "acoustic_bass",
        AcousticGuitar => "acoustic_guitar",
        Banjo => "banjo",
        Bassoon => "bassoon",
        Bell => "bell",
        BrassEnsemble => "brass_ensemble",
        Celesta => "celesta",
        Choir => "choir",
        Clarinet => "clarinet",
        DrumsFull => "drums_full",
        DrumsTops => "drums_tops",
        ElectricBass => "electric_bass",
        ElectricGuitarClean => "electric_guitar_clean",
        ElectricGuitarDistortion => "electric_guitar_distortion",
        ElectricPiano => "electric_piano",
        Fiddle => "fiddle",
        Flute => "flute",
        Glockenspiel => "glockenspiel",
        Harp => "harp",
        Harpsichord => "harpsichord",
        Horn => "horn",
        Keyboard => "keyboard",
        Mandolin => "mandolin",
        Marimba => "marimba",
        NylonGuitar => "nylon_guitar",
        Oboe => "oboe",
        Organ => "organ",
        Oud => "oud",
        PadSynth => "pad_synth",
        Percussion => "percussion",
        Recorder => "recorder",
        Sitar => "sitar",
        StringCello => "string_cello",
        StringDoubleBass => "string_double_bass",
        StringViola => "string_viola",
        StringViolin => "string_violin",
        SynthBass => "synth_bass",
        SynthBass808 => "synth_bass_808",
        SynthBassWobble => "synth_bass_wobble",
        SynthBell => "synth_bell",
        SynthLead => "synth_lead",
        SynthPad => "synth_pad",
        SynthPluck => "synth_pluck",
        SynthVoice => "synth_voice",
        Timpani => "timpani",
        Trombone => "trombone",
        Trumpet => "trumpet",
        Tuba => "tuba",
        Ukulele => "ukulele",
        Vibraphone => "vibraphone",
        Whistle => "whistle",
        Xylophone => "xylophone",
        Zither => "zither",
        Orgel => "orgel",
        SynthBrass => "synth_brass",
        Sax => "sax",
        BambooFlute => "bamboo_flute",
        Yanggeum => "yanggeum",
        Vocal => "vocal",
    }
}

choice_enum! {
    /// Style the generator was trained on.
    Genre, "genre", default = NewAge {
        NewAge => "newage",
        Cinematic => "cinematic",
    }
}

choice_enum! {
    /// Function of the generated track within an arrangement.
    TrackRole, "track role", default = MainMelody {
        MainMelody => "main_melody",
        SubMelody => "sub_melody",
        Accompaniment => "accompaniment",
        Bass => "bass",
        Pad => "pad",
        Riff => "riff",
    }
}

choice_enum! {
    /// Rhythmic grid of the generated notes.
    Rhythm, "rhythm", default = Standard {
        Standard => "standard",
        Triplet => "triplet",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_counts() {
        assert_eq!(AudioKey::ALL.len(), 29);
        assert_eq!(TimeSignature::ALL.len(), 4);
        assert_eq!(PitchRange::ALL.len(), 7);
        assert_eq!(Instrument::ALL.len(), 62);
        assert_eq!(Genre::ALL.len(), 2);
        assert_eq!(TrackRole::ALL.len(), 6);
        assert_eq!(Rhythm::ALL.len(), 2);
    }

    #[test]
    fn test_eighth_notes_per_measure() {
        assert_eq!(TimeSignature::FourFour.eighth_notes_per_measure(), 8);
        assert_eq!(TimeSignature::ThreeFour.eighth_notes_per_measure(), 6);
        assert_eq!(TimeSignature::SixEight.eighth_notes_per_measure(), 6);
        assert_eq!(TimeSignature::TwelveEight.eighth_notes_per_measure(), 12);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("12/8".parse::<TimeSignature>(), Ok(TimeSignature::TwelveEight));
        assert_eq!("C#m".parse::<AudioKey>(), Ok(AudioKey::CSharpMinor));
        assert_eq!(Instrument::SynthBass808.to_string(), "synth_bass_808");

        let err = "5/4".parse::<TimeSignature>().unwrap_err();
        assert_eq!(err.to_string(), "'5/4' is not a valid time signature");
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(Genre::NewAge.cycle(1), Genre::Cinematic);
        assert_eq!(Genre::Cinematic.cycle(1), Genre::NewAge);
        assert_eq!(TimeSignature::FourFour.cycle(-1), TimeSignature::TwelveEight);
        assert_eq!(Rhythm::Standard.cycle(4), Rhythm::Standard);
    }

    #[test]
    fn test_serde_uses_generator_names() {
        let json = serde_json::to_string(&PitchRange::MidHigh).unwrap();
        assert_eq!(json, "\"mid_high\"");
        let key: AudioKey = serde_json::from_str("\"Bbm\"").unwrap();
        assert_eq!(key, AudioKey::BFlatMinor);
        assert!(serde_json::from_str::<Genre>("\"jazz\"").is_err());
    }
}
