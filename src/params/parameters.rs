//! The parameter record behind one generation request.

use super::choices::{AudioKey, Genre, Instrument, PitchRange, Rhythm, TimeSignature, TrackRole};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;
use thiserror::Error;

/// Accepted tempo range in beats per minute.
pub const BPM_RANGE: RangeInclusive<u32> = 1..=300;

/// Accepted MIDI velocity range for both velocity bounds.
pub const VELOCITY_RANGE: RangeInclusive<u8> = 1..=127;

/// Measure counts the generator supports.
pub const MEASURE_CHOICES: [u32; 3] = [4, 8, 16];

/// Parameter names, in export and command-line order.
pub const FIELD_NAMES: [&str; 14] = [
    "output_dir",
    "bpm",
    "audio_key",
    "time_signature",
    "pitch_range",
    "num_measures",
    "inst",
    "genre",
    "track_role",
    "rhythm",
    "min_velocity",
    "max_velocity",
    "chord_progression",
    "num_generate",
];

/// Errors raised while importing, exporting or overriding parameters.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// Parameter file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Document is not valid JSON, or a value has the wrong type
    #[error("invalid parameters: {0}")]
    Json(#[from] serde_json::Error),
    /// Document parsed but is not a JSON object
    #[error("parameter file must contain a JSON object")]
    NotAnObject,
    /// Numeric value outside its accepted range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    /// Count that must be at least one was zero
    #[error("{0} must be at least 1")]
    NotPositive(&'static str),
    /// Measure count the generator does not support
    #[error("num_measures must be one of 4, 8 or 16, got {0}")]
    UnsupportedMeasures(u32),
    /// Override names a field that does not exist
    #[error("unknown parameter '{0}'")]
    UnknownField(String),
    /// Override is not of the form `field=value`
    #[error("expected field=value, got '{0}'")]
    MalformedOverride(String),
}

/// Everything the generator needs for one request.
///
/// Field names double as the keys of the exported JSON layout and as the
/// generator's flag names, so they are kept in snake_case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParameters {
    /// Directory the generator writes MIDI files into.
    pub output_dir: String,

    /// Tempo in beats per minute.
    pub bpm: u32,

    pub audio_key: AudioKey,

    pub time_signature: TimeSignature,

    pub pitch_range: PitchRange,

    /// Length of each generated file in measures.
    pub num_measures: u32,

    pub inst: Instrument,

    pub genre: Genre,

    pub track_role: TrackRole,

    pub rhythm: Rhythm,

    /// Lower velocity bound. Not checked against `max_velocity`.
    pub min_velocity: u8,

    /// Upper velocity bound.
    pub max_velocity: u8,

    /// Expanded progression, one chord per eighth-note slot.
    pub chord_progression: String,

    /// Number of files to generate.
    pub num_generate: u32,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            output_dir: "./output".to_string(),
            bpm: 120,
            audio_key: AudioKey::default(),
            time_signature: TimeSignature::default(),
            pitch_range: PitchRange::default(),
            num_measures: 8,
            inst: Instrument::default(),
            genre: Genre::default(),
            track_role: TrackRole::default(),
            rhythm: Rhythm::default(),
            min_velocity: 70,
            max_velocity: 100,
            chord_progression: String::new(),
            num_generate: 1,
        }
    }
}

impl GenerationParameters {
    /// Number of chord tokens the progression must contain.
    pub fn chords_required(&self) -> usize {
        crate::chord::required_chord_count(self.num_measures, self.time_signature)
    }

    /// Checks the numeric fields against the ranges the form allows.
    ///
    /// The velocity bounds are checked independently; `min_velocity` greater
    /// than `max_velocity` is left for the generator to deal with.
    pub fn check_ranges(&self) -> Result<(), ParamsError> {
        if !BPM_RANGE.contains(&self.bpm) {
            return Err(ParamsError::OutOfRange {
                field: "bpm",
                value: self.bpm,
                min: *BPM_RANGE.start(),
                max: *BPM_RANGE.end(),
            });
        }
        for (field, value) in [
            ("min_velocity", self.min_velocity),
            ("max_velocity", self.max_velocity),
        ] {
            if !VELOCITY_RANGE.contains(&value) {
                return Err(ParamsError::OutOfRange {
                    field,
                    value: value as u32,
                    min: *VELOCITY_RANGE.start() as u32,
                    max: *VELOCITY_RANGE.end() as u32,
                });
            }
        }
        if !MEASURE_CHOICES.contains(&self.num_measures) {
            return Err(ParamsError::UnsupportedMeasures(self.num_measures));
        }
        if self.num_generate == 0 {
            return Err(ParamsError::NotPositive("num_generate"));
        }
        Ok(())
    }

    /// Merges a JSON object into these parameters.
    ///
    /// Keys that are not parameter names are ignored, and keys that are
    /// absent keep their current value. The merge is all-or-nothing: if any
    /// value fails to parse or is out of range, `self` is left untouched.
    pub fn apply_json(&mut self, value: Value) -> Result<(), ParamsError> {
        let Value::Object(overrides) = value else {
            return Err(ParamsError::NotAnObject);
        };

        let mut merged = serde_json::to_value(&*self)?;
        if let Some(fields) = merged.as_object_mut() {
            for (key, value) in overrides {
                match fields.get_mut(&key) {
                    Some(slot) => *slot = value,
                    None => tracing::debug!(key = %key, "Ignoring unknown parameter"),
                }
            }
        }

        let candidate: GenerationParameters = serde_json::from_value(merged)?;
        candidate.check_ranges()?;
        *self = candidate;
        Ok(())
    }

    /// Applies a single `field=value` override.
    ///
    /// String fields take the raw text verbatim. Other fields parse the
    /// value as JSON first and fall back to a JSON string, so `bpm=90` and
    /// `audio_key=F#m` both work.
    pub fn apply_override(&mut self, assignment: &str) -> Result<(), ParamsError> {
        let (field, raw) = assignment
            .split_once('=')
            .ok_or_else(|| ParamsError::MalformedOverride(assignment.to_string()))?;
        let field = field.trim();
        if !FIELD_NAMES.contains(&field) {
            return Err(ParamsError::UnknownField(field.to_string()));
        }

        let is_text = matches!(field, "output_dir" | "chord_progression");
        let value = if is_text {
            Value::String(raw.to_string())
        } else {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        };

        let mut single = Map::new();
        single.insert(field.to_string(), value);
        self.apply_json(Value::Object(single))
    }

    /// Parses a parameter document, filling missing keys from defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the text is not a JSON object or a value is invalid
    pub fn from_json(json: &str) -> Result<Self, ParamsError> {
        let value: Value = serde_json::from_str(json)?;
        let mut params = Self::default();
        params.apply_json(value)?;
        Ok(params)
    }

    /// Serializes the parameters as a flat, 4-space indented JSON object.
    pub fn to_json(&self) -> Result<String, ParamsError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Saves the parameters to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file writing fails
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ParamsError> {
        let json = self.to_json()?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Loads parameters from a JSON file, filling missing keys from defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or its contents are invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParamsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GenerationParameters {
        GenerationParameters {
            output_dir: "/tmp/midi out".to_string(),
            bpm: 92,
            audio_key: AudioKey::FSharpMinor,
            time_signature: TimeSignature::SixEight,
            pitch_range: PitchRange::MidHigh,
            num_measures: 4,
            inst: Instrument::StringCello,
            genre: Genre::Cinematic,
            track_role: TrackRole::Pad,
            rhythm: Rhythm::Triplet,
            min_velocity: 40,
            max_velocity: 110,
            chord_progression: "Am-Am-Am-Am-Am-Am".to_string(),
            num_generate: 3,
        }
    }

    #[test]
    fn test_defaults() {
        let params = GenerationParameters::default();
        assert_eq!(params.output_dir, "./output");
        assert_eq!(params.bpm, 120);
        assert_eq!(params.audio_key, AudioKey::C);
        assert_eq!(params.time_signature, TimeSignature::FourFour);
        assert_eq!(params.num_measures, 8);
        assert_eq!(params.inst, Instrument::AcousticPiano);
        assert_eq!((params.min_velocity, params.max_velocity), (70, 100));
        assert!(params.chord_progression.is_empty());
        assert_eq!(params.chords_required(), 64);
        assert!(params.check_ranges().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let params = sample();
        let json = params.to_json().unwrap();
        let loaded = GenerationParameters::from_json(&json).unwrap();
        assert_eq!(loaded, params);
    }

    #[test]
    fn test_export_layout() {
        let json = GenerationParameters::default().to_json().unwrap();
        assert!(json.starts_with("{\n    \"output_dir\": \"./output\",\n    \"bpm\": 120,"));

        let value: Value = serde_json::from_str(&json).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        let mut expected = FIELD_NAMES.to_vec();
        expected.sort_unstable();
        let mut keys = keys;
        keys.sort_unstable();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_import_fills_missing_and_ignores_unknown() {
        let params =
            GenerationParameters::from_json(r#"{"bpm": 80, "top_k": 1, "genre": "cinematic"}"#)
                .unwrap();
        assert_eq!(params.bpm, 80);
        assert_eq!(params.genre, Genre::Cinematic);
        assert_eq!(params.output_dir, "./output");
        assert_eq!(params.num_measures, 8);
    }

    #[test]
    fn test_import_rejects_bad_documents() {
        assert!(matches!(
            GenerationParameters::from_json("{not json"),
            Err(ParamsError::Json(_))
        ));
        assert!(matches!(
            GenerationParameters::from_json("[1, 2]"),
            Err(ParamsError::NotAnObject)
        ));
        assert!(matches!(
            GenerationParameters::from_json(r#"{"inst": "kazoo"}"#),
            Err(ParamsError::Json(_))
        ));
        assert!(matches!(
            GenerationParameters::from_json(r#"{"bpm": 301}"#),
            Err(ParamsError::OutOfRange { field: "bpm", .. })
        ));
        assert!(matches!(
            GenerationParameters::from_json(r#"{"num_measures": 5}"#),
            Err(ParamsError::UnsupportedMeasures(5))
        ));
        assert!(matches!(
            GenerationParameters::from_json(r#"{"num_generate": 0}"#),
            Err(ParamsError::NotPositive("num_generate"))
        ));
    }

    #[test]
    fn test_failed_merge_leaves_params_untouched() {
        let mut params = sample();
        let before = params.clone();
        let result = params.apply_json(serde_json::json!({"bpm": 60, "min_velocity": 0}));
        assert!(result.is_err());
        assert_eq!(params, before);
    }

    #[test]
    fn test_velocity_order_is_not_checked() {
        let params =
            GenerationParameters::from_json(r#"{"min_velocity": 120, "max_velocity": 10}"#)
                .unwrap();
        assert_eq!((params.min_velocity, params.max_velocity), (120, 10));
    }

    #[test]
    fn test_apply_override() {
        let mut params = GenerationParameters::default();
        params.apply_override("bpm=90").unwrap();
        params.apply_override("audio_key=F#m").unwrap();
        params.apply_override("time_signature=3/4").unwrap();
        params.apply_override("output_dir=123").unwrap();
        params.apply_override("chord_progression=C-C-G-G").unwrap();

        assert_eq!(params.bpm, 90);
        assert_eq!(params.audio_key, AudioKey::FSharpMinor);
        assert_eq!(params.time_signature, TimeSignature::ThreeFour);
        assert_eq!(params.output_dir, "123");
        assert_eq!(params.chord_progression, "C-C-G-G");

        assert!(matches!(
            params.apply_override("tempo=90"),
            Err(ParamsError::UnknownField(_))
        ));
        assert!(matches!(
            params.apply_override("bpm"),
            Err(ParamsError::MalformedOverride(_))
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");

        let params = sample();
        params.save_to_file(&path).unwrap();
        let loaded = GenerationParameters::load_from_file(&path).unwrap();
        assert_eq!(loaded, params);

        assert!(matches!(
            GenerationParameters::load_from_file(dir.path().join("missing.json")),
            Err(ParamsError::Io(_))
        ));
    }
}
