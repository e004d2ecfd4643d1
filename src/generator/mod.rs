//! Command construction for the external MIDI generator.
//!
//! The generator is an opaque program. It is either a native executable or
//! a script run through an interpreter; both take the same flags. Building
//! the command is pure and only succeeds for a valid chord progression, and
//! running it is a separate step (see [`run_generator`]).

mod runner;

pub use runner::{generate, run_generator, GenerationOutcome, GeneratorError};

use crate::chord::{validate_progression, ProgressionError};
use crate::params::{Choice, GenerationParameters};

/// Default native generator executable.
pub const DEFAULT_NATIVE_PROGRAM: &str = "./chordbase-test";

/// Default interpreter for the scripted generator.
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Default generator script.
pub const DEFAULT_SCRIPT: &str = "generate.py";

/// Default model checkpoint passed to the generator.
pub const DEFAULT_CHECKPOINT: &str = "train/pretrained/checkpoint_best.pt";

/// Which generator program to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorMode {
    /// Run the native executable directly.
    #[default]
    Native,
    /// Run the generator script through an interpreter.
    Script,
}

impl GeneratorMode {
    pub fn label(&self) -> &'static str {
        match self {
            GeneratorMode::Native => "native",
            GeneratorMode::Script => "script",
        }
    }
}

/// Where the generator lives and which checkpoint it loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub mode: GeneratorMode,
    /// Path of the native executable.
    pub native_program: String,
    /// Interpreter used in script mode.
    pub interpreter: String,
    /// Script passed to the interpreter in script mode.
    pub script: String,
    /// Value of `--checkpoint_dir`.
    pub checkpoint_dir: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            mode: GeneratorMode::default(),
            native_program: DEFAULT_NATIVE_PROGRAM.to_string(),
            interpreter: DEFAULT_INTERPRETER.to_string(),
            script: DEFAULT_SCRIPT.to_string(),
            checkpoint_dir: DEFAULT_CHECKPOINT.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Leading arguments that select the program for the current mode.
    fn program_args(&self) -> Vec<String> {
        match self.mode {
            GeneratorMode::Native => vec![self.native_program.clone()],
            GeneratorMode::Script => vec![self.interpreter.clone(), self.script.clone()],
        }
    }
}

/// A fully built generator invocation.
///
/// The first argument is the program; the rest are passed to it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorCommand {
    args: Vec<String>,
}

impl GeneratorCommand {
    /// Program to execute.
    pub fn program(&self) -> &str {
        &self.args[0]
    }

    /// Arguments after the program.
    pub fn arguments(&self) -> &[String] {
        &self.args[1..]
    }

    /// The whole argument vector, program first.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Renders the command as a single shell line.
    ///
    /// Arguments that are empty or contain characters a POSIX shell would
    /// interpret are wrapped in single quotes.
    pub fn shell_line(&self) -> String {
        self.args
            .iter()
            .map(|arg| shell_quote(arg))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<GeneratorCommand> for Vec<String> {
    fn from(command: GeneratorCommand) -> Self {
        command.args
    }
}

fn shell_quote(arg: &str) -> String {
    let is_plain = |c: char| c.is_ascii_alphanumeric() || "_-./:=,+@%#".contains(c);
    if !arg.is_empty() && !arg.starts_with('#') && arg.chars().all(is_plain) {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Builds the generator invocation for `params`.
///
/// The chord progression is validated first; on failure nothing is built
/// and the validation error is returned for the caller to report.
///
/// # Examples
///
/// ```
/// use chordbase::generator::{build_command, GeneratorConfig};
/// use chordbase::params::GenerationParameters;
///
/// let mut params = GenerationParameters::default();
/// assert!(build_command(&params, &GeneratorConfig::default()).is_err());
///
/// params.chord_progression = vec!["C"; params.chords_required()].join("-");
/// let command = build_command(&params, &GeneratorConfig::default()).unwrap();
/// assert_eq!(command.program(), "./chordbase-test");
/// ```
pub fn build_command(
    params: &GenerationParameters,
    config: &GeneratorConfig,
) -> Result<GeneratorCommand, ProgressionError> {
    validate_progression(
        &params.chord_progression,
        params.num_measures,
        params.time_signature,
    )?;

    let mut args = config.program_args();
    let mut flag = |name: &str, value: String| {
        args.push(format!("--{}", name));
        args.push(value);
    };

    flag("checkpoint_dir", config.checkpoint_dir.clone());
    flag("output_dir", params.output_dir.clone());
    flag("bpm", params.bpm.to_string());
    flag("audio_key", params.audio_key.as_str().to_string());
    flag("time_signature", params.time_signature.as_str().to_string());
    flag("pitch_range", params.pitch_range.as_str().to_string());
    flag("num_measures", params.num_measures.to_string());
    flag("inst", params.inst.as_str().to_string());
    flag("genre", params.genre.as_str().to_string());
    flag("track_role", params.track_role.as_str().to_string());
    flag("rhythm", params.rhythm.as_str().to_string());
    flag("min_velocity", params.min_velocity.to_string());
    flag("max_velocity", params.max_velocity.to_string());
    flag("chord_progression", params.chord_progression.clone());
    flag("num_generate", params.num_generate.to_string());

    tracing::debug!(mode = config.mode.label(), args = ?args, "Built generator command");
    Ok(GeneratorCommand { args })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::expand_progression;
    use crate::params::{AudioKey, Instrument, TimeSignature};

    fn valid_params() -> GenerationParameters {
        let mut params = GenerationParameters {
            num_measures: 4,
            time_signature: TimeSignature::ThreeFour,
            audio_key: AudioKey::AMinor,
            inst: Instrument::Harp,
            ..GenerationParameters::default()
        };
        params.chord_progression = expand_progression("Am-F-C-G", TimeSignature::ThreeFour);
        params
    }

    #[test]
    fn test_native_command_layout() {
        let params = valid_params();
        let command = build_command(&params, &GeneratorConfig::default()).unwrap();
        let expected: Vec<String> = [
            "./chordbase-test",
            "--checkpoint_dir",
            "train/pretrained/checkpoint_best.pt",
            "--output_dir",
            "./output",
            "--bpm",
            "120",
            "--audio_key",
            "Am",
            "--time_signature",
            "3/4",
            "--pitch_range",
            "mid",
            "--num_measures",
            "4",
            "--inst",
            "harp",
            "--genre",
            "newage",
            "--track_role",
            "main_melody",
            "--rhythm",
            "standard",
            "--min_velocity",
            "70",
            "--max_velocity",
            "100",
            "--chord_progression",
            params.chord_progression.as_str(),
            "--num_generate",
            "1",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(command.args(), expected.as_slice());
        assert_eq!(command.program(), "./chordbase-test");
        assert_eq!(command.arguments().len(), 30);
    }

    #[test]
    fn test_script_mode_uses_interpreter() {
        let config = GeneratorConfig {
            mode: GeneratorMode::Script,
            ..GeneratorConfig::default()
        };
        let command = build_command(&valid_params(), &config).unwrap();
        assert_eq!(
            &command.args()[..4],
            ["python3", "generate.py", "--checkpoint_dir", DEFAULT_CHECKPOINT]
        );
        assert_eq!(command.program(), "python3");
    }

    #[test]
    fn test_invalid_progression_builds_nothing() {
        let mut params = valid_params();
        params.chord_progression = "Am-F-C-G".to_string();
        assert_eq!(
            build_command(&params, &GeneratorConfig::default()),
            Err(ProgressionError::CountMismatch {
                found: 4,
                required: 24
            })
        );

        params.chord_progression.clear();
        assert_eq!(
            build_command(&params, &GeneratorConfig::default()),
            Err(ProgressionError::Empty)
        );
    }

    #[test]
    fn test_shell_line_quotes_when_needed() {
        let mut params = valid_params();
        params.output_dir = "/tmp/my midi".to_string();
        let line = build_command(&params, &GeneratorConfig::default())
            .unwrap()
            .shell_line();
        assert!(line.starts_with(
            "./chordbase-test --checkpoint_dir train/pretrained/checkpoint_best.pt \
             --output_dir '/tmp/my midi' --bpm 120"
        ));
        assert!(line.ends_with("--num_generate 1"));
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("C#m-C#m"), "C#m-C#m");
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("#x"), "'#x'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }
}
