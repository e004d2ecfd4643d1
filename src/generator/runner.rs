//! Launching the generator process.

use super::{build_command, GeneratorCommand, GeneratorConfig};
use crate::chord::ProgressionError;
use crate::params::GenerationParameters;
use std::process::{Command, ExitStatus};
use thiserror::Error;

/// Errors that can occur while producing MIDI files.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Parameters did not pass validation; nothing was run
    #[error("{0}")]
    Invalid(#[from] ProgressionError),
    /// Generator process could not be started
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// Generator ran and reported failure
    #[error("generator failed ({status}): {stderr}")]
    Failed { status: ExitStatus, stderr: String },
}

/// Output captured from a successful generator run.
#[derive(Debug, Clone, Default)]
pub struct GenerationOutcome {
    pub stdout: String,
    pub stderr: String,
}

/// Runs a built command to completion and captures its output.
///
/// Blocks until the process exits. Exit code 0 is success; anything else
/// returns [`GeneratorError::Failed`] with the captured standard error.
pub fn run_generator(command: &GeneratorCommand) -> Result<GenerationOutcome, GeneratorError> {
    tracing::info!(program = command.program(), "Launching generator");

    let output = Command::new(command.program())
        .args(command.arguments())
        .output()
        .map_err(|source| GeneratorError::Spawn {
            program: command.program().to_string(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if output.status.success() {
        tracing::info!("Generator finished");
        Ok(GenerationOutcome { stdout, stderr })
    } else {
        tracing::error!(status = %output.status, "Generator failed: {}", stderr.trim_end());
        Err(GeneratorError::Failed {
            status: output.status,
            stderr: stderr.trim_end().to_string(),
        })
    }
}

/// Validates, builds and runs in one step.
pub fn generate(
    params: &GenerationParameters,
    config: &GeneratorConfig,
) -> Result<GenerationOutcome, GeneratorError> {
    let command = build_command(params, config)?;
    run_generator(&command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorMode;

    fn command(args: &[&str]) -> GeneratorCommand {
        GeneratorCommand {
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_run_captures_stdout() {
        let outcome = run_generator(&command(&["sh", "-c", "echo done"])).unwrap();
        assert_eq!(outcome.stdout.trim(), "done");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_surfaces_stderr() {
        let err = run_generator(&command(&["sh", "-c", "echo 'no checkpoint' >&2; exit 3"]))
            .unwrap_err();
        match err {
            GeneratorError::Failed { status, stderr } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "no checkpoint");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_program() {
        let err = run_generator(&command(&["./definitely-not-a-generator"])).unwrap_err();
        assert!(matches!(err, GeneratorError::Spawn { .. }));
    }

    #[test]
    fn test_generate_rejects_invalid_params_without_running() {
        let config = GeneratorConfig {
            mode: GeneratorMode::Native,
            native_program: "./definitely-not-a-generator".to_string(),
            ..GeneratorConfig::default()
        };
        let err = generate(&GenerationParameters::default(), &config).unwrap_err();
        assert!(matches!(err, GeneratorError::Invalid(ProgressionError::Empty)));
    }

    #[cfg(unix)]
    #[test]
    fn test_generate_passes_flags() {
        // `sh -c <body> <arg0> <args...>`: the first flag name is replaced by
        // a body that prints every argument it receives.
        let config = GeneratorConfig {
            mode: GeneratorMode::Script,
            interpreter: "sh".to_string(),
            script: "-c".to_string(),
            checkpoint_dir: "unused".to_string(),
            ..GeneratorConfig::default()
        };
        let mut params = GenerationParameters::default();
        params.num_measures = 4;
        params.chord_progression = vec!["G"; params.chords_required()].join("-");

        let mut built = build_command(&params, &config).unwrap();
        built.args[2] = r#"printf '%s\n' "$0" "$@""#.to_string();

        let outcome = run_generator(&built).unwrap();
        let lines: Vec<&str> = outcome.stdout.lines().collect();
        assert_eq!(lines[0], "unused");
        assert!(lines.contains(&"--num_generate"));
        assert_eq!(lines.last(), Some(&"1"));
    }
}
