//! Driving the external C compiler

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use thiserror::Error;

use crate::{codegen::generate_c, settings::BuildSettings, BracketError};

/// Error type for compiling to an executable
#[derive(Debug, Error)]
pub enum BuildError {
    /// The program itself is malformed, nothing was written.
    #[error("{0}")]
    Bracket(#[from] BracketError),
    #[error("Failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to run '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    /// The C compiler ran but did not succeed.
    #[error("Build command '{command}' failed with {status}")]
    BuildFailure { command: String, status: ExitStatus },
}

/// Path of the generated C file: `.c` appended to the output path.
pub fn c_source_path(output: &Path) -> PathBuf {
    let mut path: OsString = output.as_os_str().into();
    path.push(".c");
    path.into()
}

/// Path of the executable for an output path.
pub fn executable_path(output: &Path) -> PathBuf {
    let mut path: OsString = output.as_os_str().into();
    if cfg!(windows) {
        path.push(".exe");
    }
    path.into()
}

/// Generate C for `source` and write it to `path`.
pub fn write_source(
    source: &[u8],
    path: &Path,
    settings: &BuildSettings,
) -> Result<(), BuildError> {
    let code = generate_c(source, &settings.codegen)?;
    fs::write(path, code).map_err(|source| BuildError::Io {
        path: path.to_owned(),
        source,
    })
}

/// Compile a C file into an executable with the configured compiler.
pub fn build_executable(
    c_path: &Path,
    exe_path: &Path,
    settings: &BuildSettings,
) -> Result<(), BuildError> {
    let mut cmd = Command::new(&settings.compiler);
    cmd.args(&settings.compiler_flags)
        .arg(c_path)
        .arg("-o")
        .arg(exe_path);
    let command = describe(&cmd);
    if settings.echo_command {
        eprintln!("{command}");
    }
    let status = cmd.status().map_err(|source| BuildError::Spawn {
        command: command.clone(),
        source,
    })?;
    if !status.success() {
        return Err(BuildError::BuildFailure { command, status });
    }
    Ok(())
}

/// Translate `source` to C next to `output` and build it.
///
/// Returns the path of the executable.
pub fn compile_program(
    source: &[u8],
    output: &Path,
    settings: &BuildSettings,
) -> Result<PathBuf, BuildError> {
    let c_path = c_source_path(output);
    let exe_path = executable_path(output);
    write_source(source, &c_path, settings)?;
    build_executable(&c_path, &exe_path, settings)?;
    Ok(exe_path)
}

/// Render a command line for messages.
fn describe(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(c_source_path(Path::new("out/prog")), Path::new("out/prog.c"));
        assert_eq!(c_source_path(Path::new("prog.bin")), Path::new("prog.bin.c"));
        if cfg!(windows) {
            assert_eq!(executable_path(Path::new("prog")), Path::new("prog.exe"));
        } else {
            assert_eq!(executable_path(Path::new("prog")), Path::new("prog"));
        }
    }

    #[test]
    fn test_unbalanced_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("prog");
        let result = compile_program(b"[[]", &output, &BuildSettings::default());
        assert!(matches!(result, Err(BuildError::Bracket(_))));
        assert!(!c_source_path(&output).exists());
    }

    #[test]
    fn test_missing_compiler() {
        let dir = tempfile::tempdir().unwrap();
        let settings = BuildSettings {
            compiler: "tbf-no-such-compiler".into(),
            ..Default::default()
        };
        let result = compile_program(b"+.", &dir.path().join("prog"), &settings);
        match result {
            Err(BuildError::Spawn { command, .. }) => {
                assert!(command.starts_with("tbf-no-such-compiler -O2 "));
            }
            other => panic!("unexpected result {other:?}"),
        }
        // Source is written before the compiler is started
        assert!(dir.path().join("prog.c").exists());
    }

    #[test]
    #[cfg(unix)]
    fn test_build_failure() {
        let dir = tempfile::tempdir().unwrap();
        let settings = BuildSettings {
            compiler: "false".into(),
            compiler_flags: vec![],
            ..Default::default()
        };
        let result = compile_program(b"+.", &dir.path().join("prog"), &settings);
        assert!(matches!(result, Err(BuildError::BuildFailure { .. })));
    }
}
