use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use clap::Parser;
use tbf::{
    compile_program, execute, generate_c,
    settings::{BuildSettings, CodegenOptions, EofBehaviour, MatchStrategy, Settings},
    tape::{Tape, VecTape},
    toolchain::{c_source_path, executable_path},
    BracketError, BuildError, ExecuteCallbackResult, ExecutionError,
};

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("Failed to read '{}': {source}", path.display())]
    IoError { path: PathBuf, source: io::Error },
    #[error("{0}")]
    BracketError(#[from] BracketError),
    #[error("Execution error: {0}")]
    ExecutionError(#[from] ExecutionError),
    #[error("Compilation error: {0}")]
    BuildError(#[from] BuildError),
    /// Building would overwrite the program being compiled.
    #[error("Output '{}' would overwrite the input file, pass a different --output", output.display())]
    OutputOverwritesInput { output: PathBuf },
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input Brainfuck source file
    input_file: PathBuf,

    /// Run the program (default)
    #[arg(short, long, default_value_t = false)]
    run: bool,

    /// Compile the program to C, then build it with the C compiler
    #[arg(short, long, default_value_t = false, conflicts_with = "run")]
    compile: bool,

    /// Print the generated C code instead of building it
    #[arg(long, default_value_t = false, conflicts_with_all = ["run", "compile", "output"])]
    emit_c: bool,

    /// Output path of the executable, the C code is written to <PATH>.c
    /// [default: input file without extension]
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Value stored by `,` at end of input
    #[arg(long, value_enum, default_value_t = EofBehaviour::AllOnes)]
    eof: EofBehaviour,

    /// How the interpreter matches brackets
    #[arg(long, value_enum, default_value_t = MatchStrategy::Scan)]
    strategy: MatchStrategy,

    /// C compiler used to build compiled programs
    #[arg(long, value_name = "CMD", env = "CC", default_value = "cc")]
    cc: String,

    /// Flag passed to the C compiler (repeatable)
    #[arg(long = "cflag", value_name = "FLAG", allow_hyphen_values = true, default_value = "-O2")]
    cflags: Vec<String>,

    /// Trace execution (interpreter) or emit #line directives (compiler)
    #[arg(long, default_value_t = false)]
    trace: bool,
}

/// Refuse output paths where the C file or the executable is the input.
fn check_output(input: &Path, output: &Path) -> Result<(), ProgramError> {
    let clobbered = [c_source_path(output), executable_path(output)]
        .iter()
        .any(|written| same_file(input, written));
    if clobbered {
        return Err(ProgramError::OutputOverwritesInput {
            output: output.to_owned(),
        });
    }
    Ok(())
}

/// Whether two paths name the same file, also through links and `..`.
fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn main() -> Result<(), ProgramError> {
    let args = Args::parse();

    let source = std::fs::read(&args.input_file).map_err(|source| ProgramError::IoError {
        path: args.input_file.clone(),
        source,
    })?;

    let codegen = CodegenOptions {
        eof: args.eof,
        trace: args.trace,
    };

    if args.emit_c {
        print!("{}", generate_c(&source, &codegen)?);
    } else if args.compile {
        let output = args
            .output
            .unwrap_or_else(|| args.input_file.with_extension(""));
        check_output(&args.input_file, &output)?;
        let settings = BuildSettings {
            codegen,
            compiler: args.cc.into(),
            compiler_flags: args.cflags.into_iter().map(Into::into).collect(),
            echo_command: true,
        };
        compile_program(&source, &output, &settings)?;
    } else {
        let settings = Settings {
            eof: args.eof,
            strategy: args.strategy,
        };
        let trace = args.trace;
        let mut tape = VecTape::new();
        execute(
            &source,
            &mut tape,
            &settings,
            &mut std::io::stdin().lock(),
            &mut std::io::stdout().lock(),
            &mut |data, tape| {
                if trace {
                    dbg!((data.pos, data.instruction, tape.cursor(), tape.read()));
                }
                ExecuteCallbackResult::Continue
            },
        )?;
    }

    Ok(())
}
