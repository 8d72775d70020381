//! Settings defining what to do

use std::ffi::OsString;

use clap::ValueEnum;

/// What `,` stores in the current cell once input is exhausted
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, ValueEnum)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum EofBehaviour {
    /// Store 255, the byte C `getchar()` leaves behind when it returns `EOF`.
    #[default]
    AllOnes,
    /// Store 0.
    Zero,
    /// Leave the cell as it was.
    Unchanged,
}

/// How the interpreter finds the partner of a bracket
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, ValueEnum)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum MatchStrategy {
    /// Rescan the source every time a jump is taken.
    #[default]
    Scan,
    /// Build a jump table before running.
    JumpTable,
}

/// Interpreter settings
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Settings {
    pub eof: EofBehaviour,
    pub strategy: MatchStrategy,
}

/// Settings for C code generation
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct CodegenOptions {
    pub eof: EofBehaviour,
    /// Emit `#line` directives pointing back into the BF source
    pub trace: bool,
}

/// Settings for turning BF into an executable
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct BuildSettings {
    pub codegen: CodegenOptions,
    /// C compiler to invoke
    pub compiler: OsString,
    /// Extra arguments passed to the compiler before the source file
    pub compiler_flags: Vec<OsString>,
    /// Print the compiler command line to stderr before running it
    pub echo_command: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            codegen: CodegenOptions::default(),
            compiler: "cc".into(),
            compiler_flags: vec!["-O2".into()],
            echo_command: false,
        }
    }
}
