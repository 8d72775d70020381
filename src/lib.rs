//! # tbf - Tiny Brainfuck interpreter and compiler
//!
//! Programs are either run directly on a growable tape, or translated to C
//! and handed to the system C compiler. Both paths share the same tape
//! policy, so a program behaves the same either way.
//!
//! **NOTE! This is a command line program. This library does NOT provide a
//! stable API.**

// Re-export some symbols.
pub use brackets::validate;
pub use brackets::BracketError;
pub use codegen::generate_c;
pub use interpreter::execute;
pub use interpreter::ExecuteCallbackData;
pub use interpreter::ExecuteCallbackResult;
pub use interpreter::ExecutionError;
pub use toolchain::compile_program;
pub use toolchain::BuildError;
pub use types::BfNum;
pub use types::SourcePos;

pub mod brackets;
mod codegen;
mod interpreter;
pub mod lexer;
pub mod settings;
pub mod tape;
#[doc(hidden)]
pub mod test_utils;
pub mod toolchain;
pub mod types;
