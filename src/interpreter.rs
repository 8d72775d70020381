use std::io::Read;
use std::io::Write;

use thiserror::Error;

use crate::brackets::{find_backward_match, find_forward_match, BracketError, JumpTable};
use crate::lexer::Instruction;
use crate::settings::{EofBehaviour, MatchStrategy, Settings};
use crate::tape::{Tape, TapeError};
use crate::BfNum;

/// Error type for execution
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Tape pointer error.
    #[error("{0}")]
    TapeError(#[from] TapeError),
    /// A loop bracket without partner was hit.
    #[error("{0}")]
    BracketError(#[from] BracketError),
    /// Io error during program execution.
    #[error("Unexpected IO Error: {0}")]
    IoError(#[from] std::io::Error),
    /// Aborted by callback
    #[error("Callback aborted execution")]
    Aborted,
}

impl PartialEq for ExecutionError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::TapeError(l0), Self::TapeError(r0)) => l0 == r0,
            (Self::BracketError(l0), Self::BracketError(r0)) => l0 == r0,
            (Self::IoError(l0), Self::IoError(r0)) => l0.kind() == r0.kind(),
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

/// Data sent to execution callback, before the instruction runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteCallbackData {
    /// Byte offset of the instruction in the source
    pub pos: usize,
    pub instruction: Instruction,
}

/// Reply type for callback
pub enum ExecuteCallbackResult {
    /// Continue execution
    Continue,
    /// Abort execution
    Abort,
}

/// Source of bracket partners for one run.
enum Matcher {
    Scan,
    Table(JumpTable),
}

impl Matcher {
    fn new(source: &[u8], strategy: MatchStrategy) -> Self {
        match strategy {
            MatchStrategy::Scan => Matcher::Scan,
            MatchStrategy::JumpTable => Matcher::Table(JumpTable::build(source)),
        }
    }

    fn forward(&self, source: &[u8], pos: usize) -> Result<usize, BracketError> {
        match self {
            Matcher::Scan => find_forward_match(source, pos),
            Matcher::Table(table) => table.forward(source, pos),
        }
    }

    fn backward(&self, source: &[u8], pos: usize) -> Result<usize, BracketError> {
        match self {
            Matcher::Scan => find_backward_match(source, pos),
            Matcher::Table(table) => table.backward(source, pos),
        }
    }
}

/// Run a BF program directly from source.
///
/// Brackets are matched lazily: an unbalanced program runs until the bad
/// bracket is actually taken.
pub fn execute<TapeT: Tape, F>(
    source: &[u8],
    tape: &mut TapeT,
    settings: &Settings,
    input: &mut impl Read,
    output: &mut impl Write,
    callback: &mut F,
) -> Result<(), ExecutionError>
where
    F: FnMut(ExecuteCallbackData, &TapeT) -> ExecuteCallbackResult,
{
    let matcher = Matcher::new(source, settings.strategy);
    let mut ip = 0;
    while ip < source.len() {
        let Some(instruction) = Instruction::from_byte(source[ip]) else {
            ip += 1;
            continue;
        };
        match callback(ExecuteCallbackData { pos: ip, instruction }, tape) {
            ExecuteCallbackResult::Continue => (),
            ExecuteCallbackResult::Abort => return Err(ExecutionError::Aborted),
        }
        match instruction {
            Instruction::Add => tape.write(tape.read().inc()),
            Instruction::Subtract => tape.write(tape.read().dec()),
            Instruction::Right => tape.advance()?,
            Instruction::Left => tape.retreat()?,
            Instruction::Input => {
                if let Some(value) = read_byte(input, output, settings.eof)? {
                    tape.write(value);
                }
            }
            Instruction::Output => {
                let tmp: [u8; 1] = [tape.read().into()];
                output.write_all(&tmp)?;
            }
            Instruction::BeginLoop => {
                if tape.read().is_zero() {
                    ip = matcher.forward(source, ip)?;
                }
            }
            Instruction::EndLoop => {
                if !tape.read().is_zero() {
                    ip = matcher.backward(source, ip)?;
                }
            }
        }
        ip += 1;
    }
    output.flush()?;
    Ok(())
}

/// Read one byte of input. `None` means the cell should be left alone.
fn read_byte(
    input: &mut impl Read,
    output: &mut impl Write,
    eof: EofBehaviour,
) -> Result<Option<BfNum>, ExecutionError> {
    let mut tmp: [u8; 1] = [0; 1];
    // We may need to flush output here if there wasn't a newline.
    output.flush()?;
    let n_bytes = loop {
        match input.read(&mut tmp) {
            Ok(n) => break n,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(ExecutionError::IoError(err)),
        }
    };
    if n_bytes != 0 {
        return Ok(Some(tmp[0].into()));
    }
    Ok(match eof {
        EofBehaviour::AllOnes => Some(BfNum::ALL_ONES),
        EofBehaviour::Zero => Some(BfNum::ZERO),
        EofBehaviour::Unchanged => None,
    })
}
