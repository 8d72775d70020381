//! Fuzzing helper types

use std::collections::VecDeque;
use std::fmt::Debug;

use tbf::lexer::Instruction;
use tbf::settings::EofBehaviour;

/// A program made only of instructions, so fuzzing time is not spent on
/// comments.
#[derive(Debug, arbitrary::Arbitrary)]
pub struct FuzzInputProgram {
    pub code: Vec<Instruction>,
    pub input: VecDeque<u8>,
    pub eof: EofBehaviour,
}

impl FuzzInputProgram {
    pub fn source(&self) -> Vec<u8> {
        self.code.iter().map(|i| i.as_byte()).collect()
    }
}

#[derive(arbitrary::Arbitrary)]
pub struct FuzzInputSrc {
    pub code: Vec<u8>,
    pub input: VecDeque<u8>,
}

impl Debug for FuzzInputSrc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzInputSrc")
            .field("code", &String::from_utf8_lossy(&self.code))
            .field("input", &self.input)
            .finish()
    }
}
