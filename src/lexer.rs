//! Mapping from source bytes to instructions.
//!
//! The token stream is the raw source: every byte keeps its position, and
//! bytes that are not one of the eight instructions are comments.

/// The eight BF instructions
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum Instruction {
    Left,
    Right,
    Add,
    Subtract,
    Input,
    Output,
    BeginLoop,
    EndLoop,
}

impl Instruction {
    /// Decode a single source byte, `None` for comments.
    pub fn from_byte(c: u8) -> Option<Self> {
        match c {
            b'<' => Some(Self::Left),
            b'>' => Some(Self::Right),
            b'+' => Some(Self::Add),
            b'-' => Some(Self::Subtract),
            b'.' => Some(Self::Output),
            b',' => Some(Self::Input),
            b'[' => Some(Self::BeginLoop),
            b']' => Some(Self::EndLoop),
            _ => None,
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            Self::Left => b'<',
            Self::Right => b'>',
            Self::Add => b'+',
            Self::Subtract => b'-',
            Self::Output => b'.',
            Self::Input => b',',
            Self::BeginLoop => b'[',
            Self::EndLoop => b']',
        }
    }
}

/// Iterate over the instructions in source code, along with their byte
/// offsets. Comments are skipped.
pub fn instructions(
    source_code: &'_ [u8],
) -> impl Iterator<Item = (usize, Instruction)> + '_ {
    source_code
        .iter()
        .enumerate()
        .filter_map(|(pos, &c)| Instruction::from_byte(c).map(|instr| (pos, instr)))
}

#[cfg(test)]
mod tests {
    use super::{instructions, Instruction};

    #[test]
    fn test_instructions() {
        let found: Vec<_> = instructions(b"a+\n[>x]").collect();
        assert_eq!(
            found,
            vec![
                (1, Instruction::Add),
                (3, Instruction::BeginLoop),
                (4, Instruction::Right),
                (6, Instruction::EndLoop),
            ]
        );
        for c in b"<>+-.,[]" {
            assert_eq!(Instruction::from_byte(*c).unwrap().as_byte(), *c);
        }
        assert_eq!(Instruction::from_byte(b'!'), None);
    }
}
