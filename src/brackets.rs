//! Bracket matching
//!
//! Loops are never materialised as a tree. Instead the partner of a bracket is
//! found by counting nesting depth over the raw source, either on demand
//! ([`find_forward_match`], [`find_backward_match`]) or once up front
//! ([`JumpTable`]).

use std::fmt::Display;

use thiserror::Error;

use crate::SourcePos;

/// Which way the brackets fail to balance
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Imbalance {
    /// A `]` with no open `[` before it.
    UnmatchedClose,
    /// A `[` that is never closed.
    UnclosedOpen,
}

impl Display for Imbalance {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Imbalance::UnmatchedClose => write!(f, "closed-bracket without matching open-bracket"),
            Imbalance::UnclosedOpen => write!(f, "open-bracket is never closed"),
        }
    }
}

/// Errors from bracket matching
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BracketError {
    #[error("Unbalanced brackets: {kind} at {pos}")]
    UnbalancedBrackets { kind: Imbalance, pos: SourcePos },
    /// Forward scan from the `[` at `pos` ran off the end.
    #[error("Encountered end-of-file while looking for matching closed-bracket for open-bracket at {pos}")]
    UnexpectedEndOfStream { pos: SourcePos },
    /// Backward scan from the `]` at `pos` ran off the start.
    #[error("Encountered beginning-of-file while looking for matching open-bracket for closed-bracket at {pos}")]
    UnexpectedStartOfStream { pos: SourcePos },
}

impl BracketError {
    /// Where in the source the offending bracket is.
    pub fn pos(&self) -> SourcePos {
        match self {
            BracketError::UnbalancedBrackets { pos, .. } => *pos,
            BracketError::UnexpectedEndOfStream { pos } => *pos,
            BracketError::UnexpectedStartOfStream { pos } => *pos,
        }
    }
}

/// Check that all brackets in the source balance.
///
/// An unmatched `]` is reported where it occurs, a missing `]` is reported at
/// the innermost `[` left open at the end.
pub fn validate(source: &[u8]) -> Result<(), BracketError> {
    // Positions of currently open brackets, the length is the depth.
    let mut open = vec![];
    for (pos, c) in source.iter().enumerate() {
        match c {
            b'[' => open.push(pos),
            b']' => {
                if open.pop().is_none() {
                    return Err(BracketError::UnbalancedBrackets {
                        kind: Imbalance::UnmatchedClose,
                        pos: SourcePos::locate(source, pos),
                    });
                }
            }
            _ => (),
        }
    }
    match open.pop() {
        Some(pos) => Err(BracketError::UnbalancedBrackets {
            kind: Imbalance::UnclosedOpen,
            pos: SourcePos::locate(source, pos),
        }),
        None => Ok(()),
    }
}

/// Find the `]` matching the `[` at `pos`.
pub fn find_forward_match(source: &[u8], pos: usize) -> Result<usize, BracketError> {
    debug_assert_eq!(source.get(pos), Some(&b'['));
    let mut depth = 1usize;
    for (idx, c) in source.iter().enumerate().skip(pos + 1) {
        match c {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(idx);
                }
            }
            _ => (),
        }
    }
    Err(BracketError::UnexpectedEndOfStream {
        pos: SourcePos::locate(source, pos),
    })
}

/// Find the `[` matching the `]` at `pos`.
pub fn find_backward_match(source: &[u8], pos: usize) -> Result<usize, BracketError> {
    debug_assert_eq!(source.get(pos), Some(&b']'));
    let mut depth = 1usize;
    for (idx, c) in source[..pos].iter().enumerate().rev() {
        match c {
            b']' => depth += 1,
            b'[' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(idx);
                }
            }
            _ => (),
        }
    }
    Err(BracketError::UnexpectedStartOfStream {
        pos: SourcePos::locate(source, pos),
    })
}

/// Precomputed partner of every bracket.
///
/// Building never fails: brackets without a partner simply have no entry, and
/// looking them up produces the same error the corresponding scan would.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpTable {
    partners: Vec<Option<usize>>,
}

impl JumpTable {
    pub fn build(source: &[u8]) -> Self {
        let mut partners = vec![None; source.len()];
        let mut open = vec![];
        for (pos, c) in source.iter().enumerate() {
            match c {
                b'[' => open.push(pos),
                b']' => {
                    if let Some(start) = open.pop() {
                        partners[start] = Some(pos);
                        partners[pos] = Some(start);
                    }
                }
                _ => (),
            }
        }
        Self { partners }
    }

    /// Partner of the bracket at `pos`, if it has one.
    pub fn partner(&self, pos: usize) -> Option<usize> {
        self.partners.get(pos).copied().flatten()
    }

    /// Table backed equivalent of [`find_forward_match`].
    pub fn forward(&self, source: &[u8], pos: usize) -> Result<usize, BracketError> {
        self.partner(pos)
            .ok_or_else(|| BracketError::UnexpectedEndOfStream {
                pos: SourcePos::locate(source, pos),
            })
    }

    /// Table backed equivalent of [`find_backward_match`].
    pub fn backward(&self, source: &[u8], pos: usize) -> Result<usize, BracketError> {
        self.partner(pos)
            .ok_or_else(|| BracketError::UnexpectedStartOfStream {
                pos: SourcePos::locate(source, pos),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        validate(b"").unwrap();
        validate(b"++>->,>.").unwrap();
        validate(b"[]").unwrap();
        validate(b"++>->,>.>[-[+>]]").unwrap();
        validate(b"[[]][[[]]]").unwrap();

        assert!(matches!(
            validate(b"]"),
            Err(BracketError::UnbalancedBrackets {
                kind: Imbalance::UnmatchedClose,
                ..
            })
        ));
        assert!(matches!(
            validate(b"["),
            Err(BracketError::UnbalancedBrackets {
                kind: Imbalance::UnclosedOpen,
                ..
            })
        ));
        // Equal counts but wrong order
        assert!(validate(b"][").is_err());
        assert!(validate(b"[]][").is_err());
    }

    #[test]
    fn test_validate_positions() {
        let err = validate(b"+[\n-]]").unwrap_err();
        assert_eq!(err.pos().offset, 5);
        assert_eq!((err.pos().line, err.pos().column), (2, 3));

        let err = validate(b"[[]\n[").unwrap_err();
        assert_eq!(err.pos().offset, 4);
        let err = validate(b"[[]").unwrap_err();
        assert_eq!(err.pos().offset, 0);
    }

    #[test]
    fn test_find_matches() {
        let src = b"+[>[-]<[x]]-";
        assert_eq!(find_forward_match(src, 1), Ok(10));
        assert_eq!(find_forward_match(src, 3), Ok(5));
        assert_eq!(find_forward_match(src, 7), Ok(9));
        assert_eq!(find_backward_match(src, 10), Ok(1));
        assert_eq!(find_backward_match(src, 5), Ok(3));
        assert_eq!(find_backward_match(src, 9), Ok(7));
        // Pure: asking again gives the same answer
        assert_eq!(find_forward_match(src, 1), find_forward_match(src, 1));
    }

    #[test]
    fn test_find_match_failures() {
        assert!(matches!(
            find_forward_match(b"[[]", 0),
            Err(BracketError::UnexpectedEndOfStream { pos }) if pos.offset == 0
        ));
        assert!(matches!(
            find_backward_match(b"a\n[]]", 4),
            Err(BracketError::UnexpectedStartOfStream { pos }) if pos.line == 2 && pos.column == 3
        ));
    }

    #[test]
    fn test_jump_table_agrees_with_scan() {
        let sources: [&[u8]; 6] = [
            b"+[>[-]<[x]]-",
            b"[[]",
            b"[]]",
            b"][]",
            b"]]][[[",
            b"[[]]][[]][",
        ];
        for src in sources {
            let table = JumpTable::build(src);
            for (pos, c) in src.iter().enumerate() {
                match c {
                    b'[' => assert_eq!(table.forward(src, pos), find_forward_match(src, pos)),
                    b']' => assert_eq!(table.backward(src, pos), find_backward_match(src, pos)),
                    _ => assert_eq!(table.partner(pos), None),
                }
            }
        }
    }
}
