use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum LexError {
    #[error("unexpected character '{ch}' at offset {at}")]
    UnexpectedCharacter { ch: char, at: usize },
}

impl LexError {
    pub fn at(&self) -> usize {
        match self {
            LexError::UnexpectedCharacter { at, .. } => *at,
        }
    }
}
