use thiserror::Error;

use super::Step;

/// A grammar that cannot be read or cannot be used as parser input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("line {0}: too many \"->\"")]
    TooManyArrows(usize),
    #[error("line {0}: left side contains whitespace")]
    LeftContainsWhitespace(usize),
    #[error("line {0}: empty left side")]
    EmptyLeft(usize),
    #[error("line {0}: cannot find left side")]
    MissingLeft(usize),
    #[error("grammar has no productions")]
    Empty,
    #[error("start symbol is not set")]
    NoStartSymbol,
    #[error("start symbol `{0}` is not a non-terminal")]
    UnknownStartSymbol(String),
    #[error("reserved symbol `{0}` cannot be used as a grammar symbol")]
    ReservedSymbol(String),
}

/// Two actions claim the same table cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    #[error("LL(1) conflict at ({non_terminal}, {terminal}): `{existing}` vs `{incoming}`")]
    LL1 {
        non_terminal: String,
        terminal: String,
        existing: String,
        incoming: String,
    },
    #[error("SLR(1) conflict in state {state} on `{terminal}`: {existing} vs {incoming}")]
    Slr {
        state: usize,
        terminal: String,
        existing: String,
        incoming: String,
    },
}

/// Why a parser could not be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    #[error(transparent)]
    Conflict(#[from] ConflictError),
}

/// Rejection of a token sequence. Positions are 0-based indices into the
/// token sequence with `$` appended.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("position {position}: unexpected token `{token}`, expected one of {expected:?}")]
    UnexpectedToken {
        position: usize,
        token: String,
        expected: Vec<String>,
        derivation: Vec<Step>,
    },
    #[error("position {position}: expected `{expected}`, found `{token}`")]
    Mismatch {
        position: usize,
        expected: String,
        token: String,
        derivation: Vec<Step>,
    },
    #[error("position {position}: unexpected token `{token}` in state {state}, expected one of {expected:?}")]
    NoAction {
        position: usize,
        state: usize,
        token: String,
        expected: Vec<String>,
        derivation: Vec<Step>,
    },
    #[error("no goto from state {state} on `{non_terminal}`")]
    MissingGoto { state: usize, non_terminal: String },
}

impl SyntaxError {
    pub fn position(&self) -> Option<usize> {
        match self {
            SyntaxError::UnexpectedToken { position, .. }
            | SyntaxError::Mismatch { position, .. }
            | SyntaxError::NoAction { position, .. } => Some(*position),
            SyntaxError::MissingGoto { .. } => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            SyntaxError::UnexpectedToken { token, .. }
            | SyntaxError::Mismatch { token, .. }
            | SyntaxError::NoAction { token, .. } => Some(token),
            SyntaxError::MissingGoto { .. } => None,
        }
    }

    /// Productions applied before the error.
    pub fn derivation(&self) -> &[Step] {
        match self {
            SyntaxError::UnexpectedToken { derivation, .. }
            | SyntaxError::Mismatch { derivation, .. }
            | SyntaxError::NoAction { derivation, .. } => derivation,
            SyntaxError::MissingGoto { .. } => &[],
        }
    }
}
