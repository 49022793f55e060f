pub mod error;
pub mod first_follow;
pub mod grammar;
pub mod ll1_parser;
pub mod ll1_table;
pub mod lr_dfa;
pub mod parse;
pub mod pretty_print;
pub mod slr_parser;
pub mod slr_table;

#[cfg(test)]
mod proptest;

pub use first_follow::FirstFollow;
pub use grammar::{Grammar, ProductionTable, Rule};
pub use ll1_parser::LL1Parser;
pub use slr_parser::SLRParser;

use serde::Serialize;

pub const EPSILON: &str = "e";
pub const END_MARK: &str = "$";

/// Spellings of epsilon accepted when reading a grammar.
pub const EPSILON_ALIASES: [&str; 3] = [EPSILON, "ε", "ϵ"];

/// One applied production in a derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub head: String,
    pub body: Vec<String>,
}

impl Step {
    pub fn new(head: &str, body: &[String]) -> Self {
        Self {
            head: head.to_string(),
            body: body.to_vec(),
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.head, self.body.join(" "))
    }
}

/// `tokens` followed by `$`. A `$` inside the tokens is rejected up front.
fn end_marked<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<&str>, error::SyntaxError> {
    if let Some(position) = tokens.iter().position(|t| t.as_ref() == END_MARK) {
        return Err(error::SyntaxError::UnexpectedToken {
            position,
            token: END_MARK.to_string(),
            expected: Vec::new(),
            derivation: Vec::new(),
        });
    }
    Ok(tokens
        .iter()
        .map(|t| t.as_ref())
        .chain(std::iter::once(END_MARK))
        .collect())
}
