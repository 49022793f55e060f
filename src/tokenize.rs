//! Turns raw input strings into terminal tokens before they reach a parser.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::Grammar;

/// Punctuation accepted as single-character tokens besides alphanumerics.
pub const PUNCTUATION: &str = "()[]{}+-*/=<>!;:,";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputAlphabetError {
    #[error("character `{ch}` at {position} is not allowed")]
    UnexpectedCharacter { ch: char, position: usize },
    #[error("token `{token}` at {position} is not a terminal of the grammar")]
    UnknownTerminal { token: String, position: usize },
}

/// One token per character; whitespace is skipped.
pub fn tokenize_chars(input: &str) -> Result<Vec<String>, InputAlphabetError> {
    let mut tokens = Vec::new();
    for (position, ch) in input.chars().enumerate() {
        if ch.is_whitespace() {
            continue;
        } else if ch.is_alphanumeric() || PUNCTUATION.contains(ch) {
            tokens.push(ch.to_string());
        } else {
            return Err(InputAlphabetError::UnexpectedCharacter { ch, position });
        }
    }
    Ok(tokens)
}

/// One token per whitespace-separated word. Every word must be a terminal
/// of `grammar`.
pub fn tokenize_words(input: &str, grammar: &Grammar) -> Result<Vec<String>, InputAlphabetError> {
    let terminals: BTreeSet<&str> = grammar.terminal_iter().collect();
    input
        .split_whitespace()
        .enumerate()
        .map(|(position, word)| {
            if terminals.contains(word) {
                Ok(word.to_string())
            } else {
                Err(InputAlphabetError::UnknownTerminal {
                    token: word.to_string(),
                    position,
                })
            }
        })
        .collect()
}
