use log::{debug, trace};

use super::{
    error::{BuildError, SyntaxError},
    ll1_table::{LL1Entry, LL1Table},
    end_marked, FirstFollow, Grammar, Step, END_MARK, EPSILON,
};

/// A predictive parser. Sets and table are computed once in [`LL1Parser::new`].
#[derive(Debug, Clone)]
pub struct LL1Parser {
    grammar: Grammar,
    start: String,
    sets: FirstFollow,
    table: LL1Table,
}

impl LL1Parser {
    pub fn new(grammar: &Grammar) -> Result<Self, BuildError> {
        let start = grammar.validate()?.to_string();
        let sets = FirstFollow::new(grammar);
        let table = LL1Table::new(grammar, &sets)?;
        Ok(Self {
            grammar: grammar.clone(),
            start,
            sets,
            table,
        })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn first_follow(&self) -> &FirstFollow {
        &self.sets
    }

    pub fn table(&self) -> &LL1Table {
        &self.table
    }

    /// Runs the predictive automaton over `tokens` and returns the leftmost
    /// derivation.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<Step>, SyntaxError> {
        let input = end_marked(tokens)?;
        let mut stack: Vec<&str> = vec![END_MARK, self.start.as_str()];
        let mut position = 0;
        let mut derivation: Vec<Step> = Vec::new();

        while let Some(&top) = stack.last() {
            let token = input[position];
            trace!("stack {:?}, token `{}` at {}", stack, token, position);

            if top == token {
                stack.pop();
                position += 1;
            } else if self.grammar.is_non_terminal(top) {
                match self.table.get(top, token) {
                    Some(LL1Entry::Expand(body)) => {
                        stack.pop();
                        stack.extend(
                            body.iter()
                                .rev()
                                .map(|s| s.as_str())
                                .filter(|s| *s != EPSILON),
                        );
                        derivation.push(Step::new(top, body));
                    }
                    Some(LL1Entry::Sync) | None => {
                        debug!("LL(1) rejected `{}` at {}", token, position);
                        return Err(SyntaxError::UnexpectedToken {
                            position,
                            token: token.to_string(),
                            expected: self.table.expected(top),
                            derivation,
                        });
                    }
                }
            } else {
                debug!("LL(1) rejected `{}` at {}", token, position);
                return Err(SyntaxError::Mismatch {
                    position,
                    expected: top.to_string(),
                    token: token.to_string(),
                    derivation,
                });
            }
        }

        debug!("LL(1) accepted with {} steps", derivation.len());
        Ok(derivation)
    }
}
