use log::{debug, trace};

use super::{
    end_marked,
    error::{BuildError, SyntaxError},
    lr_dfa::LR0Automaton,
    slr_table::{Action, SLRTable},
    FirstFollow, Grammar, ProductionTable, Step,
};

/// A shift-reduce parser driven by SLR(1) tables.
#[derive(Debug, Clone)]
pub struct SLRParser {
    grammar: Grammar,
    sets: FirstFollow,
    automaton: LR0Automaton,
    table: SLRTable,
}

impl SLRParser {
    pub fn new(grammar: &Grammar) -> Result<Self, BuildError> {
        grammar.validate()?;
        let sets = FirstFollow::new(grammar);
        let automaton = LR0Automaton::new(grammar)?;
        let table = SLRTable::new(grammar, &automaton, &sets)?;
        Ok(Self {
            grammar: grammar.clone(),
            sets,
            automaton,
            table,
        })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn first_follow(&self) -> &FirstFollow {
        &self.sets
    }

    pub fn automaton(&self) -> &LR0Automaton {
        &self.automaton
    }

    pub fn rules(&self) -> &ProductionTable {
        &self.automaton.rules
    }

    pub fn table(&self) -> &SLRTable {
        &self.table
    }

    /// Runs the shift-reduce automaton over `tokens`. The derivation lists
    /// productions in the order they were reduced.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<Step>, SyntaxError> {
        let input = end_marked(tokens)?;
        let mut states: Vec<usize> = vec![0];
        let mut symbols: Vec<&str> = Vec::new();
        let mut position = 0;
        let mut derivation: Vec<Step> = Vec::new();

        loop {
            let state = *states.last().unwrap_or(&0);
            let token = input[position];

            let action = match self.table.action(state, token) {
                Some(action) => action,
                None => {
                    debug!("SLR(1) rejected `{}` at {} in state {}", token, position, state);
                    return Err(SyntaxError::NoAction {
                        position,
                        state,
                        token: token.to_string(),
                        expected: self.table.expected(state),
                        derivation,
                    });
                }
            };
            trace!("stack {:?}, token `{}`: {}", symbols, token, action);

            match action {
                Action::Shift(next) => {
                    symbols.push(token);
                    states.push(next);
                    position += 1;
                }
                Action::Reduce(n) => {
                    let rule = match self.automaton.rules.get(n) {
                        Some(rule) => rule,
                        None => unreachable!("reduce by unknown production {}", n),
                    };
                    let len = rule.symbols.len();
                    symbols.truncate(symbols.len().saturating_sub(len));
                    states.truncate(states.len().saturating_sub(len));

                    let exposed = *states.last().unwrap_or(&0);
                    let next = self.table.goto(exposed, &rule.head).ok_or_else(|| {
                        SyntaxError::MissingGoto {
                            state: exposed,
                            non_terminal: rule.head.clone(),
                        }
                    })?;
                    symbols.push(rule.head.as_str());
                    states.push(next);
                    derivation.push(Step::new(&rule.head, &rule.body));
                }
                Action::Accept => {
                    debug!("SLR(1) accepted with {} steps", derivation.len());
                    return Ok(derivation);
                }
            }
        }
    }
}
