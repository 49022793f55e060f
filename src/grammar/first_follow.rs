use std::collections::BTreeSet;

use indexmap::IndexMap;
use log::{debug, trace};
use serde::Serialize;

use super::{Grammar, END_MARK, EPSILON};

/// FIRST sets of every symbol and FOLLOW sets of every non-terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirstFollow {
    pub first: IndexMap<String, BTreeSet<String>>,
    pub follow: IndexMap<String, BTreeSet<String>>,
}

impl FirstFollow {
    pub fn new(grammar: &Grammar) -> Self {
        let mut first: IndexMap<String, BTreeSet<String>> = IndexMap::new();
        for nt in grammar.non_terminal_iter() {
            first.insert(nt.to_string(), BTreeSet::new());
        }
        for t in grammar.terminal_iter() {
            first.insert(t.to_string(), BTreeSet::from([t.to_string()]));
        }
        first.insert(EPSILON.to_string(), BTreeSet::from([EPSILON.to_string()]));

        let mut follow: IndexMap<String, BTreeSet<String>> = grammar
            .non_terminal_iter()
            .map(|nt| (nt.to_string(), BTreeSet::new()))
            .collect();
        if let Some(set) = grammar.start_symbol().and_then(|s| follow.get_mut(s)) {
            set.insert(END_MARK.to_string());
        }

        let mut sets = Self { first, follow };
        sets.converge(grammar);
        sets
    }

    /// Runs both fixed points from the current sets. On converged sets this
    /// changes nothing.
    pub fn converge(&mut self, grammar: &Grammar) {
        let rounds = self.calculate_first(grammar);
        debug!("FIRST converged after {} rounds", rounds);
        let rounds = self.calculate_follow(grammar);
        debug!("FOLLOW converged after {} rounds", rounds);
    }

    pub fn first(&self, symbol: &str) -> Option<&BTreeSet<String>> {
        self.first.get(symbol)
    }

    pub fn follow(&self, non_terminal: &str) -> Option<&BTreeSet<String>> {
        self.follow.get(non_terminal)
    }

    pub fn is_nullable(&self, symbol: &str) -> bool {
        self.first
            .get(symbol)
            .map_or(false, |set| set.contains(EPSILON))
    }

    /// FIRST of a symbol string: walks the symbols while they can vanish.
    /// Contains epsilon when every symbol can vanish, including when
    /// `symbols` is empty.
    pub fn first_of_sequence<S: AsRef<str>>(&self, symbols: &[S]) -> BTreeSet<String> {
        let mut first = BTreeSet::new();
        for symbol in symbols.iter().map(|s| s.as_ref()) {
            match self.first.get(symbol) {
                Some(set) => {
                    first.extend(set.iter().filter(|s| *s != EPSILON).cloned());
                    if !set.contains(EPSILON) {
                        return first;
                    }
                }
                // not a grammar symbol, behaves like a terminal
                None => {
                    first.insert(symbol.to_string());
                    return first;
                }
            }
        }
        first.insert(EPSILON.to_string());
        first
    }

    fn calculate_first(&mut self, grammar: &Grammar) -> usize {
        let mut rounds = 0;
        let mut changed = true;
        while changed {
            changed = false;
            rounds += 1;
            for (head, production) in grammar.production_iter() {
                let first = self.first_of_sequence(production);
                let set = self.first.entry(head.to_string()).or_default();
                let before = set.len();
                set.extend(first);
                if set.len() > before {
                    trace!("FIRST({}) grew to {:?}", head, set);
                    changed = true;
                }
            }
        }
        rounds
    }

    fn calculate_follow(&mut self, grammar: &Grammar) -> usize {
        let mut rounds = 0;
        let mut changed = true;
        while changed {
            changed = false;
            rounds += 1;
            for (head, production) in grammar.production_iter() {
                for (i, symbol) in production.iter().enumerate() {
                    if !grammar.is_non_terminal(symbol) {
                        continue;
                    }
                    let mut addition = self.first_of_sequence(&production[i + 1..]);
                    if addition.remove(EPSILON) {
                        if let Some(head_follow) = self.follow.get(head) {
                            addition.extend(head_follow.iter().cloned());
                        }
                    }

                    let set = self.follow.entry(symbol.to_string()).or_default();
                    let before = set.len();
                    set.extend(addition);
                    if set.len() > before {
                        trace!("FOLLOW({}) grew to {:?}", symbol, set);
                        changed = true;
                    }
                }
            }
        }
        rounds
    }
}
