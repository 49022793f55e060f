use std::collections::BTreeMap;

use log::{debug, info};
use serde::Serialize;

use super::{error::ConflictError, lr_dfa::LR0Automaton, FirstFollow, Grammar, END_MARK};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Shift(usize),
    /// Reduce by the production with this 1-based number.
    Reduce(usize),
    Accept,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Shift(s) => write!(f, "s{}", s),
            Action::Reduce(r) => write!(f, "r{}", r),
            Action::Accept => write!(f, "acc"),
        }
    }
}

/// ACTION and GOTO tables, one row per LR(0) state.
#[derive(Debug, Clone, Serialize)]
pub struct SLRTable {
    pub terminals: Vec<String>,
    pub non_terminals: Vec<String>,
    pub action: Vec<BTreeMap<String, Action>>,
    pub goto: Vec<BTreeMap<String, usize>>,
}

impl SLRTable {
    pub fn new(
        grammar: &Grammar,
        automaton: &LR0Automaton,
        sets: &FirstFollow,
    ) -> Result<Self, ConflictError> {
        let mut terminals: Vec<String> = grammar.terminal_iter().map(|t| t.to_string()).collect();
        terminals.push(END_MARK.to_string());
        let non_terminals: Vec<String> =
            grammar.non_terminal_iter().map(|t| t.to_string()).collect();

        let mut action = Vec::with_capacity(automaton.states.len());
        let mut goto = Vec::with_capacity(automaton.states.len());

        for (i, state) in automaton.states.iter().enumerate() {
            let mut row: BTreeMap<String, Action> = BTreeMap::new();

            for item in state.items.iter().filter(|item| item.is_complete(&automaton.rules)) {
                if item.rule == 0 {
                    assign(&mut row, i, END_MARK, Action::Accept)?;
                    continue;
                }
                let head = match automaton.rule(item) {
                    Some(rule) => rule.head.as_str(),
                    None => continue,
                };
                for t in sets.follow(head).into_iter().flatten() {
                    assign(&mut row, i, t, Action::Reduce(item.rule))?;
                }
            }

            for t in &terminals {
                if let Some(s) = automaton.goto_state(i, t) {
                    assign(&mut row, i, t, Action::Shift(s))?;
                }
            }

            let goto_row: BTreeMap<String, usize> = non_terminals
                .iter()
                .filter_map(|nt| automaton.goto_state(i, nt).map(|s| (nt.clone(), s)))
                .collect();

            action.push(row);
            goto.push(goto_row);
        }

        info!("Built SLR(1) table with {} states", action.len());
        Ok(Self {
            terminals,
            non_terminals,
            action,
            goto,
        })
    }

    pub fn action(&self, state: usize, terminal: &str) -> Option<Action> {
        self.action.get(state).and_then(|row| row.get(terminal)).cloned()
    }

    pub fn goto(&self, state: usize, non_terminal: &str) -> Option<usize> {
        self.goto
            .get(state)
            .and_then(|row| row.get(non_terminal))
            .cloned()
    }

    /// Terminals that have an action in `state`.
    pub fn expected(&self, state: usize) -> Vec<String> {
        self.action
            .get(state)
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    }
}

fn assign(
    row: &mut BTreeMap<String, Action>,
    state: usize,
    terminal: &str,
    action: Action,
) -> Result<(), ConflictError> {
    match row.get(terminal) {
        Some(&existing) if existing != action => {
            debug!("SLR(1) conflict in state {} on `{}`", state, terminal);
            Err(ConflictError::Slr {
                state,
                terminal: terminal.to_string(),
                existing: existing.to_string(),
                incoming: action.to_string(),
            })
        }
        _ => {
            row.insert(terminal.to_string(), action);
            Ok(())
        }
    }
}
