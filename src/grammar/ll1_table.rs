use std::collections::BTreeMap;

use indexmap::IndexMap;
use log::{debug, info};
use serde::Serialize;

use super::{error::ConflictError, FirstFollow, Grammar, END_MARK, EPSILON};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LL1Entry {
    /// Replace the non-terminal with this body (possibly the epsilon body).
    Expand(Vec<String>),
    /// Synchronizing entry for a token in FOLLOW that no production
    /// predicts. The driver treats it as an error.
    Sync,
}

impl LL1Entry {
    pub fn is_epsilon(&self) -> bool {
        match self {
            LL1Entry::Expand(body) => body.iter().all(|s| s == EPSILON),
            LL1Entry::Sync => true,
        }
    }
}

/// Predictive table keyed by non-terminal, then lookahead terminal.
#[derive(Debug, Clone, Serialize)]
pub struct LL1Table {
    pub terminals: Vec<String>,
    pub rows: IndexMap<String, BTreeMap<String, LL1Entry>>,
}

impl LL1Table {
    pub fn new(grammar: &Grammar, sets: &FirstFollow) -> Result<Self, ConflictError> {
        let mut terminals: Vec<String> = grammar.terminal_iter().map(|t| t.to_string()).collect();
        terminals.push(END_MARK.to_string());

        let mut rows: IndexMap<String, BTreeMap<String, LL1Entry>> = IndexMap::new();
        for nt in grammar.non_terminal_iter() {
            let row = rows.entry(nt.to_string()).or_default();
            for production in grammar.productions_of(nt) {
                let mut first = sets.first_of_sequence(production);
                let nullable = first.remove(EPSILON);

                for t in &first {
                    assign(row, nt, t, production)?;
                }
                if nullable {
                    for t in sets.follow(nt).into_iter().flatten() {
                        assign(row, nt, t, production)?;
                    }
                }
            }

            for t in sets.follow(nt).into_iter().flatten() {
                row.entry(t.clone()).or_insert(LL1Entry::Sync);
            }
        }

        info!(
            "Built LL(1) table with {} entries",
            rows.values().map(|r| r.len()).sum::<usize>()
        );
        Ok(Self { terminals, rows })
    }

    pub fn get(&self, non_terminal: &str, terminal: &str) -> Option<&LL1Entry> {
        self.rows.get(non_terminal).and_then(|row| row.get(terminal))
    }

    /// Terminals for which `non_terminal` expands to a non-empty body.
    pub fn expected(&self, non_terminal: &str) -> Vec<String> {
        self.rows
            .get(non_terminal)
            .into_iter()
            .flatten()
            .filter(|(_, entry)| !entry.is_epsilon())
            .map(|(t, _)| t.clone())
            .collect()
    }
}

fn assign(
    row: &mut BTreeMap<String, LL1Entry>,
    non_terminal: &str,
    terminal: &str,
    production: &[String],
) -> Result<(), ConflictError> {
    if let Some(LL1Entry::Expand(existing)) = row.get(terminal) {
        debug!("LL(1) conflict at ({}, {})", non_terminal, terminal);
        return Err(ConflictError::LL1 {
            non_terminal: non_terminal.to_string(),
            terminal: terminal.to_string(),
            existing: format!("{} -> {}", non_terminal, existing.join(" ")),
            incoming: format!("{} -> {}", non_terminal, production.join(" ")),
        });
    }
    row.insert(terminal.to_string(), LL1Entry::Expand(production.to_vec()));
    Ok(())
}
