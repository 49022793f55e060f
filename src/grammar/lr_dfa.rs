use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use indexmap::IndexSet;
use log::{info, trace};

use super::{error::GrammarError, Grammar, ProductionTable, Rule};

/// A production with a dot. `rule` is the production number, 0 being the
/// augmented start rule; `position` counts recognized symbols of
/// [`Rule::symbols`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LR0Item {
    pub rule: usize,
    pub position: usize,
}

impl LR0Item {
    pub fn new(rule: usize) -> Self {
        Self { rule, position: 0 }
    }

    pub fn generate_next(&self) -> Self {
        Self {
            rule: self.rule,
            position: self.position + 1,
        }
    }

    /// Symbol right after the dot, if any.
    pub fn next_symbol<'a>(&self, rules: &'a ProductionTable) -> Option<&'a str> {
        rules
            .get(self.rule)
            .and_then(|r| r.symbols.get(self.position))
            .map(|s| s.as_str())
    }

    pub fn is_complete(&self, rules: &ProductionTable) -> bool {
        rules
            .get(self.rule)
            .map_or(false, |r| self.position >= r.symbols.len())
    }
}

/// A closed item set together with its outgoing transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LR0State {
    pub items: BTreeSet<LR0Item>,
    pub edges: BTreeMap<String, usize>,
}

/// The canonical collection of LR(0) item sets, indexed in discovery order.
#[derive(Debug, Clone)]
pub struct LR0Automaton {
    pub rules: ProductionTable,
    pub states: Vec<LR0State>,
}

impl LR0Automaton {
    pub fn new(grammar: &Grammar) -> Result<Self, GrammarError> {
        let rules = ProductionTable::new(grammar)?;

        let start = closure(&rules, BTreeSet::from([LR0Item::new(0)]));
        let mut index: HashMap<BTreeSet<LR0Item>, usize> = HashMap::from([(start.clone(), 0)]);
        let mut states = vec![LR0State {
            items: start,
            edges: BTreeMap::new(),
        }];
        let mut q: VecDeque<usize> = VecDeque::from([0]);

        while let Some(u) = q.pop_front() {
            let symbols: IndexSet<&str> = states[u]
                .items
                .iter()
                .filter_map(|item| item.next_symbol(&rules))
                .collect();

            for symbol in symbols {
                let target = match goto(&rules, &states[u].items, symbol) {
                    Some(target) => target,
                    None => continue,
                };
                let v = match index.get(&target) {
                    Some(&v) => v,
                    None => {
                        let v = states.len();
                        trace!("state {} --{}--> new state {}", u, symbol, v);
                        index.insert(target.clone(), v);
                        states.push(LR0State {
                            items: target,
                            edges: BTreeMap::new(),
                        });
                        q.push_back(v);
                        v
                    }
                };
                states[u].edges.insert(symbol.to_string(), v);
            }
        }

        info!("Created {} LR(0) states", states.len());
        Ok(Self { rules, states })
    }

    pub fn rule(&self, item: &LR0Item) -> Option<&Rule> {
        self.rules.get(item.rule)
    }

    /// Index of `goto(state, symbol)` in the collection.
    pub fn goto_state(&self, state: usize, symbol: &str) -> Option<usize> {
        self.states
            .get(state)
            .and_then(|s| s.edges.get(symbol))
            .cloned()
    }

    pub fn closure(&self, items: BTreeSet<LR0Item>) -> BTreeSet<LR0Item> {
        closure(&self.rules, items)
    }

    pub fn goto(&self, items: &BTreeSet<LR0Item>, symbol: &str) -> Option<BTreeSet<LR0Item>> {
        goto(&self.rules, items, symbol)
    }
}

/// Adds `[N -> . body]` for every non-terminal `N` right after a dot, until
/// nothing new appears.
fn closure(rules: &ProductionTable, mut items: BTreeSet<LR0Item>) -> BTreeSet<LR0Item> {
    let mut q: VecDeque<LR0Item> = items.iter().cloned().collect();
    while let Some(item) = q.pop_front() {
        if let Some(symbol) = item.next_symbol(rules) {
            for &rule in rules.rules_of(symbol) {
                let extend = LR0Item::new(rule);
                if items.insert(extend) {
                    q.push_back(extend);
                }
            }
        }
    }
    items
}

/// Closure of the items of `items` with the dot moved over `symbol`; `None`
/// when no item has `symbol` right after its dot.
fn goto(
    rules: &ProductionTable,
    items: &BTreeSet<LR0Item>,
    symbol: &str,
) -> Option<BTreeSet<LR0Item>> {
    let kernel: BTreeSet<LR0Item> = items
        .iter()
        .filter(|item| item.next_symbol(rules) == Some(symbol))
        .map(|item| item.generate_next())
        .collect();
    if kernel.is_empty() {
        None
    } else {
        Some(closure(rules, kernel))
    }
}
